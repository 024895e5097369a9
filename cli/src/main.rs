use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use argscheme_core::{
    OptionPrefixes, SchemeCompiler, SetMatch, ValidatorConfig, ValueConsumption, tokenize_owned,
};
use clap::{ArgGroup, Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod output;

use output::{CheckOutput, MatchOutput, OutputFormat, format_check, format_sets, format_tokens};

/// Exit code when the line is well formed but no argument set matched.
const EXIT_NO_MATCH: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "argscheme")]
#[command(about = "Compile argument schemes and validate argument lines against them")]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate an argument line against the sets of a config file.
    Check(CheckArgs),
    /// Compile argument-set descriptors and print the result.
    Compile(CompileArgs),
    /// Split an argument line into tokens.
    Tokenize(TokenizeArgs),
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("input").required(true).args(["line", "tokens"])))]
struct CheckArgs {
    /// YAML or JSON file listing the argument sets.
    #[arg(long)]
    config: PathBuf,
    /// Run handlers even when unknown tokens are left over.
    #[arg(long)]
    ignore_unknown: bool,
    /// Remove captured value tokens along with their identifier.
    #[arg(long)]
    span: bool,
    /// Raw argument line to tokenize and validate.
    #[arg(long)]
    line: Option<String>,
    /// Output format.
    #[arg(long, default_value = "text")]
    format: OutputFormat,
    /// Pre-tokenized arguments (after `--`).
    #[arg(last = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct CompileArgs {
    /// Argument-set descriptors to compile.
    #[arg(required = true)]
    descriptors: Vec<String>,
    /// Option prefix (repeatable; default: -, --, /).
    #[arg(long = "prefix")]
    prefixes: Vec<String>,
    /// Output format.
    #[arg(long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct TokenizeArgs {
    /// Argument line to split.
    line: String,
    /// Output format.
    #[arg(long, default_value = "text")]
    format: OutputFormat,
}

fn main() {
    let cli = Cli::try_parse().unwrap_or_else(|err| {
        if !err.use_stderr() {
            err.exit();
        }
        // Usage errors share the generic failure code; 2 means "no match".
        let _ = err.print();
        std::process::exit(1);
    });
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Check(args) => run_check(args),
        Command::Compile(args) => run_compile(args).map(|()| true),
        Command::Tokenize(args) => run_tokenize(args).map(|()| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_NO_MATCH),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_check(args: CheckArgs) -> Result<bool, String> {
    let mut config = ValidatorConfig::load(&args.config)
        .map_err(|e| format!("Failed to load config '{}': {e}", args.config.display()))?;
    if args.ignore_unknown {
        config.ignore_unknown_parameters = true;
    }
    if args.span {
        config.value_consumption = ValueConsumption::Span;
    }

    let triggered: Rc<RefCell<Vec<String>>> = Rc::default();
    let mut validator = config
        .build_validator(|set| {
            let name = set.name.clone();
            let sink = Rc::clone(&triggered);
            move |matched: &SetMatch| {
                info!(set = %name, unknown = ?matched.unknown_tokens(), "argument set triggered");
                sink.borrow_mut().push(name.clone());
            }
        })
        .map_err(|e| format!("Failed to register '{}': {e}", args.config.display()))?;
    debug!(sets = validator.len(), "validator ready");

    let tokens = match &args.line {
        Some(line) => tokenize_owned(line),
        None => args.tokens.clone(),
    };
    let report = validator.validate(&tokens);

    let matches = report
        .matches()
        .iter()
        .map(|set_report| MatchOutput {
            set: config
                .sets
                .get(set_report.index)
                .map(|set| set.name.as_str())
                .unwrap_or(set_report.command.as_str()),
            dispatch: set_report.dispatch,
            arguments: &set_report.matched.arguments,
            unknown: set_report.matched.unknown_tokens(),
        })
        .collect();

    let output = CheckOutput {
        valid: report.is_valid(),
        status: report.status(),
        tokens: &tokens,
        triggered: triggered.borrow().clone(),
        matches,
    };
    println!("{}", format_check(&output, args.format)?.trim_end());

    Ok(report.is_valid())
}

fn run_compile(args: CompileArgs) -> Result<(), String> {
    let prefixes = if args.prefixes.is_empty() {
        OptionPrefixes::default()
    } else {
        OptionPrefixes::new(args.prefixes)
    };
    let compiler = SchemeCompiler::new(prefixes);

    let sets = args
        .descriptors
        .iter()
        .map(|descriptor| compiler.compile(descriptor))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    println!("{}", format_sets(&sets, args.format)?.trim_end());
    Ok(())
}

fn run_tokenize(args: TokenizeArgs) -> Result<(), String> {
    let tokens = tokenize_owned(&args.line);
    println!("{}", format_tokens(&tokens, args.format)?.trim_end());
    Ok(())
}
