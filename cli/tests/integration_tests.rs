use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const BUILD_AND_CLEAN: &str = r#"
sets:
  - name: build
    scheme: 'build, (-mode:debug|release), (-v[erbose])'
  - name: clean
    scheme: 'clean, (-all)'
"#;

fn write_config(dir: &Path, file: &str, raw: &str) -> PathBuf {
    let path = dir.join(file);
    fs::write(&path, raw).expect("failed to write config");
    path
}

fn argscheme(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_argscheme"))
        .args(args)
        .output()
        .expect("failed to run argscheme")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_reports_triggered_set() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "sets.yaml", BUILD_AND_CLEAN);

    let out = argscheme(&[
        "check",
        "--config",
        config.to_str().unwrap(),
        "--line",
        "clean -all",
    ]);

    assert_eq!(out.status.code(), Some(0));
    let text = stdout(&out);
    assert!(text.starts_with("status: triggered"), "stdout: {text}");
    assert!(text.contains("set clean (triggered)"), "stdout: {text}");
}

#[test]
fn check_leftover_value_suppresses_handler_unless_span() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "sets.yaml", BUILD_AND_CLEAN);
    let config = config.to_str().unwrap();

    let out = argscheme(&["check", "--config", config, "--line", "build -mode release"]);
    assert_eq!(out.status.code(), Some(0));
    let text = stdout(&out);
    assert!(text.starts_with("status: unknown tokens"), "stdout: {text}");
    assert!(text.contains("unknown: release"), "stdout: {text}");

    let out = argscheme(&[
        "check",
        "--config",
        config,
        "--span",
        "--line",
        "build -mode release",
    ]);
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).starts_with("status: triggered"));
}

#[test]
fn check_ignore_unknown_runs_handler_despite_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "sets.yaml", BUILD_AND_CLEAN);

    let out = argscheme(&[
        "check",
        "--config",
        config.to_str().unwrap(),
        "--ignore-unknown",
        "--line",
        "build -mode release",
    ]);

    assert_eq!(out.status.code(), Some(0));
    let text = stdout(&out);
    assert!(text.starts_with("status: triggered"), "stdout: {text}");
    assert!(text.contains("set build (triggered)"), "stdout: {text}");
    assert!(text.contains("unknown: release"), "stdout: {text}");
}

#[test]
fn check_requires_line_or_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "sets.yaml", BUILD_AND_CLEAN);

    let out = argscheme(&["check", "--config", config.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(!String::from_utf8_lossy(&out.stderr).is_empty());
}

#[test]
fn check_rejects_line_together_with_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "sets.yaml", BUILD_AND_CLEAN);

    let out = argscheme(&[
        "check",
        "--config",
        config.to_str().unwrap(),
        "--line",
        "clean",
        "--",
        "clean",
    ]);

    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn check_without_match_exits_with_two() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "sets.yaml", BUILD_AND_CLEAN);

    let out = argscheme(&[
        "check",
        "--config",
        config.to_str().unwrap(),
        "--line",
        "deploy now",
    ]);

    assert_eq!(out.status.code(), Some(2));
    assert!(stdout(&out).starts_with("status: no match"));
}

#[test]
fn check_accepts_tokens_after_double_dash_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        "sets.json",
        r#"{"ignore_unknown_parameters": true, "sets": [{"name": "greet", "scheme": "say, -msg:\"s"}]}"#,
    );

    let out = argscheme(&[
        "check",
        "--config",
        config.to_str().unwrap(),
        "--format",
        "json",
        "--",
        "say",
        "-msg",
        "hello, world",
    ]);

    assert_eq!(out.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(report["valid"], true);
    assert_eq!(report["status"], "triggered");
    assert_eq!(report["triggered"][0], "greet");
    assert_eq!(report["matches"][0]["set"], "greet");
    assert_eq!(report["matches"][0]["arguments"][1]["values"][0], "hello, world");
}

#[test]
fn check_missing_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.yaml");

    let out = argscheme(&["check", "--config", missing.to_str().unwrap(), "--line", "run"]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("error: Failed to load config"), "stderr: {stderr}");
}

#[test]
fn check_duplicate_command_names_the_set() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        "dup.yaml",
        r#"
sets:
  - name: first
    scheme: 'run|r'
  - name: second
    scheme: 'r, -v'
"#,
    );

    let out = argscheme(&["check", "--config", config.to_str().unwrap(), "--line", "run"]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("second"), "stderr: {stderr}");
    assert!(stderr.contains("command already exists"), "stderr: {stderr}");
}

// ---------------------------------------------------------------------------
// compile
// ---------------------------------------------------------------------------

#[test]
fn compile_prints_schemes() {
    let out = argscheme(&["compile", "run, (-v[erbose])", "[un]install, -p:\"l"]);

    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("# run, (-v[erbose])"), "stdout: {text}");
    assert!(text.contains("command  run"), "stdout: {text}");
    assert!(text.contains("v|verbose"), "stdout: {text}");
    assert!(text.contains("command  install|uninstall"), "stdout: {text}");
}

#[test]
fn compile_with_custom_prefix_as_json() {
    let out = argscheme(&["compile", "--prefix", "+", "--format", "json", "copy, +y"]);

    assert!(out.status.success());
    let sets: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(sets[0]["descriptor"], "copy, +y");
    assert_eq!(sets[0]["schemes"][1]["aliases"][0], "y");
}

#[test]
fn compile_rejects_bad_descriptor() {
    let out = argscheme(&["compile", "run, -x:"]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("invalid argument scheme"), "stderr: {stderr}");
}

// ---------------------------------------------------------------------------
// tokenize
// ---------------------------------------------------------------------------

#[test]
fn tokenize_keeps_quoted_runs_together() {
    let out = argscheme(&["tokenize", r#"say "hello, world" x,y"#]);

    assert!(out.status.success());
    let lines: Vec<String> = stdout(&out).lines().map(str::to_string).collect();
    assert_eq!(lines, ["say", "hello, world", "x", "y"]);
}
