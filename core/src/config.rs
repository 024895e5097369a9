//! File-based validator configuration.
//!
//! A configuration lists the argument sets to register together with the
//! validator settings. Files ending in `.json` are read as JSON, everything
//! else as YAML.
//!
//! # Example YAML
//!
//! ```yaml
//! ignore_unknown_parameters: false
//! option_prefixes: ["-", "--", "/"]
//! value_consumption: identifier_only
//! sets:
//!   - name: install
//!     scheme: '[un]install, -p[ackage]:"list, (-f[orce])'
//!   - name: build
//!     scheme: 'build, (-mode:debug|release)'
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::matcher::ValueConsumption;
use crate::prefix::OptionPrefixes;
use crate::validator::{OnMatch, Validator, ValidatorBuilder};

/// A named argument-set descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetConfig {
    /// Name reported when the set matches or fails to register.
    pub name: String,
    /// Descriptor compiled when the set is registered.
    pub scheme: String,
}

/// Validator settings plus the sets to register.
///
/// Every field is optional in the file; missing fields take the values of
/// [`ValidatorConfig::default`].
///
/// # Examples
///
/// ```
/// use argscheme_core::ValidatorConfig;
///
/// let config = ValidatorConfig::from_yaml_str(r#"
/// ignore_unknown_parameters: true
/// sets:
///   - name: ping
///     scheme: "ping, (-c:\"s)"
/// "#).unwrap();
///
/// let mut validator = config.build_validator(|_| |_: &argscheme_core::SetMatch| {}).unwrap();
/// assert!(validator.check_args("ping -c 3"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    #[serde(default)]
    pub ignore_unknown_parameters: bool,
    #[serde(default)]
    pub option_prefixes: OptionPrefixes,
    #[serde(default)]
    pub value_consumption: ValueConsumption,
    #[serde(default)]
    pub sets: Vec<SetConfig>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            ignore_unknown_parameters: false,
            option_prefixes: OptionPrefixes::default(),
            value_consumption: ValueConsumption::default(),
            sets: Vec::new(),
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl ValidatorConfig {
    /// Loads configuration from a YAML or JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`]/[`ConfigError::Json`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let config = if is_json(path) {
            serde_json::from_reader(reader)?
        } else {
            serde_yaml::from_reader(reader)?
        };
        Ok(config)
    }

    /// Saves the configuration, as JSON for `.json` paths and YAML otherwise.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let writer = BufWriter::new(std::fs::File::create(path)?);
        if is_json(path) {
            serde_json::to_writer_pretty(writer, self)?;
        } else {
            serde_yaml::to_writer(writer, self)?;
        }
        Ok(())
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Returns a builder carrying these settings, without any sets.
    pub fn builder(&self) -> ValidatorBuilder {
        Validator::builder()
            .ignore_unknown_parameters(self.ignore_unknown_parameters)
            .option_prefixes(self.option_prefixes.as_slice().iter().cloned())
            .value_consumption(self.value_consumption)
    }

    /// Builds a validator and registers every configured set, asking
    /// `handler_for` for each set's handler.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Scheme`] naming the first set that fails to
    /// compile or collides with an earlier command.
    pub fn build_validator<F, H>(&self, mut handler_for: F) -> Result<Validator, ConfigError>
    where
        F: FnMut(&SetConfig) -> H,
        H: OnMatch + 'static,
    {
        let mut validator = self.builder().build();
        for set in &self.sets {
            validator
                .add_handler(&set.scheme, handler_for(set))
                .map_err(|source| ConfigError::Scheme {
                    name: set.name.clone(),
                    source,
                })?;
        }
        Ok(validator)
    }
}
