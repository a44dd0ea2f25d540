use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::{Validate, ValidationError};

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// True for names that can follow `$` without escaping.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Parameters the server defines inside every statement (`$this`, `$parent`).
pub const BUILTIN_PARAMETERS: [&str; 2] = ["this", "parent"];

/// Parameter hygiene settings used by the translator
#[derive(Clone, Debug, PartialEq, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Bind-variable names that collide with server builtins
    #[validate(custom(function = "validate_reserved_names"))]
    pub reserved_parameter_names: Vec<String>,

    /// Prefix prepended to reserved names
    #[validate(
        length(min = 1, message = "Reserved prefix cannot be empty"),
        custom(function = "validate_prefix")
    )]
    pub reserved_prefix: String,

    /// Prefix of the parameters that carry record-id constants (`$_rid0`, `$_rid1`, ...)
    #[validate(custom(function = "validate_identifier"))]
    pub record_id_parameter_prefix: String,
}

fn validate_identifier(name: &str) -> Result<(), ValidationError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(ValidationError::new("identifier")
            .with_message(format!("`{}` is not a valid parameter name", name).into()))
    }
}

fn validate_prefix(prefix: &str) -> Result<(), ValidationError> {
    // The prefix is followed by an identifier, so it only needs identifier characters
    if prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(ValidationError::new("prefix")
            .with_message(format!("`{}` contains characters not allowed in names", prefix).into()))
    }
}

fn validate_reserved_names(names: &[String]) -> Result<(), ValidationError> {
    names.iter().try_for_each(|name| validate_identifier(name))
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            reserved_parameter_names: ["access", "auth", "token", "session"]
                .into_iter()
                .map(String::from)
                .collect(),
            reserved_prefix: "_".to_string(),
            record_id_parameter_prefix: "_rid".to_string(),
        }
    }
}

impl TranslatorConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            reserved_parameter_names: match env::var("SURQL_RESERVED_PARAMETERS") {
                Ok(list) => parse_list(&list),
                Err(_) => defaults.reserved_parameter_names,
            },
            reserved_prefix: env::var("SURQL_RESERVED_PREFIX")
                .unwrap_or(defaults.reserved_prefix),
            record_id_parameter_prefix: parse_env_var("SURQL_RECORD_ID_PREFIX", "_rid")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Merge with another configuration (file overrides environment)
    pub fn merge(&mut self, other: Self) {
        self.reserved_parameter_names = other.reserved_parameter_names;
        self.reserved_prefix = other.reserved_prefix;
        self.record_id_parameter_prefix = other.record_id_parameter_prefix;
    }

    /// Configured names plus [`BUILTIN_PARAMETERS`], which are always reserved.
    pub fn is_reserved(&self, name: &str) -> bool {
        BUILTIN_PARAMETERS
            .iter()
            .copied()
            .chain(self.reserved_parameter_names.iter().map(String::as_str))
            .any(|reserved| reserved.eq_ignore_ascii_case(name))
    }
}

/// Comma-separated list, blanks dropped
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
