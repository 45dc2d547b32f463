//! Configuration errors
//!
//! Every variant here is fatal: it aborts startup. Recoverable problems
//! (bad proxy, unknown crawler, bad free-proxy URL) are handled inside the
//! pass that finds them and never show up as a `ConfigError`.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::template::TemplateError;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// None of the candidate files could be read
    #[error("No readable configuration file among: {}", display_paths(.0))]
    NoConfigFile(Vec<PathBuf>),

    /// Syntax error in a configuration file
    #[error("Error parsing {}:{line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Section absent from the configuration
    #[error("Unknown configuration section: {0}")]
    UnknownSection(String),

    /// Key absent from a section
    #[error("Missing configuration value: {section}.{key}")]
    MissingKey { section: String, key: String },

    /// Value that is not a base-10 integer
    #[error("Invalid integer for {section}.{key}: '{value}'")]
    InvalidInteger {
        section: String,
        key: String,
        value: String,
    },

    /// Value that is not a recognized boolean token
    #[error("Invalid boolean for {section}.{key}: '{value}' (expected yes/no, true/false, on/off, 1/0)")]
    InvalidBoolean {
        section: String,
        key: String,
        value: String,
    },

    /// Malformed naming template
    #[error("Invalid template for {section}.{key}: {source}")]
    Template {
        section: String,
        key: String,
        #[source]
        source: TemplateError,
    },

    /// A registered crawler failed to load for a reason other than "not found"
    #[error("Failed to load crawler '{name}' for priority '{category}': {reason}")]
    ProviderLoad {
        category: String,
        name: String,
        reason: String,
    },

    /// Value read through a typed view before it was normalized
    #[error("Configuration value {section}.{key} is not {expected}")]
    TypeMismatch {
        section: String,
        key: String,
        expected: &'static str,
    },

    /// Global configuration was initialized twice
    #[error("Global configuration is already initialized")]
    AlreadyInitialized,

    /// Global configuration read before startup stored it
    #[error("Global configuration is not initialized")]
    NotInitialized,
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "<none>".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
