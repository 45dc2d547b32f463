//! Error handling module
//!
//! This module defines the crate-wide error type and result alias.

use thiserror::Error;
use std::io;

use crate::config::ConfigError;

/// JavSP configuration tool error type
#[derive(Error, Debug)]
pub enum AppError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias
///
/// This is a `Result` type alias that uses our custom `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
