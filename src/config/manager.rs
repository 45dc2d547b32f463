//! Process-wide configuration
//!
//! The validated configuration is stored once at startup and read-only
//! afterwards. Readers get a shared `Arc<Config>`.

use std::sync::Arc;

use log::info;
use once_cell::sync::OnceCell;

use crate::config::error::{ConfigError, Result};
use crate::config::types::Config;

static GLOBAL_CONFIG: OnceCell<Arc<Config>> = OnceCell::new();

/// Initialize the global configuration
///
/// Must be called once, after validation, by the application's startup
/// routine. A second call fails and leaves the stored configuration as is.
pub fn initialize(config: Config) -> Result<Arc<Config>> {
    let config = Arc::new(config);
    GLOBAL_CONFIG
        .set(Arc::clone(&config))
        .map_err(|_| ConfigError::AlreadyInitialized)?;

    info!("Global configuration initialized");
    for file in config.source_files() {
        info!("  from {}", file.display());
    }
    Ok(config)
}

/// Get the global configuration
pub fn get_config() -> Result<Arc<Config>> {
    GLOBAL_CONFIG.get().cloned().ok_or(ConfigError::NotInitialized)
}

/// Whether startup has stored the configuration
pub fn is_initialized() -> bool {
    GLOBAL_CONFIG.get().is_some()
}
