//! JavSP configuration: load, normalize and validate the scraper's INI file
//!
//! The configuration is read once at startup. Every field is converted from
//! its raw text into a typed value (integers, booleans, lists, proxy mapping,
//! resolved crawler lists, naming templates) and the result is then stored
//! for read-only access by the rest of the program.
//!
//! # Main Features
//!
//! - INI loading with an encoding fallback chain and multi-file overrides
//! - Fatal errors that name the offending section and key
//! - Crawler priority lists resolved against a static registry
//! - `$name` naming templates parsed once, substituted many times
//!
//! # Example
//!
//! ```no_run
//! use javsp_config::config::{self, ConfigBuilder, LogReporter, ProviderRegistry};
//!
//! fn main() -> javsp_config::Result<()> {
//!     let registry = ProviderRegistry::new();
//!
//!     let config = ConfigBuilder::new()
//!         .with_default_file()
//!         .with_registry(&registry)
//!         .with_reporter(LogReporter)
//!         .build()?;
//!
//!     let config = config::initialize(config)?;
//!     println!("retry = {}", config.network()?.retry);
//!     Ok(())
//! }
//! ```

// Public modules
pub mod common;
pub mod config;

// Re-export commonly used structures and functions for convenience
pub use common::{init_logger, AppError, Result};
pub use config::{get_config, initialize, Config, ConfigBuilder, ConfigError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
