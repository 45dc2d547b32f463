//! Configuration module
//!
//! This module loads the INI configuration of the scraper, normalizes every
//! field into a typed value and validates it before anything else runs.
//!
//! Startup order:
//!
//! 1. [`ConfigLoader`] reads one or more files into raw strings
//! 2. [`validate_config`] runs the normalization passes in a fixed order
//! 3. [`initialize`] stores the result for the rest of the process

// Submodules
mod builder;
mod defaults;
mod error;
mod loader;
mod manager;
mod normalize;
mod providers;
mod proxy;
mod report;
mod template;
mod types;
mod validator;
mod value;

// Re-export types and traits
pub use self::builder::ConfigBuilder;
pub use self::error::{ConfigError, Result};
pub use self::loader::{decode_config_bytes, parse_into, ConfigLoader, TextEncoding};
pub use self::manager::{get_config, initialize, is_initialized};
pub use self::normalize::{
    convert_naming_rule, norm_boolean, norm_int, norm_tuples, parse_bool, parse_int,
    validate_proxy,
};
pub use self::providers::{
    Crawler, ProviderHandle, ProviderLoadError, ProviderLoader, ProviderRegistry, ProviderResolver,
};
pub use self::proxy::{is_url, sanitize_free_proxy_section, sanitize_free_proxy_url, ProxyConfig};
pub use self::report::{ConsoleReporter, LogReporter, Reporter};
pub use self::template::{NamingTemplate, TemplateError};
pub use self::types::{
    Config, CrawlerSettings, FileSettings, NamingRuleSettings, NetworkSettings, NfoSettings,
    PrioritySettings, ProxyFreeSettings,
};
pub use self::validator::{validate_config, ConfigValidator};
pub use self::value::{Section, Value};

// Export constants needed externally
pub use defaults::sections;
pub use defaults::config_file_candidates;
pub use defaults::{
    CONFIG_FILE_ENV, DEFAULT_CONFIG_FILE, DEFAULT_LOG_FILE, ENV_PREFIX, LOCAL_ARCHIVE_PROVIDER,
    LOG_LEVEL_STR, PROVIDER_NAMESPACE,
};

/// Load and validate a configuration in one call
///
/// Uses the default file locations when `paths` is empty.
pub fn load_config<'a, P: AsRef<std::path::Path>>(
    paths: &[P],
    registry: &'a ProviderRegistry,
    reporter: impl Reporter + 'a,
) -> Result<Config> {
    let mut builder = ConfigBuilder::new()
        .with_registry(registry)
        .with_reporter(reporter);
    if paths.is_empty() {
        builder = builder.with_default_file();
    }
    for path in paths {
        builder = builder.with_file(path);
    }
    builder.build()
}
