//! Configuration validator
//!
//! Runs the normalization pipeline over a freshly loaded `Config`. The
//! passes run in a fixed order and each one relies on the previous ones.

use std::path::PathBuf;

use log::debug;

use crate::config::defaults::sections;
use crate::config::error::Result;
use crate::config::normalize::{convert_naming_rule, norm_boolean, norm_int, norm_tuples, validate_proxy};
use crate::config::providers::{ProviderRegistry, ProviderResolver};
use crate::config::proxy::sanitize_free_proxy_section;
use crate::config::report::Reporter;
use crate::config::types::Config;
use crate::config::value::Value;

/// Validate and convert the configuration in place
///
/// Fatal problems are returned as errors and must abort startup.
/// Recoverable ones are reported through `reporter` or the log.
pub fn validate_config(
    config: &mut Config,
    registry: &ProviderRegistry,
    reporter: &dyn Reporter,
) -> Result<()> {
    debug!("Validating configuration");

    norm_int(config)?;
    norm_tuples(config)?;
    norm_boolean(config)?;
    validate_proxy(config, reporter)?;
    import_crawlers(config, registry, reporter)?;
    convert_naming_rule(config)?;
    // Always sanitized; crawlers decide whether to use them based on the proxy
    sanitize_free_proxy_section(config.section_mut(sections::PROXY_FREE)?);

    debug!("Configuration validated");
    Ok(())
}

/// Resolve the `Priority` section against the crawler registry
fn import_crawlers(
    config: &mut Config,
    registry: &ProviderRegistry,
    reporter: &dyn Reporter,
) -> Result<()> {
    let local_archive_dir = PathBuf::from(
        config
            .section(sections::CRAWLER)?
            .typed("fc2fan_local_path", "a string", Value::as_str)?,
    );
    let resolver = ProviderResolver::new(registry, local_archive_dir, reporter);
    resolver.resolve_section(config.section_mut(sections::PRIORITY)?)
}

/// Configuration validator trait
pub trait ConfigValidator {
    /// Run the validation pipeline
    fn validate(&mut self, registry: &ProviderRegistry, reporter: &dyn Reporter) -> Result<()>;
}

impl ConfigValidator for Config {
    fn validate(&mut self, registry: &ProviderRegistry, reporter: &dyn Reporter) -> Result<()> {
        validate_config(self, registry, reporter)
    }
}
