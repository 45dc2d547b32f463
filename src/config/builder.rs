//! Configuration builder
//!
//! Fluent startup entry point: choose files, a crawler registry and a
//! reporter, then load and validate in one go.

use std::path::{Path, PathBuf};

use log::debug;

use crate::config::defaults::config_file_candidates;
use crate::config::error::Result;
use crate::config::loader::ConfigLoader;
use crate::config::providers::ProviderRegistry;
use crate::config::report::{LogReporter, Reporter};
use crate::config::types::Config;
use crate::config::validator::validate_config;

/// Configuration builder
pub struct ConfigBuilder<'a> {
    files: Vec<PathBuf>,
    registry: Option<&'a ProviderRegistry>,
    reporter: Box<dyn Reporter + 'a>,
    validate: bool,
}

impl<'a> ConfigBuilder<'a> {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            registry: None,
            reporter: Box::new(LogReporter),
            validate: true,
        }
    }

    /// Add a file; files added later override earlier ones
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        debug!("Adding configuration file: {}", path.display());
        self.files.push(path.to_path_buf());
        self
    }

    /// Add the default configuration file
    ///
    /// The first existing candidate is used; when none exists all of them
    /// are added so that the load error lists every place that was tried.
    pub fn with_default_file(mut self) -> Self {
        let candidates = config_file_candidates();
        match candidates.iter().find(|p| p.is_file()) {
            Some(found) => self.files.push(found.clone()),
            None => self.files.extend(candidates),
        }
        self
    }

    /// Crawler registry used to resolve the `Priority` section
    pub fn with_registry(mut self, registry: &'a ProviderRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sink for recoverable findings, the log by default
    pub fn with_reporter<R: Reporter + 'a>(mut self, reporter: R) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Load raw values only
    pub fn without_validation(mut self) -> Self {
        self.validate = false;
        self
    }

    /// Load and validate the configuration
    pub fn build(self) -> Result<Config> {
        let mut config = Config::from_files(&self.files)?;

        if self.validate {
            let empty = ProviderRegistry::new();
            let registry = self.registry.unwrap_or(&empty);
            validate_config(&mut config, registry, self.reporter.as_ref())?;
        }

        Ok(config)
    }
}

impl Default for ConfigBuilder<'_> {
    fn default() -> Self {
        Self::new().with_default_file()
    }
}
