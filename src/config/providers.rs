//! Crawler registry and priority resolution
//!
//! Crawlers are registered by name at startup. The `Priority` section lists,
//! per category, crawler names from highest to lowest priority; resolution
//! turns each list into the crawlers that are actually available.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::common::fs::is_existing_dir;
use crate::config::defaults::{LOCAL_ARCHIVE_PROVIDER, PROVIDER_NAMESPACE};
use crate::config::error::{ConfigError, Result};
use crate::config::report::Reporter;
use crate::config::value::{Section, Value};

/// A metadata crawler
///
/// Only identity matters to the configuration; scraping itself lives in the
/// crawler implementations.
pub trait Crawler: Send + Sync + fmt::Debug {
    /// Name the crawler is registered under
    fn name(&self) -> &str;
}

/// Why a registered crawler could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderLoadError {
    /// The crawler or something it depends on is not available
    #[error("not found: {0}")]
    NotFound(String),

    /// The crawler exists but failed to initialize
    #[error("{0}")]
    Failed(String),
}

/// Loader registered for a crawler name
pub type ProviderLoader =
    Box<dyn Fn() -> std::result::Result<Arc<dyn Crawler>, ProviderLoadError> + Send + Sync>;

/// Static mapping from crawler name to loader
#[derive(Default)]
pub struct ProviderRegistry {
    loaders: HashMap<String, ProviderLoader>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loader under `name`, replacing any previous one
    pub fn register<F>(&mut self, name: impl Into<String>, loader: F) -> &mut Self
    where
        F: Fn() -> std::result::Result<Arc<dyn Crawler>, ProviderLoadError> + Send + Sync + 'static,
    {
        self.loaders.insert(name.into(), Box::new(loader));
        self
    }

    /// Register an already constructed crawler under its own name
    pub fn register_crawler<C>(&mut self, crawler: C) -> &mut Self
    where
        C: Crawler + 'static,
    {
        let name = crawler.name().to_string();
        let crawler: Arc<dyn Crawler> = Arc::new(crawler);
        self.register(name, move || Ok(Arc::clone(&crawler)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loaders.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.loaders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Load a crawler; an unregistered name is `NotFound`
    pub fn load(&self, name: &str) -> std::result::Result<Arc<dyn Crawler>, ProviderLoadError> {
        match self.loaders.get(name) {
            Some(loader) => loader(),
            None => Err(ProviderLoadError::NotFound(name.to_string())),
        }
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// A resolved crawler
#[derive(Debug, Clone)]
pub struct ProviderHandle {
    name: String,
    qualified_name: String,
    crawler: Arc<dyn Crawler>,
}

impl ProviderHandle {
    fn new(name: &str, crawler: Arc<dyn Crawler>) -> Self {
        Self {
            name: name.to_string(),
            qualified_name: format!("{}.{}", PROVIDER_NAMESPACE, name),
            crawler,
        }
    }

    /// Bare name as written in the configuration
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespaced name, e.g. `web.javbus`
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn crawler(&self) -> &Arc<dyn Crawler> {
        &self.crawler
    }
}

impl PartialEq for ProviderHandle {
    fn eq(&self, other: &Self) -> bool {
        self.qualified_name == other.qualified_name
    }
}

impl Serialize for ProviderHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.qualified_name)
    }
}

/// Resolves the `Priority` section against a registry
pub struct ProviderResolver<'a> {
    registry: &'a ProviderRegistry,
    local_archive_dir: PathBuf,
    reporter: &'a dyn Reporter,
}

impl<'a> ProviderResolver<'a> {
    /// `local_archive_dir` gates the local-archive crawler
    pub fn new(
        registry: &'a ProviderRegistry,
        local_archive_dir: impl AsRef<Path>,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            registry,
            local_archive_dir: local_archive_dir.as_ref().to_path_buf(),
            reporter,
        }
    }

    /// Resolve one comma-separated list, keeping its order
    ///
    /// Names that are not available are appended to `unknown`.
    pub fn resolve(
        &self,
        category: &str,
        raw: &str,
        unknown: &mut Vec<String>,
    ) -> Result<Vec<ProviderHandle>> {
        let mut resolved = Vec::new();

        for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            if name == LOCAL_ARCHIVE_PROVIDER && !is_existing_dir(&self.local_archive_dir) {
                self.reporter
                    .local_archive_skipped(name, &self.local_archive_dir.display().to_string());
                continue;
            }

            match self.registry.load(name) {
                Ok(crawler) => resolved.push(ProviderHandle::new(name, crawler)),
                Err(ProviderLoadError::NotFound(_)) => unknown.push(name.to_string()),
                Err(ProviderLoadError::Failed(reason)) => {
                    return Err(ConfigError::ProviderLoad {
                        category: category.to_string(),
                        name: name.to_string(),
                        reason,
                    });
                }
            }
        }

        Ok(resolved)
    }

    /// Replace every raw list of the section with its resolved crawlers
    ///
    /// Unknown names from all categories are reported once at the end.
    /// Categories that are already resolved are left untouched.
    pub fn resolve_section(&self, section: &mut Section) -> Result<()> {
        let mut unknown = Vec::new();

        for (category, value) in section.iter_mut() {
            if let Some(raw) = value.as_str() {
                let resolved = self.resolve(category, raw, &mut unknown)?;
                *value = Value::Providers(resolved);
            }
        }

        if !unknown.is_empty() {
            self.reporter.unknown_providers(&unknown);
        }
        Ok(())
    }
}
