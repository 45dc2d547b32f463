//! Configuration types
//!
//! `Config` is the root of the configuration: an ordered list of sections,
//! each mapping keys to values. Typed views over the fixed schema sections
//! are available once the configuration has been validated.

use std::path::{Path, PathBuf};

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::config::defaults::sections;
use crate::config::error::{ConfigError, Result};
use crate::config::providers::ProviderHandle;
use crate::config::proxy::ProxyConfig;
use crate::config::template::NamingTemplate;
use crate::config::value::{Section, Value};

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    sections: Vec<Section>,
    source_files: Vec<PathBuf>,
}

impl Config {
    /// Empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Files the configuration was read from
    pub fn source_files(&self) -> &[PathBuf] {
        &self.source_files
    }

    pub(crate) fn add_source_file(&mut self, path: &Path) {
        self.source_files.push(path.to_path_buf());
    }

    /// Section names in file order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(Section::name)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.iter().any(|s| s.name() == name)
    }

    /// Look up a section by name
    pub fn section(&self, name: &str) -> Result<&Section> {
        self.sections
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| ConfigError::UnknownSection(name.to_string()))
    }

    /// Mutable section lookup
    pub fn section_mut(&mut self, name: &str) -> Result<&mut Section> {
        self.sections
            .iter_mut()
            .find(|s| s.name() == name)
            .ok_or_else(|| ConfigError::UnknownSection(name.to_string()))
    }

    /// Get or create a section
    pub fn section_entry(&mut self, name: &str) -> &mut Section {
        let index = match self.sections.iter().position(|s| s.name() == name) {
            Some(index) => index,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }

    /// Look up `section.key`
    pub fn get(&self, section: &str, key: &str) -> Result<&Value> {
        self.section(section)?.require(key)
    }

    /// Set `section.key`, creating the section if needed
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<Value>) {
        self.section_entry(section).insert(key, value);
    }

    /// Append a continuation line to a raw string value
    pub(crate) fn append_raw(&mut self, section: &str, key: &str, line: &str) {
        if let Some(Value::Str(existing)) = self.section_entry(section).get_mut(key) {
            existing.push('\n');
            existing.push_str(line);
        }
    }

    /// `[Network]` view
    pub fn network(&self) -> Result<NetworkSettings<'_>> {
        let section = self.section(sections::NETWORK)?;
        Ok(NetworkSettings {
            retry: section.typed("retry", "an integer", Value::as_int)?,
            timeout: section.typed("timeout", "an integer", Value::as_int)?,
            proxy: section.typed("proxy", "a proxy mapping", Value::as_proxy)?,
        })
    }

    /// `[File]` view
    pub fn file(&self) -> Result<FileSettings<'_>> {
        let section = self.section(sections::FILE)?;
        Ok(FileSettings {
            media_ext: section.typed("media_ext", "a list", Value::as_list)?,
            ignore_folder: section.typed("ignore_folder", "a list", Value::as_list)?,
        })
    }

    /// `[Crawler]` view
    pub fn crawler(&self) -> Result<CrawlerSettings<'_>> {
        let section = self.section(sections::CRAWLER)?;
        Ok(CrawlerSettings {
            required_keys: section.typed("required_keys", "a list", Value::as_list)?,
            hardworking_mode: section.typed("hardworking_mode", "a boolean", Value::as_bool)?,
            remove_actor_in_title: section.typed("remove_actor_in_title", "a boolean", Value::as_bool)?,
            fc2fan_local_path: Path::new(section.typed("fc2fan_local_path", "a string", Value::as_str)?),
            section,
        })
    }

    /// `[Priority]` view
    pub fn priority(&self) -> Result<PrioritySettings<'_>> {
        let section = self.section(sections::PRIORITY)?;
        for (key, value) in section.iter() {
            if value.as_providers().is_none() {
                return Err(ConfigError::TypeMismatch {
                    section: section.name().to_string(),
                    key: key.to_string(),
                    expected: "a crawler list",
                });
            }
        }
        Ok(PrioritySettings { section })
    }

    /// `[NamingRule]` view
    pub fn naming_rule(&self) -> Result<NamingRuleSettings<'_>> {
        let section = self.section(sections::NAMING_RULE)?;
        Ok(NamingRuleSettings {
            output_folder: section.typed("output_folder", "a string", Value::as_str)?,
            save_dir: section.typed("save_dir", "a template", Value::as_template)?,
            filename: section.typed("filename", "a template", Value::as_template)?,
            section,
        })
    }

    /// `[NFO]` view
    pub fn nfo(&self) -> Result<NfoSettings<'_>> {
        let section = self.section(sections::NFO)?;
        Ok(NfoSettings {
            add_genre_to_tag: section.typed("add_genre_to_tag", "a boolean", Value::as_bool)?,
            section,
        })
    }

    /// `[ProxyFree]` view
    pub fn proxy_free(&self) -> Result<ProxyFreeSettings<'_>> {
        Ok(ProxyFreeSettings {
            section: self.section(sections::PROXY_FREE)?,
        })
    }
}

impl Serialize for Config {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(section.name(), section)?;
        }
        map.end()
    }
}

/// Network settings
#[derive(Debug, Clone, Copy)]
pub struct NetworkSettings<'a> {
    /// Retry count for network requests
    pub retry: i64,
    /// Request timeout in seconds
    pub timeout: i64,
    pub proxy: &'a ProxyConfig,
}

/// Media file scanning settings
#[derive(Debug, Clone, Copy)]
pub struct FileSettings<'a> {
    /// Lowercase extensions with a leading dot
    pub media_ext: &'a [String],
    pub ignore_folder: &'a [String],
}

impl FileSettings<'_> {
    /// Whether a file extension (with or without dot, any case) is a media extension
    pub fn is_media_ext(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        let dotted = if ext.starts_with('.') { ext } else { format!(".{}", ext) };
        self.media_ext.iter().any(|e| *e == dotted)
    }
}

/// Crawler behaviour settings
#[derive(Debug, Clone, Copy)]
pub struct CrawlerSettings<'a> {
    /// Fields a crawl result must have to be accepted
    pub required_keys: &'a [String],
    pub hardworking_mode: bool,
    pub remove_actor_in_title: bool,
    pub fc2fan_local_path: &'a Path,
    section: &'a Section,
}

impl<'a> CrawlerSettings<'a> {
    /// Any other key of the section
    pub fn get(&self, key: &str) -> Result<&'a Value> {
        self.section.require(key)
    }
}

/// Resolved crawler priority per category
#[derive(Debug, Clone, Copy)]
pub struct PrioritySettings<'a> {
    section: &'a Section,
}

impl<'a> PrioritySettings<'a> {
    /// Crawlers for a category, highest priority first
    pub fn get(&self, category: &str) -> Result<&'a [ProviderHandle]> {
        self.section
            .typed(category, "a crawler list", Value::as_providers)
    }

    /// Categories in file order
    pub fn categories(&self) -> impl Iterator<Item = &'a str> {
        self.section.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a [ProviderHandle])> {
        self.section
            .iter()
            .filter_map(|(k, v)| v.as_providers().map(|p| (k, p)))
    }
}

/// Output naming settings
#[derive(Debug, Clone, Copy)]
pub struct NamingRuleSettings<'a> {
    pub output_folder: &'a str,
    /// Full directory template: output folder, separator, save directory
    pub save_dir: &'a NamingTemplate,
    pub filename: &'a NamingTemplate,
    section: &'a Section,
}

impl<'a> NamingRuleSettings<'a> {
    /// Any other key of the section
    pub fn get(&self, key: &str) -> Result<&'a Value> {
        self.section.require(key)
    }
}

/// NFO output settings
#[derive(Debug, Clone, Copy)]
pub struct NfoSettings<'a> {
    pub add_genre_to_tag: bool,
    section: &'a Section,
}

impl<'a> NfoSettings<'a> {
    /// Any other key of the section
    pub fn get(&self, key: &str) -> Result<&'a Value> {
        self.section.require(key)
    }
}

/// Per-site free-proxy URLs
#[derive(Debug, Clone, Copy)]
pub struct ProxyFreeSettings<'a> {
    section: &'a Section,
}

impl<'a> ProxyFreeSettings<'a> {
    /// URL for a site; `None` when absent or blanked by validation
    pub fn url(&self, site: &str) -> Option<&'a str> {
        self.section
            .get(site)
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
    }

    pub fn sites(&self) -> impl Iterator<Item = &'a str> {
        self.section.keys()
    }
}
