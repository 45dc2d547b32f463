//! Configuration loading functionality
//!
//! Reads INI-style files into a `Config` whose values are all still raw
//! strings. The grammar:
//!
//! - `[Section]` headers, section names are case-sensitive
//! - `key = value` or `key: value`, keys are lowercased, both sides trimmed
//! - lines starting with `;` or `#` are comments
//! - lines indented deeper than their key continue its value, blank lines
//!   between continuation lines are kept
//! - a repeated key overwrites the earlier value, a repeated section merges

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::common::fs::read_file;
use crate::config::error::{ConfigError, Result};
use crate::config::types::Config;

const BOM: char = '\u{feff}';

/// Text encodings tried in order when decoding a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Strict UTF-8 without byte order mark
    Utf8,
    /// UTF-8 with a leading byte order mark
    Utf8Sig,
    /// Platform default; on supported targets UTF-8 with replacement characters
    PlatformDefault,
}

impl TextEncoding {
    const FALLBACK_CHAIN: [TextEncoding; 3] =
        [TextEncoding::Utf8, TextEncoding::Utf8Sig, TextEncoding::PlatformDefault];

    fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes)
                .ok()
                .filter(|text| !text.starts_with(BOM))
                .map(str::to_string),
            TextEncoding::Utf8Sig => std::str::from_utf8(bytes)
                .ok()
                .and_then(|text| text.strip_prefix(BOM))
                .map(str::to_string),
            TextEncoding::PlatformDefault => {
                let text = String::from_utf8_lossy(bytes);
                Some(text.trim_start_matches(BOM).to_string())
            }
        }
    }
}

/// Decode raw file bytes, retrying with each encoding of the fallback chain
pub fn decode_config_bytes(bytes: &[u8], path: &Path) -> (String, TextEncoding) {
    for encoding in TextEncoding::FALLBACK_CHAIN {
        if let Some(text) = encoding.decode(bytes) {
            if encoding == TextEncoding::PlatformDefault {
                warn!(
                    "{} is not valid UTF-8, undecodable bytes were replaced",
                    path.display()
                );
            } else {
                debug!("Decoded {} as {:?}", path.display(), encoding);
            }
            return (text, encoding);
        }
    }
    // The last encoding of the chain always succeeds
    (String::from_utf8_lossy(bytes).into_owned(), TextEncoding::PlatformDefault)
}

/// Parse configuration text into `config`
///
/// `path` is only used for error messages.
pub fn parse_into(config: &mut Config, text: &str, path: &Path) -> Result<()> {
    let parse_error = |line: usize, message: &str| ConfigError::Parse {
        path: path.to_path_buf(),
        line,
        message: message.to_string(),
    };

    let mut current_section: Option<String> = None;
    // Key of the value being continued and the indent of its line
    let mut last_key: Option<(String, usize)> = None;
    let mut blank_lines = 0;

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();

        if line.is_empty() {
            if last_key.is_some() {
                blank_lines += 1;
            }
            continue;
        }
        if line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        let indent = raw_line.chars().take_while(|c| c.is_whitespace()).count();
        if let (Some(section), Some((key, key_indent))) = (&current_section, &last_key) {
            if indent > *key_indent {
                for _ in 0..blank_lines {
                    config.append_raw(section, key, "");
                }
                blank_lines = 0;
                config.append_raw(section, key, line);
                continue;
            }
        }
        // Blank lines at the end of a value are dropped
        blank_lines = 0;

        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            if header.is_empty() {
                return Err(parse_error(line_no, "empty section name"));
            }
            config.section_entry(header);
            current_section = Some(header.to_string());
            last_key = None;
            continue;
        }

        let Some(section) = &current_section else {
            return Err(parse_error(line_no, "value outside of any [section]"));
        };

        let Some(split_at) = line.find(|c| c == '=' || c == ':') else {
            return Err(parse_error(line_no, "expected 'key = value'"));
        };
        let key = line[..split_at].trim().to_lowercase();
        let value = line[split_at + 1..].trim();
        if key.is_empty() {
            return Err(parse_error(line_no, "empty key"));
        }

        config.section_entry(section).insert(key.clone(), value);
        last_key = Some((key, indent));
    }

    Ok(())
}

/// Trait for loading configuration
pub trait ConfigLoader {
    /// Load configuration from a single file
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self>
    where
        Self: Sized;

    /// Load configuration from several files
    ///
    /// Files are read in order and later files override earlier keys.
    /// Missing or unreadable files are skipped; it is an error only if
    /// none could be read.
    fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self>
    where
        Self: Sized;

    /// Load configuration from text
    fn from_text(text: &str) -> Result<Self>
    where
        Self: Sized;
}

impl ConfigLoader for Config {
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_files(&[path.as_ref()])
    }

    fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        info!("Reading configuration...");
        let mut config = Config::new();

        for path in paths {
            let path = path.as_ref();
            let bytes = match read_file(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    debug!("Skipping configuration file {}: {}", path.display(), e);
                    continue;
                }
            };

            let (text, _) = decode_config_bytes(&bytes, path);
            parse_into(&mut config, &text, path)?;
            config.add_source_file(path);
            info!("Loaded configuration from {}", path.display());
        }

        if config.source_files().is_empty() {
            let attempted: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
            return Err(ConfigError::NoConfigFile(attempted));
        }

        Ok(config)
    }

    fn from_text(text: &str) -> Result<Self> {
        let mut config = Config::new();
        parse_into(&mut config, text, Path::new("<text>"))?;
        Ok(config)
    }
}
