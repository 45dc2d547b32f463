//! Naming templates
//!
//! Output directories and file names are configured as `$`-templates:
//! `$name` or `${name}` is a placeholder and `$$` is a literal dollar sign.
//! A template is parsed once into a list of segments and substituted later,
//! once per movie.

use std::collections::{HashMap, HashSet};
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use thiserror::Error;

// Every `$` starts a match; the `invalid` branch catches a `$` followed by
// anything that is not an escape or an identifier.
static DOLLAR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?:(?P<escaped>\$)|(?P<named>[_A-Za-z][_A-Za-z0-9]*)|\{(?P<braced>[_A-Za-z][_A-Za-z0-9]*)\}|(?P<invalid>))")
        .expect("Template regex should be valid")
});

/// Template parse or substitution error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// `$` not followed by `$`, an identifier or `{identifier}`
    #[error("invalid placeholder at line {line}, column {column}")]
    InvalidPlaceholder { line: usize, column: usize },

    /// No value supplied for a placeholder
    #[error("no value for placeholder '{0}'")]
    MissingValue(String),

    /// Placeholder outside the set the caller knows how to fill
    #[error("unknown placeholder(s): {}", .0.join(", "))]
    UnknownPlaceholders(Vec<String>),
}

/// A piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// Placeholder name and its text as written (`$name` or `${name}`)
    Placeholder { name: String, text: String },
}

/// Parsed `$`-template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl NamingTemplate {
    /// Parse a template string
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut last_end = 0;

        for caps in DOLLAR_REGEX.captures_iter(source) {
            let Some(mat) = caps.get(0) else { continue };
            literal.push_str(&source[last_end..mat.start()]);
            last_end = mat.end();

            if caps.name("escaped").is_some() {
                literal.push('$');
                continue;
            }

            let name = caps.name("named").or_else(|| caps.name("braced"));
            match name {
                Some(name) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder {
                        name: name.as_str().to_string(),
                        text: mat.as_str().to_string(),
                    });
                }
                None => {
                    let (line, column) = position(source, mat.start());
                    return Err(TemplateError::InvalidPlaceholder { line, column });
                }
            }
        }

        literal.push_str(&source[last_end..]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The template text as configured
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of appearance, duplicates included
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Reject placeholders that are not in `known`
    pub fn check_placeholders(&self, known: &[&str]) -> Result<(), TemplateError> {
        let known: HashSet<&str> = known.iter().copied().collect();
        let mut unknown: Vec<String> = Vec::new();
        for name in self.placeholders() {
            if !known.contains(name) && !unknown.iter().any(|u| u == name) {
                unknown.push(name.to_string());
            }
        }
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(TemplateError::UnknownPlaceholders(unknown))
        }
    }

    /// Fill every placeholder, failing on the first one without a value
    pub fn substitute(&self, values: &HashMap<&str, String>) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { name, .. } => match values.get(name.as_str()) {
                    Some(value) => out.push_str(value),
                    None => return Err(TemplateError::MissingValue(name.clone())),
                },
            }
        }
        Ok(out)
    }

    /// Fill known placeholders and keep the others as written
    pub fn safe_substitute(&self, values: &HashMap<&str, String>) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { name, text } => match values.get(name.as_str()) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(text),
                },
            }
        }
        out
    }
}

impl fmt::Display for NamingTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for NamingTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

/// 1-based line and column of a byte offset
fn position(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, column)
}
