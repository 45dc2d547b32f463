//! Configuration values and ordered sections
//!
//! Values start out as strings straight from the file. The normalizer passes
//! replace them in place with typed values.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::config::error::{ConfigError, Result};
use crate::config::providers::ProviderHandle;
use crate::config::proxy::ProxyConfig;
use crate::config::template::NamingTemplate;

/// A single configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Raw or free-form string
    Str(String),
    /// Coerced integer
    Int(i64),
    /// Coerced boolean
    Bool(bool),
    /// Delimiter-separated list, order and duplicates preserved
    List(Vec<String>),
    /// Parsed proxy mapping
    Proxy(ProxyConfig),
    /// Resolved crawlers in priority order
    Providers(Vec<ProviderHandle>),
    /// Parsed naming template
    Template(NamingTemplate),
}

impl Value {
    /// Name of the variant, used in type mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Str(_) => "a string",
            Value::Int(_) => "an integer",
            Value::Bool(_) => "a boolean",
            Value::List(_) => "a list",
            Value::Proxy(_) => "a proxy mapping",
            Value::Providers(_) => "a crawler list",
            Value::Template(_) => "a template",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_proxy(&self) -> Option<&ProxyConfig> {
        match self {
            Value::Proxy(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_providers(&self) -> Option<&[ProviderHandle]> {
        match self {
            Value::Providers(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_template(&self) -> Option<&NamingTemplate> {
        match self {
            Value::Template(t) => Some(t),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

/// A named section with keys kept in file order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    name: String,
    entries: Vec<(String, Value)>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Look up a value, `None` if the key is absent
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Look up a value, failing with the section and key in the error
    pub fn require(&self, key: &str) -> Result<&Value> {
        self.get(key).ok_or_else(|| ConfigError::MissingKey {
            section: self.name.clone(),
            key: key.to_string(),
        })
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert or overwrite; an overwritten key keeps its position
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.get_mut(&key) {
            Some(slot) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Value)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Typed read of a key
    pub(crate) fn typed<'a, T>(
        &'a self,
        key: &str,
        expected: &'static str,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<T> {
        extract(self.require(key)?).ok_or_else(|| ConfigError::TypeMismatch {
            section: self.name.clone(),
            key: key.to_string(),
            expected,
        })
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
