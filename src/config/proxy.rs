//! Proxy settings
//!
//! Parses the configured network proxy and sanitizes the per-site free-proxy
//! URLs. Both are recoverable: a bad value degrades to "no proxy" or an empty
//! URL instead of aborting startup.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::config::value::Section;

// Host: letters, digits, '.' and '-' only
static PROXY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(socks5|http)://([-.a-z\d]+):(\d+)$").expect("Proxy regex should be valid")
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(concat!(
        r"^(?:http)s?://",
        r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+(?:[A-Z]{2,6}\.?|[A-Z0-9-]{2,}\.?)|",
        r"localhost|",
        r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})",
        r"(?::\d+)?",
        r"(?:/?|[/?]\S+)$",
    ))
    .case_insensitive(true)
    .build()
    .expect("URL regex should be valid")
});

/// Proxy mapping from scheme to proxy URL
///
/// Either empty (direct connections) or holding the same URL for both
/// `http` and `https`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProxyConfig {
    proxies: BTreeMap<String, String>,
}

impl ProxyConfig {
    /// No proxy
    pub fn none() -> Self {
        Self::default()
    }

    /// Parse a raw `Network.proxy` value
    ///
    /// Accepts `socks5://host:port` or `http://host:port` (case-insensitive).
    /// An empty value is no proxy; anything else that does not match is
    /// `None`, and the caller decides how to report it.
    pub fn parse(raw: &str) -> Option<Self> {
        let proxy = raw.to_lowercase();
        if proxy.is_empty() {
            return Some(Self::none());
        }
        if !PROXY_REGEX.is_match(&proxy) {
            return None;
        }

        let proxies = ["http", "https"]
            .into_iter()
            .map(|scheme| (scheme.to_string(), proxy.clone()))
            .collect();
        Some(Self { proxies })
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// Proxy URL for a scheme (`http` or `https`)
    pub fn get(&self, scheme: &str) -> Option<&str> {
        self.proxies.get(scheme).map(String::as_str)
    }

    /// The proxy URL, identical for every scheme
    pub fn url(&self) -> Option<&str> {
        self.get("http")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.proxies.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Check that a string is an absolute `http`/`https` URL
///
/// The host must be a domain name, `localhost` or a dotted IPv4 address,
/// optionally followed by a port and a path or query.
pub fn is_url(url: &str) -> bool {
    URL_REGEX.is_match(url)
}

/// Normalize one free-proxy entry
///
/// Lowercases, adds `http://` when there is no scheme, and returns an empty
/// string when the result is not a URL.
pub fn sanitize_free_proxy_url(raw: &str) -> String {
    let mut url = raw.to_lowercase();
    if !url.starts_with("http") {
        url.insert_str(0, "http://");
    }
    if is_url(&url) {
        url
    } else {
        String::new()
    }
}

/// Sanitize every entry of the `ProxyFree` section in place
///
/// Invalid entries become empty strings, which consumers read as "no
/// free-proxy URL for this site". Non-string values are left alone.
pub fn sanitize_free_proxy_section(section: &mut Section) {
    for (_, value) in section.iter_mut() {
        if let Some(raw) = value.as_str() {
            let sanitized = sanitize_free_proxy_url(raw);
            *value = sanitized.into();
        }
    }
}
