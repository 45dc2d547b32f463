//! Reporting of recoverable configuration problems
//!
//! The passes do not write to the log directly. They hand their findings
//! to a `Reporter`, so tests and the command-line tool can route them.

use log::{debug, warn};

/// Sink for non-fatal findings of the validation pipeline
#[cfg_attr(test, mockall::automock)]
pub trait Reporter {
    /// `Network.proxy` is set but malformed; the proxy is disabled
    fn invalid_proxy(&self, raw: &str);

    /// Crawler names that could not be resolved, in encounter order
    fn unknown_providers(&self, names: &[String]);

    /// The local-archive crawler was skipped because its path is missing
    fn local_archive_skipped(&self, name: &str, path: &str);
}

pub(crate) fn invalid_proxy_message(raw: &str) -> String {
    format!(
        "Invalid proxy '{}', use a format like 'http://127.0.0.1:1080'; continuing without proxy",
        raw
    )
}

pub(crate) fn unknown_providers_message(names: &[String]) -> String {
    format!("Configured crawlers are invalid: {}", names.join(", "))
}

/// Reports through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn invalid_proxy(&self, raw: &str) {
        warn!("{}", invalid_proxy_message(raw));
    }

    fn unknown_providers(&self, names: &[String]) {
        warn!("{}", unknown_providers_message(names));
    }

    fn local_archive_skipped(&self, name: &str, path: &str) {
        debug!("Skipped crawler '{}': local path '{}' is not a directory", name, path);
    }
}

/// Reports unknown crawlers on stdout, used when the tool is run directly
///
/// Crawlers are usually not linked into the standalone binary, so failing
/// to resolve them there is expected and not worth a log warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn invalid_proxy(&self, raw: &str) {
        LogReporter.invalid_proxy(raw);
    }

    fn unknown_providers(&self, names: &[String]) {
        println!("Crawlers not available in this binary: {}", names.join(", "));
    }

    fn local_archive_skipped(&self, name: &str, path: &str) {
        LogReporter.local_archive_skipped(name, path);
    }
}
