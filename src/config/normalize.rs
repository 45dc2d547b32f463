//! Field normalizers
//!
//! Each pass converts a fixed set of raw string values into typed values,
//! in place. A value that is already typed is skipped, so running a pass
//! twice is harmless.

use std::path::MAIN_SEPARATOR;

use crate::config::defaults::sections;
use crate::config::error::{ConfigError, Result};
use crate::config::proxy::ProxyConfig;
use crate::config::report::Reporter;
use crate::config::template::NamingTemplate;
use crate::config::types::Config;
use crate::config::value::Value;

/// Fields coerced to integers
pub const INT_FIELDS: [(&str, &str); 2] = [
    (sections::NETWORK, "retry"),
    (sections::NETWORK, "timeout"),
];

/// Fields coerced to booleans
pub const BOOL_FIELDS: [(&str, &str); 3] = [
    (sections::CRAWLER, "hardworking_mode"),
    (sections::CRAWLER, "remove_actor_in_title"),
    (sections::NFO, "add_genre_to_tag"),
];

/// Parse a base-10 integer
pub fn parse_int(section: &str, key: &str, raw: &str) -> Result<i64> {
    raw.trim().parse::<i64>().map_err(|_| ConfigError::InvalidInteger {
        section: section.to_string(),
        key: key.to_string(),
        value: raw.to_string(),
    })
}

/// Parse a boolean token: yes/true/on/1 or no/false/off/0, any case
pub fn parse_bool(section: &str, key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBoolean {
            section: section.to_string(),
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Split on `delimiter`, keeping order, duplicates and empty items
pub fn split_list(raw: &str, delimiter: char) -> Vec<String> {
    raw.split(delimiter).map(str::to_string).collect()
}

/// Split media extensions on `;` into lowercase `.ext` items
pub fn split_media_ext(raw: &str) -> Vec<String> {
    raw.to_lowercase()
        .split(';')
        .map(|ext| {
            if ext.starts_with('.') {
                ext.to_string()
            } else {
                format!(".{}", ext)
            }
        })
        .collect()
}

/// Replace a raw string value with the result of `convert`
///
/// Missing section or key is an error; an already converted value is left
/// as it is.
fn convert_field<F>(config: &mut Config, section: &str, key: &str, convert: F) -> Result<()>
where
    F: FnOnce(&str) -> Result<Value>,
{
    let section_ref = config.section_mut(section)?;
    let value = section_ref.get_mut(key).ok_or_else(|| ConfigError::MissingKey {
        section: section.to_string(),
        key: key.to_string(),
    })?;

    if let Some(raw) = value.as_str() {
        let converted = convert(raw)?;
        *value = converted;
    }
    Ok(())
}

/// Integer coercion of `Network.retry` and `Network.timeout`
pub fn norm_int(config: &mut Config) -> Result<()> {
    for (section, key) in INT_FIELDS {
        convert_field(config, section, key, |raw| {
            parse_int(section, key, raw).map(Value::Int)
        })?;
    }
    Ok(())
}

/// List coercion of `File.media_ext`, `File.ignore_folder` and `Crawler.required_keys`
pub fn norm_tuples(config: &mut Config) -> Result<()> {
    convert_field(config, sections::FILE, "media_ext", |raw| {
        Ok(Value::List(split_media_ext(raw)))
    })?;
    convert_field(config, sections::FILE, "ignore_folder", |raw| {
        Ok(Value::List(split_list(raw, ';')))
    })?;
    convert_field(config, sections::CRAWLER, "required_keys", |raw| {
        Ok(Value::List(split_list(raw, ',')))
    })?;
    Ok(())
}

/// Boolean coercion of the fields in `BOOL_FIELDS`
pub fn norm_boolean(config: &mut Config) -> Result<()> {
    for (section, key) in BOOL_FIELDS {
        convert_field(config, section, key, |raw| {
            parse_bool(section, key, raw).map(Value::Bool)
        })?;
    }
    Ok(())
}

/// Parse `Network.proxy`; a malformed proxy is reported and degrades to no proxy
pub fn validate_proxy(config: &mut Config, reporter: &dyn Reporter) -> Result<()> {
    convert_field(config, sections::NETWORK, "proxy", |raw| {
        let proxy = ProxyConfig::parse(raw).unwrap_or_else(|| {
            reporter.invalid_proxy(raw);
            ProxyConfig::none()
        });
        Ok(Value::Proxy(proxy))
    })
}

/// Build the naming templates
///
/// `save_dir` becomes `output_folder` + path separator + `save_dir`;
/// `filename` is templated as it is. Placeholder names are not checked here.
pub fn convert_naming_rule(config: &mut Config) -> Result<()> {
    let section = config.section_mut(sections::NAMING_RULE)?;

    let template_error = |key: &str, source| ConfigError::Template {
        section: sections::NAMING_RULE.to_string(),
        key: key.to_string(),
        source,
    };

    if let Some(save_dir) = section.require("save_dir")?.as_str() {
        let output_folder = section.typed("output_folder", "a string", Value::as_str)?;
        let combined = format!("{}{}{}", output_folder, MAIN_SEPARATOR, save_dir);
        let template = NamingTemplate::parse(&combined).map_err(|e| template_error("save_dir", e))?;
        section.insert("save_dir", Value::Template(template));
    }

    if let Some(filename) = section.require("filename")?.as_str() {
        let template = NamingTemplate::parse(filename).map_err(|e| template_error("filename", e))?;
        section.insert("filename", Value::Template(template));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::report::MockReporter;

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("Network", "timeout", "30").unwrap(), 30);
        assert_eq!(parse_int("Network", "timeout", "-2").unwrap(), -2);
        let err = parse_int("Network", "timeout", "3.5").unwrap_err();
        assert!(err.to_string().contains("Network.timeout"));
        assert!(parse_int("Network", "timeout", "").is_err());
    }

    #[test]
    fn test_parse_bool() {
        for token in ["yes", "TRUE", "On", "1"] {
            assert!(parse_bool("NFO", "add_genre_to_tag", token).unwrap(), "{}", token);
        }
        for token in ["no", "False", "OFF", "0"] {
            assert!(!parse_bool("NFO", "add_genre_to_tag", token).unwrap(), "{}", token);
        }
        assert!(matches!(
            parse_bool("NFO", "add_genre_to_tag", "maybe"),
            Err(ConfigError::InvalidBoolean { .. })
        ));
    }

    #[test]
    fn test_split_media_ext() {
        assert_eq!(split_media_ext("mp4;AVI;.mkv"), vec![".mp4", ".avi", ".mkv"]);
        assert_eq!(split_media_ext("mp4;mp4"), vec![".mp4", ".mp4"]);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("#done;#unused", ';'), vec!["#done", "#unused"]);
        assert_eq!(split_list("cover,title", ','), vec!["cover", "title"]);
    }

    #[test]
    fn test_missing_key_is_fatal() {
        let mut config = Config::new();
        config.set("Network", "retry", "3");
        match norm_int(&mut config) {
            Err(ConfigError::MissingKey { section, key }) => {
                assert_eq!(section, "Network");
                assert_eq!(key, "timeout");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    fn proxy_config(raw: &str) -> Config {
        let mut config = Config::new();
        config.set("Network", "proxy", raw);
        config
    }

    #[test]
    fn test_malformed_proxy_is_reported_once() {
        let mut reporter = MockReporter::new();
        reporter
            .expect_invalid_proxy()
            .withf(|raw| raw.to_string() == "ftp://x:1")
            .times(1)
            .return_const(());

        let mut config = proxy_config("ftp://x:1");
        validate_proxy(&mut config, &reporter).unwrap();
        let proxy = config.get("Network", "proxy").unwrap().as_proxy().unwrap();
        assert!(proxy.is_empty());

        // Already converted, nothing to report the second time
        validate_proxy(&mut config, &reporter).unwrap();
    }

    #[test]
    fn test_empty_or_valid_proxy_is_not_reported() {
        let mut reporter = MockReporter::new();
        reporter.expect_invalid_proxy().never();

        for raw in ["", "http://127.0.0.1:1080"] {
            let mut config = proxy_config(raw);
            validate_proxy(&mut config, &reporter).unwrap();
        }
    }

    #[test]
    fn test_naming_rule_combines_paths() {
        let mut config = Config::new();
        config.set("NamingRule", "output_folder", "#done");
        config.set("NamingRule", "save_dir", "$actress/[$num] $title");
        config.set("NamingRule", "filename", "$num");

        convert_naming_rule(&mut config).unwrap();
        let rule = config.naming_rule().unwrap();
        assert_eq!(
            rule.save_dir.source(),
            format!("#done{}$actress/[$num] $title", MAIN_SEPARATOR)
        );
        assert_eq!(rule.filename.source(), "$num");
        assert_eq!(rule.output_folder, "#done");

        // Second run must not prepend the output folder again
        convert_naming_rule(&mut config).unwrap();
        let rule = config.naming_rule().unwrap();
        assert_eq!(
            rule.save_dir.source(),
            format!("#done{}$actress/[$num] $title", MAIN_SEPARATOR)
        );
    }

    #[test]
    fn test_bad_template_names_key() {
        let mut config = Config::new();
        config.set("NamingRule", "output_folder", "out");
        config.set("NamingRule", "save_dir", "ok");
        config.set("NamingRule", "filename", "$ bad");
        match convert_naming_rule(&mut config) {
            Err(ConfigError::Template { key, .. }) => assert_eq!(key, "filename"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
