//! Configuration tests
//!
//! Loading and validating whole configuration files from disk.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use tempfile::TempDir;

use javsp_config::config::{
    load_config, Config, ConfigBuilder, ConfigError, ConfigLoader, ConfigValidator, Crawler, ProviderLoadError,
    ProviderRegistry, Reporter, Value,
};

/// Reporter that records what it was told
#[derive(Default)]
struct RecordingReporter {
    proxies: RefCell<Vec<String>>,
    unknown: RefCell<Vec<Vec<String>>>,
    skipped: RefCell<Vec<String>>,
}

impl Reporter for RecordingReporter {
    fn invalid_proxy(&self, raw: &str) {
        self.proxies.borrow_mut().push(raw.to_string());
    }

    fn unknown_providers(&self, names: &[String]) {
        self.unknown.borrow_mut().push(names.to_vec());
    }

    fn local_archive_skipped(&self, name: &str, _path: &str) {
        self.skipped.borrow_mut().push(name.to_string());
    }
}

impl Reporter for &RecordingReporter {
    fn invalid_proxy(&self, raw: &str) {
        (**self).invalid_proxy(raw)
    }

    fn unknown_providers(&self, names: &[String]) {
        (**self).unknown_providers(names)
    }

    fn local_archive_skipped(&self, name: &str, path: &str) {
        (**self).local_archive_skipped(name, path)
    }
}

#[derive(Debug)]
struct Site(&'static str);

impl Crawler for Site {
    fn name(&self) -> &str {
        self.0
    }
}

fn registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    for name in ["javbus", "javdb", "fc2", "fc2fan", "avsox"] {
        registry.register_crawler(Site(name));
    }
    registry
}

fn sample(fc2fan_local_path: &str) -> String {
    format!(
        "\
[Network]
retry = 3
timeout = 10
proxy = SOCKS5://127.0.0.1:1080

[File]
media_ext = mp4;MKV;.avi
ignore_folder = #recycle;#done

[Crawler]
required_keys = cover,title
hardworking_mode = yes
remove_actor_in_title = no
fc2fan_local_path = {}

[Priority]
normal = javbus, javdb,missing
fc2 = fc2,fc2fan

[NamingRule]
output_folder = #done
save_dir = $actress/[$num] $title
filename = ${{num}}

[NFO]
add_genre_to_tag = on

[ProxyFree]
javbus = www.seedmm.work
javdb = https://javdb.com
avsox = not a url
",
        fc2fan_local_path
    )
}

fn write_config(dir: &TempDir, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test config file");
    path
}

fn qualified_names(config: &Config, category: &str) -> Vec<String> {
    config
        .priority()
        .expect("priority view")
        .get(category)
        .expect("category")
        .iter()
        .map(|p| p.qualified_name().to_string())
        .collect()
}

/// Test a full configuration from file
#[test]
fn test_file_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(&dir, "config.ini", sample(""));
    let registry = registry();
    let reporter = RecordingReporter::default();

    let config = ConfigBuilder::new()
        .with_file(&path)
        .with_registry(&registry)
        .with_reporter(&reporter)
        .build()
        .expect("Failed to load config from file");

    assert_eq!(config.source_files(), [path.clone()]);

    let network = config.network().unwrap();
    assert_eq!(network.retry, 3);
    assert_eq!(network.timeout, 10);
    assert_eq!(network.proxy.get("http"), Some("socks5://127.0.0.1:1080"));
    assert_eq!(network.proxy.get("https"), Some("socks5://127.0.0.1:1080"));
    assert!(reporter.proxies.borrow().is_empty());

    let file = config.file().unwrap();
    assert_eq!(file.media_ext, [".mp4", ".mkv", ".avi"]);
    assert_eq!(file.ignore_folder, ["#recycle", "#done"]);

    let crawler = config.crawler().unwrap();
    assert_eq!(crawler.required_keys, ["cover", "title"]);
    assert!(crawler.hardworking_mode);
    assert!(!crawler.remove_actor_in_title);

    assert_eq!(qualified_names(&config, "normal"), ["web.javbus", "web.javdb"]);
    assert_eq!(qualified_names(&config, "fc2"), ["web.fc2"]);
    assert_eq!(*reporter.unknown.borrow(), vec![vec!["missing".to_string()]]);
    assert_eq!(*reporter.skipped.borrow(), vec!["fc2fan".to_string()]);

    let naming = config.naming_rule().unwrap();
    assert_eq!(naming.output_folder, "#done");
    assert_eq!(
        naming.save_dir.source(),
        format!("#done{}$actress/[$num] $title", MAIN_SEPARATOR)
    );
    assert_eq!(naming.filename.placeholders().collect::<Vec<_>>(), ["num"]);

    assert!(config.nfo().unwrap().add_genre_to_tag);

    let free = config.proxy_free().unwrap();
    assert_eq!(free.url("javbus"), Some("http://www.seedmm.work"));
    assert_eq!(free.url("javdb"), Some("https://javdb.com"));
    assert_eq!(free.url("avsox"), None);
    assert_eq!(free.sites().collect::<Vec<_>>(), ["javbus", "javdb", "avsox"]);
}

/// The local-archive crawler is kept only when its directory exists
#[test]
fn test_local_archive_gate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = tempfile::tempdir().expect("archive dir");
    let path = write_config(&dir, "config.ini", sample(&archive.path().display().to_string()));
    let registry = registry();
    let reporter = RecordingReporter::default();

    let config = ConfigBuilder::new()
        .with_file(&path)
        .with_registry(&registry)
        .with_reporter(&reporter)
        .build()
        .unwrap();

    assert_eq!(qualified_names(&config, "fc2"), ["web.fc2", "web.fc2fan"]);
    assert!(reporter.skipped.borrow().is_empty());
    assert_eq!(config.crawler().unwrap().fc2fan_local_path, archive.path());
}

/// Later files override earlier ones key by key
#[test]
fn test_multiple_files_override() {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = write_config(&dir, "base.ini", sample(""));
    let local = write_config(&dir, "local.ini", "[Network]\ntimeout = 30\n");
    let missing = dir.path().join("missing.ini");

    let config = Config::from_files(&[&base, &missing, &local]).unwrap();
    assert_eq!(config.source_files(), [base, local]);
    assert_eq!(config.get("Network", "timeout").unwrap().as_str(), Some("30"));
    assert_eq!(config.get("Network", "retry").unwrap().as_str(), Some("3"));
}

#[test]
fn test_no_readable_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("config.ini");

    match Config::from_file(&missing) {
        Err(ConfigError::NoConfigFile(paths)) => assert_eq!(paths, [missing]),
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_utf8_bom_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut content = b"\xef\xbb\xbf".to_vec();
    content.extend_from_slice(sample("").as_bytes());
    let path = write_config(&dir, "bom.ini", content);

    let config = Config::from_file(&path).unwrap();
    assert!(config.has_section("Network"));
    assert_eq!(config.section_names().next(), Some("Network"));
}

#[test]
fn test_non_utf8_file_still_loads() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(&dir, "latin1.ini", b"[NamingRule]\noutput_folder = caf\xe9\n");

    let config = Config::from_file(&path).unwrap();
    let folder = config.get("NamingRule", "output_folder").unwrap().as_str().unwrap();
    assert!(folder.starts_with("caf"));
}

#[test]
fn test_invalid_integer_is_fatal() {
    let text = sample("").replace("retry = 3", "retry = three");
    let mut config = Config::from_text(&text).unwrap();
    let reporter = RecordingReporter::default();

    match config.validate(&registry(), &reporter) {
        Err(ConfigError::InvalidInteger { section, key, value }) => {
            assert_eq!((section.as_str(), key.as_str(), value.as_str()), ("Network", "retry", "three"));
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_invalid_boolean_is_fatal() {
    let text = sample("").replace("add_genre_to_tag = on", "add_genre_to_tag = sometimes");
    let mut config = Config::from_text(&text).unwrap();

    let err = config
        .validate(&registry(), &RecordingReporter::default())
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBoolean { .. }));
    assert!(err.to_string().contains("NFO.add_genre_to_tag"));
}

#[test]
fn test_invalid_proxy_is_recoverable() {
    let text = sample("").replace("SOCKS5://127.0.0.1:1080", "ftp://127.0.0.1:21");
    let mut config = Config::from_text(&text).unwrap();
    let reporter = RecordingReporter::default();
    config.validate(&registry(), &reporter).unwrap();

    assert!(config.network().unwrap().proxy.is_empty());
    assert_eq!(*reporter.proxies.borrow(), vec!["ftp://127.0.0.1:21".to_string()]);
}

#[test]
fn test_failed_crawler_is_fatal() {
    let mut registry = registry();
    registry.register("javdb", || Err(ProviderLoadError::Failed("bad credentials".into())));
    let mut config = Config::from_text(&sample("")).unwrap();

    match config.validate(&registry, &RecordingReporter::default()) {
        Err(ConfigError::ProviderLoad { category, name, reason }) => {
            assert_eq!(category, "normal");
            assert_eq!(name, "javdb");
            assert_eq!(reason, "bad credentials");
        }
        other => panic!("unexpected: {:?}", other),
    }
}

/// Validating an already validated configuration changes nothing
#[test]
fn test_validate_twice() {
    let registry = registry();
    let reporter = RecordingReporter::default();
    let mut config = Config::from_text(&sample("")).unwrap();

    config.validate(&registry, &reporter).unwrap();
    let first = config.clone();
    config.validate(&registry, &reporter).unwrap();

    assert_eq!(config, first);
    assert_eq!(reporter.unknown.borrow().len(), 1);
}

#[test]
fn test_validated_config_as_json() {
    let mut config = Config::from_text(&sample("")).unwrap();
    config.validate(&registry(), &RecordingReporter::default()).unwrap();

    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["Network"]["retry"], 3);
    assert_eq!(json["Network"]["proxy"]["https"], "socks5://127.0.0.1:1080");
    assert_eq!(json["Crawler"]["hardworking_mode"], true);
    assert_eq!(json["Priority"]["normal"][1], "web.javdb");
    assert_eq!(json["NamingRule"]["filename"], "${num}");
    assert_eq!(json["ProxyFree"]["avsox"], "");
}

#[test]
fn test_raw_values_without_validation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(&dir, "config.ini", sample(""));

    let config = ConfigBuilder::new()
        .with_file(&path)
        .without_validation()
        .build()
        .unwrap();

    assert_eq!(config.get("Network", "retry").unwrap(), &Value::from("3"));
    assert!(config.network().is_err());
}

#[test]
fn test_bundled_config_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.ini");
    let registry = ProviderRegistry::new();
    let reporter = RecordingReporter::default();

    let config = ConfigBuilder::new()
        .with_file(path)
        .with_registry(&registry)
        .with_reporter(&reporter)
        .build()
        .expect("bundled config.ini should validate");

    assert!(config.network().unwrap().proxy.is_empty());
    assert!(config.file().unwrap().is_media_ext("MP4"));
    // Nothing is registered, so every name is reported in one go
    assert_eq!(reporter.unknown.borrow().len(), 1);
}

#[test]
fn test_load_config_validates_all_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = write_config(&dir, "base.ini", sample(""));
    let local = write_config(&dir, "local.ini", "[Network]\nretry = 7\n");
    let registry = registry();
    let reporter = RecordingReporter::default();

    let config = load_config(&[&base, &local], &registry, &reporter).unwrap();

    assert_eq!(config.source_files(), [base, local]);
    assert_eq!(config.network().unwrap().retry, 7);
    assert_eq!(qualified_names(&config, "normal"), ["web.javbus", "web.javdb"]);
    assert_eq!(reporter.unknown.borrow().len(), 1);
}

#[test]
fn test_load_config_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("config.ini");

    let err = load_config(&[&missing], &registry(), RecordingReporter::default()).unwrap_err();
    assert!(matches!(err, ConfigError::NoConfigFile(paths) if paths == [missing.clone()]));
}
