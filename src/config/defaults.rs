//! Default configuration values
//!
//! Single source of truth for file names, prefixes and reserved names.

use std::env;
use std::path::PathBuf;

/// Environment variable prefix for all options of the tool itself
pub const ENV_PREFIX: &str = "JAVSP_";

/// Environment variable that overrides the configuration file path
pub const CONFIG_FILE_ENV: &str = "JAVSP_CONFIG_FILE";

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "config.ini";

/// Default log file, opened in append mode
pub const DEFAULT_LOG_FILE: &str = "JavSP.log";

/// Default log level as string
pub const LOG_LEVEL_STR: &str = "info";

/// Namespace prepended to crawler names to form their qualified name
pub const PROVIDER_NAMESPACE: &str = "web";

/// Crawler that reads a local archive instead of the network
pub const LOCAL_ARCHIVE_PROVIDER: &str = "fc2fan";

/// Section names of the fixed schema
pub mod sections {
    pub const NETWORK: &str = "Network";
    pub const FILE: &str = "File";
    pub const CRAWLER: &str = "Crawler";
    pub const PRIORITY: &str = "Priority";
    pub const NAMING_RULE: &str = "NamingRule";
    pub const NFO: &str = "NFO";
    pub const PROXY_FREE: &str = "ProxyFree";
}

/// Candidate configuration files, in the order they should be tried
///
/// The file next to the running executable comes first, then the one in the
/// working directory. `JAVSP_CONFIG_FILE` replaces both.
pub fn config_file_candidates() -> Vec<PathBuf> {
    if let Ok(path) = env::var(CONFIG_FILE_ENV) {
        return vec![PathBuf::from(path)];
    }

    let mut candidates = Vec::new();
    if let Some(dir) = env::current_exe().ok().and_then(|exe| exe.parent().map(PathBuf::from)) {
        candidates.push(dir.join(DEFAULT_CONFIG_FILE));
    }
    candidates.push(PathBuf::from(DEFAULT_CONFIG_FILE));
    candidates
}
