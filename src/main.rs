//! JavSP configuration check
//!
//! Loads and validates the configuration the way the scraper does at
//! startup, then prints a summary or the whole validated configuration.

use std::env;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, info};

use javsp_config::common::{init_logger, Result};
use javsp_config::config::{
    self, Config, ConsoleReporter, ProviderRegistry, CONFIG_FILE_ENV,
    DEFAULT_LOG_FILE, ENV_PREFIX, LOG_LEVEL_STR,
};
use javsp_config::{APP_NAME, VERSION};

/// Load and validate a JavSP configuration file
#[derive(Parser, Debug)]
#[clap(author, version = VERSION, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to config.ini next to the executable)
    #[clap(long, env = CONFIG_FILE_ENV)]
    config_file: Option<PathBuf>,

    /// Log level
    #[clap(long)]
    log_level: Option<String>,

    /// Log file, opened in append mode
    #[clap(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Print the validated configuration as JSON
    #[clap(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    // Command line first, then JAVSP_LOG_LEVEL
    let log_level = args
        .log_level
        .clone()
        .or_else(|| env::var(format!("{}LOG_LEVEL", ENV_PREFIX)).ok())
        .unwrap_or_else(|| LOG_LEVEL_STR.to_string());
    init_logger(&log_level, Some(args.log_file.as_path()));

    info!("Starting {} v{}", APP_NAME, VERSION);

    if let Err(e) = run(&args) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    // Crawlers are not linked into this binary
    let registry = ProviderRegistry::new();

    let paths: Vec<&PathBuf> = args.config_file.iter().collect();
    let config = config::initialize(config::load_config(&paths, &registry, ConsoleReporter)?)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&*config)?);
    } else {
        print_summary(&config)?;
    }
    Ok(())
}

fn print_summary(config: &Config) -> Result<()> {
    for file in config.source_files() {
        println!("Configuration file: {}", file.display());
    }

    let network = config.network()?;
    println!("Network: retry={} timeout={}s", network.retry, network.timeout);
    match network.proxy.url() {
        Some(url) => println!("Proxy: {}", url),
        None => println!("Proxy: none"),
    }

    let file = config.file()?;
    println!("Media extensions: {}", file.media_ext.join(" "));

    let priority = config.priority()?;
    for (category, crawlers) in priority.iter() {
        let names: Vec<&str> = crawlers.iter().map(|c| c.name()).collect();
        println!("Priority {}: {}", category, names.join(", "));
    }

    let naming = config.naming_rule()?;
    println!("Save directory: {}", naming.save_dir);
    println!("File name: {}", naming.filename);

    let free = config.proxy_free()?;
    for site in free.sites() {
        if let Some(url) = free.url(site) {
            println!("Free proxy {}: {}", site, url);
        }
    }
    Ok(())
}
