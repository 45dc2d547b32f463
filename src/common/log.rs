//! Logging helpers
//!
//! Records go through the `log` facade. The backend is `env_logger`, writing
//! either to stderr or, when a log file is given, appending to that file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Timestamp layout shared by every sink
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Initialize the logging system
///
/// # Parameters
///
/// * `level` - default filter, overridden by `RUST_LOG`
/// * `log_file` - optional file opened in append mode
///
/// Returns `true` when the file sink is active. An unwritable log file is not
/// an error: records fall back to stderr. Calling this more than once is a
/// no-op for the second call.
pub fn init_logger(level: &str, log_file: Option<&Path>) -> bool {
    let env = Env::default().filter_or("RUST_LOG", level);
    let mut builder = Builder::from_env(env);
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {} {}: {}",
            chrono::Local::now().format(TIME_FORMAT),
            record.target(),
            record.level(),
            record.args()
        )
    });

    let mut file_active = false;
    if let Some(path) = log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(file)));
                file_active = true;
            }
            Err(e) => {
                eprintln!("Cannot open log file {}: {}, logging to stderr", path.display(), e);
            }
        }
    }

    // A logger installed earlier (e.g. by another test) wins
    let _ = builder.try_init();
    file_active
}
