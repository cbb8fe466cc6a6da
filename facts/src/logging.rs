//! Log file setup.
//!
//! The TUI owns the terminal, so logs go to a file instead of stderr.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Filter directives, e.g. `FACTS_LOG=facts_core=debug`.
pub const LOG_ENV: &str = "FACTS_LOG";

/// Log file path override.
pub const LOG_FILE_ENV: &str = "FACTS_LOG_FILE";

const DEFAULT_LOG_FILE: &str = "facts.log";
const DEFAULT_FILTER: &str = "info";

/// Where logs are written.
pub fn log_path() -> PathBuf {
    std::env::var_os(LOG_FILE_ENV)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

/// Open the log file for appending.
fn open_log(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber, appending to [`log_path`].
///
/// Returns the path logs go to. When the file can't be opened a warning is
/// printed and logs are discarded; the app runs either way.
pub fn init() -> Option<PathBuf> {
    let path = log_path();

    let mut filter = EnvFilter::new(DEFAULT_FILTER);
    if std::env::var(LOG_ENV).is_ok() {
        filter = EnvFilter::from_env(LOG_ENV);
    }
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_ansi(false);

    match open_log(&path) {
        Ok(file) => {
            let _ = builder.with_writer(Mutex::new(file)).try_init();
            Some(path)
        }
        Err(e) => {
            eprintln!("Warning: cannot open log file {}: {e}; logging disabled", path.display());
            let _ = builder.with_writer(io::sink).try_init();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unopenable_log_file_does_not_stop_startup() {
        std::env::set_var(LOG_FILE_ENV, "/nonexistent-dir/facts.log");
        assert_eq!(log_path(), PathBuf::from("/nonexistent-dir/facts.log"));
        assert!(open_log(&log_path()).is_err());

        assert_eq!(init(), None);
        tracing::info!("still fine");
        std::env::remove_var(LOG_FILE_ENV);
    }
}
