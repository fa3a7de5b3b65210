//! File-backed tracing. The terminal belongs to the UI, so nothing is
//! written to stdout or stderr once the app is running.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install the global subscriber. `RUST_LOG` wins over `config.log_level`.
///
/// Returns `false` when the log file can't be opened or a subscriber is
/// already installed; the app keeps running without logs.
pub fn init_tracing(config: &Config) -> bool {
    let path = config.log_path();
    let Some(file) = open_log_file(&path) else {
        return false;
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(path = %path.display(), "logging started");
    }
    installed
}

fn open_log_file(path: &Path) -> Option<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}
