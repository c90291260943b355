//! Tracing setup. The terminal belongs to the UI, so events go to a log file.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default log file location under the platform data directory.
pub(crate) fn default_log_file() -> Result<PathBuf> {
    Ok(dirs::data_local_dir()
        .context("Failed to determine data directory")?
        .join("ecoleta")
        .join("ecoleta.log"))
}

/// Install the global subscriber, appending to `path`.
///
/// `RUST_LOG` wins over the `verbose` flag when set.
pub(crate) fn init(path: &Path, verbose: bool) -> Result<()> {
    let file = open_log_file(path)?;

    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("Failed to install tracing subscriber")
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context(format!(
            "Failed to create log directory: {}",
            parent.display()
        ))?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context(format!("Failed to open log file: {}", path.display()))
}
