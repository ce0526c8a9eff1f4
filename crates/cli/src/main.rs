//! `planka-archive` entry point.
//!
//! Composition root for an archive run:
//!
//! 1. **Load settings** from `planka-archive.toml` (or the built-in defaults).
//! 2. **Wire logging** to stdout and the run log file.
//! 3. **Validate** credentials and the archive mapping; exit 1 if unset.
//! 4. **Authenticate** against Planka; exit 1 on failure.
//! 5. **Run** the [`archiver::Archiver`] until done or interrupted with Ctrl-C.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use cli::app::{exit_status, run_archive};
use cli::{observability, Settings, DEFAULT_LOG_FILE, SETTINGS_FILE};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let loaded = Settings::load(Path::new(SETTINGS_FILE));
    let log_file = loaded
        .as_ref()
        .map(|s| s.log_file.clone())
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE));
    if let Err(err) = observability::init(Some(&log_file)) {
        eprintln!("{err:#}");
    }

    let settings = match loaded {
        Ok(settings) => settings,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    tokio::select! {
        result = run_archive(&settings) => exit_status(&result).into(),
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted by user");
            ExitCode::SUCCESS
        }
    }
}
