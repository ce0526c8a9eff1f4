//! The archive run as driven by the `planka-archive` binary, and the mapping
//! from its outcome to a process exit status.
//!
//! Validation happens before any network call. Configuration and
//! authentication failures end the process with status 1; a missing archive
//! board is logged by the orchestrator and ends the run with status 0.

use std::process::ExitCode;

use anyhow::Context;
use archiver::{Archiver, ArchiverError, SystemClock, UNCONFIGURED_LIST_ID};
use planka::PlankaClient;
use tracing::{error, info};

use crate::{Settings, SETTINGS_FILE};

/// Process status of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Failure,
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Success => ExitCode::SUCCESS,
            RunStatus::Failure => ExitCode::FAILURE,
        }
    }
}

/// Validates `settings`, authenticates, and runs the archiver once.
///
/// # Errors
///
/// Fails on invalid settings (before any request is sent), on authentication
/// failure, and on any other run-stopping error except a missing archive board.
pub async fn run_archive(settings: &Settings) -> anyhow::Result<()> {
    let archive = settings.validate().inspect_err(report_invalid_settings)?;

    let client = PlankaClient::connect(&settings.connection())
        .await
        .context("Authentication with Planka failed")?;

    let archiver = Archiver::new(client, SystemClock, archive);
    match archiver.run().await {
        Ok(_) => Ok(()),
        // Already logged by the orchestrator.
        Err(ArchiverError::ArchiveBoardNotFound { .. }) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

/// Logs a failed run and returns the status the process should exit with.
pub fn exit_status(result: &anyhow::Result<()>) -> RunStatus {
    match result {
        Ok(()) => RunStatus::Success,
        Err(err) => {
            error!("{:#}", err);
            RunStatus::Failure
        }
    }
}

fn report_invalid_settings(err: &ArchiverError) {
    match err {
        ArchiverError::MissingCredentials => {
            error!("Set username and password in {} before running", SETTINGS_FILE);
        }
        ArchiverError::UnconfiguredMappings { boards } => {
            for board in boards {
                error!(
                    "Replace '{}' for board {} with a real archive list ID",
                    UNCONFIGURED_LIST_ID, board
                );
            }
            info!("How to find archive list IDs:");
            info!("  1. Open the archive board in the web interface");
            info!("  2. Read each list's ID from the URL");
            info!("  3. Or run planka-archive-lists to print every list ID");
        }
        _ => {}
    }
}
