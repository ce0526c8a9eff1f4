//! Top-level error type for the archiving domain.
//!
//! [`ArchiverError`] covers conditions that stop a run before or during the
//! verification pass. Per-request HTTP failures are not represented here: the
//! board service logs them and hands back an empty result, and the orchestrator
//! skips the affected board or card.

use thiserror::Error;

use crate::BoardId;

/// Errors that prevent an archive run from starting or continuing.
#[derive(Debug, Error)]
pub enum ArchiverError {
    /// Username or password is empty or still the shipped placeholder.
    #[error("Planka credentials are not configured; set username and password")]
    MissingCredentials,

    /// One or more mappings still point at the placeholder archive list id.
    ///
    /// The run never starts while any mapping is unconfigured.
    #[error("Archive list is not configured for {} source board(s)", boards.len())]
    UnconfiguredMappings {
        /// Source boards whose archive list id is the placeholder.
        boards: Vec<BoardId>,
    },

    /// The archive board could not be read during the verification pass.
    #[error("Archive board {board} not found")]
    ArchiveBoardNotFound {
        /// The configured archive board id.
        board: BoardId,
    },

    /// Settings could not be loaded or contain an invalid value.
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },
}
