//! Domain core of the Planka card archiver.
//!
//! This crate holds the data model, the retention rule, the port traits that
//! infrastructure implements, and the orchestrator that drives an archive run.
//! It performs no I/O itself; every server call goes through
//! [`ports::BoardService`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype ids (`BoardId`, `ListId`, `CardId`) |
//! | [`types`] | Boards, lists, cards, retention window, run summary, timestamps |
//! | [`retention`] | Parsing of server timestamps |
//! | [`config`] | Settings consumed by the orchestrator |
//! | [`ports`] | `BoardService` and `Clock` traits |
//! | [`orchestrator`] | The archive run itself |
//! | [`errors`] | Run-stopping error type |

pub mod config;
pub mod errors;
pub mod identifiers;
pub mod orchestrator;
pub mod ports;
pub mod retention;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{ArchiveSettings, DEFAULT_DONE_LIST_NAME};
pub use errors::ArchiverError;
pub use identifiers::{BoardId, CardId, ListId, UNCONFIGURED_LIST_ID};
pub use orchestrator::Archiver;
pub use ports::{BoardService, Clock, SystemClock};
pub use retention::parse_timestamp;
pub use types::{
    ArchiveMapping, Board, BoardList, BoardOutcome, Card, RetentionWindow, RunSummary, Timestamp,
};
