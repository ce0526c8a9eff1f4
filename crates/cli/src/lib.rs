//! Shared pieces of the `planka-archive` and `planka-archive-lists` binaries.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`app`] | Archive run flow and exit status mapping |
//! | [`settings`] | Defaults, settings file loading, pre-flight validation |
//! | [`observability`] | `tracing-subscriber` setup for stdout and the log file |

pub mod app;
pub mod observability;
pub mod settings;

pub use settings::{MappingEntry, Settings, DEFAULT_LOG_FILE, SETTINGS_FILE};
