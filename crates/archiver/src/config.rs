//! Settings consumed by the archive orchestrator.

use serde::{Deserialize, Serialize};

use crate::{ArchiveMapping, BoardId, RetentionWindow};

/// List name that marks finished work when nothing else is configured.
pub const DEFAULT_DONE_LIST_NAME: &str = "Done";

/// Everything the orchestrator needs to know about what to archive and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveSettings {
    /// Minimum age of a card's last update before it is archived.
    pub retention: RetentionWindow,

    /// Exact name of the list whose cards are archive candidates.
    pub done_list_name: String,

    /// Board that holds the archive lists.
    pub archive_board: BoardId,

    /// Source boards and their archive lists, processed in this order.
    pub mappings: Vec<ArchiveMapping>,
}

impl ArchiveSettings {
    /// Source boards whose mapping still carries the placeholder list id.
    pub fn unconfigured_boards(&self) -> Vec<BoardId> {
        self.mappings
            .iter()
            .filter(|m| !m.is_configured())
            .map(|m| m.source_board.clone())
            .collect()
    }
}
