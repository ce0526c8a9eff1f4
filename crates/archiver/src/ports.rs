//! Port traits implemented by infrastructure crates.
//!
//! The orchestrator only talks to Planka through [`BoardService`] and only reads
//! the time through [`Clock`], which keeps it testable without a network or a
//! real wall clock.

use async_trait::async_trait;

use crate::{Board, BoardId, BoardList, Card, CardId, ListId, Timestamp};

/// Read and move access to a kanban board server.
///
/// Implementations absorb transport and protocol failures: a failed read yields
/// `None` or an empty collection, a failed move yields `false`. Failures are
/// expected to be logged by the implementation.
#[async_trait]
pub trait BoardService: Send + Sync {
    /// Fetches a board's metadata.
    async fn board_info(&self, board: &BoardId) -> Option<Board>;

    /// Fetches every list on a board.
    async fn board_lists(&self, board: &BoardId) -> Vec<BoardList>;

    /// Fetches every card on a board in a single request.
    async fn board_cards(&self, board: &BoardId) -> Vec<Card>;

    /// Moves a card to the top of `target_list` on `target_board`.
    ///
    /// Returns `true` when the server acknowledged the update with a body.
    async fn move_card(&self, card: &CardId, target_board: &BoardId, target_list: &ListId)
        -> bool;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC.
    fn now(&self) -> Timestamp;
}

/// [`Clock`] backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}
