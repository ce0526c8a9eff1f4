//! Value types for the archiving domain.
//!
//! Boards, lists and cards are read-only snapshots of remote state fetched for
//! the current run; nothing here is cached between runs.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{BoardId, CardId, ListId};

// ---------------------------------------------------------------------------
// Remote entities
// ---------------------------------------------------------------------------

/// A Planka board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Server-assigned board id.
    pub id: BoardId,
    /// Display name; `Board <id>` when the server sends none.
    pub name: String,
}

/// A list (column) on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardList {
    /// Server-assigned list id.
    pub id: ListId,
    /// Display name, matched exactly against the configured done-list name.
    pub name: String,
    /// Board the list belongs to.
    pub board_id: BoardId,
}

/// A card as read from a board.
///
/// Timestamps are kept as the raw server strings; they are parsed when the
/// retention filter is applied so that a malformed value only skips that card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Server-assigned card id.
    pub id: CardId,
    /// Card title; `Untitled` when the server sends none.
    pub name: String,
    /// `None` for cards that live outside any list (Planka allows this briefly
    /// while a card is being created).
    pub list_id: Option<ListId>,
    /// The board the card was read from.
    pub board_id: BoardId,
    /// Raw creation timestamp as sent by the server.
    pub created_at: Option<String>,
    /// Falls back to `created_at` when the server omits it.
    pub updated_at: Option<String>,
}

impl Card {
    /// Returns the card name cut to `max` characters, with `...` appended when
    /// anything was removed.
    pub fn short_name(&self, max: usize) -> String {
        if self.name.chars().count() <= max {
            return self.name.clone();
        }
        let mut short: String = self.name.chars().take(max).collect();
        short.push_str("...");
        short
    }
}

// ---------------------------------------------------------------------------
// Configuration values
// ---------------------------------------------------------------------------

/// One entry of the archive mapping: cards from `source_board`'s done list go to
/// `archive_list` on the archive board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveMapping {
    /// Board whose done list is swept.
    pub source_board: BoardId,
    /// Destination list on the archive board.
    pub archive_list: ListId,
}

impl ArchiveMapping {
    /// Creates a mapping from `source_board` to `archive_list`.
    pub fn new(source_board: BoardId, archive_list: ListId) -> Self {
        Self {
            source_board,
            archive_list,
        }
    }

    /// Returns `false` while the archive list is still the placeholder id.
    pub fn is_configured(&self) -> bool {
        !self.archive_list.is_placeholder()
    }
}

/// How many whole days a card may sit unchanged in a done list before it is
/// archived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RetentionWindow(u32);

impl RetentionWindow {
    /// Retention applied when nothing else is configured.
    pub const DEFAULT_DAYS: u32 = 14;

    /// Creates a window of `days` whole days.
    pub fn days(days: u32) -> Self {
        Self(days)
    }

    /// Returns the window length in days.
    pub fn as_days(self) -> u32 {
        self.0
    }

    /// Returns the instant before which a card counts as expired.
    ///
    /// A window reaching past the earliest representable instant yields that
    /// instant, so nothing expires.
    pub fn cutoff(self, now: Timestamp) -> Timestamp {
        let cutoff = TimeDelta::try_days(i64::from(self.0))
            .and_then(|window| now.0.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Timestamp(cutoff)
    }

    /// Returns `true` if `updated` lies strictly before the cutoff for `now`.
    pub fn is_expired(self, updated: Timestamp, now: Timestamp) -> bool {
        updated < self.cutoff(now)
    }
}

impl Default for RetentionWindow {
    fn default() -> Self {
        Self(Self::DEFAULT_DAYS)
    }
}

impl std::fmt::Display for RetentionWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} days", self.0)
    }
}

// ---------------------------------------------------------------------------
// Run results
// ---------------------------------------------------------------------------

/// Number of cards moved out of one source board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardOutcome {
    /// The processed source board.
    pub source_board: BoardId,
    /// Cards successfully moved to its archive list.
    pub moved: usize,
}

/// Result of a full archive run, in mapping order.
///
/// The total is derived from the per-board outcomes and cannot drift from them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    boards: Vec<BoardOutcome>,
}

impl RunSummary {
    /// Appends the outcome for one processed source board.
    pub fn record(&mut self, source_board: BoardId, moved: usize) {
        self.boards.push(BoardOutcome {
            source_board,
            moved,
        });
    }

    /// Per-board outcomes in the order the boards were processed.
    pub fn boards(&self) -> &[BoardOutcome] {
        &self.boards
    }

    /// Sum of the moved counts over every processed board.
    pub fn total_moved(&self) -> usize {
        self.boards.iter().map(|b| b.moved).sum()
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Whole days elapsed from `self` until `later` (negative if `later` is earlier).
    pub fn days_until(self, later: Timestamp) -> i64 {
        (later.0 - self.0).num_days()
    }

    /// `dd.mm.yyyy`, the format used in run logs.
    pub fn date_label(self) -> String {
        self.0.format("%d.%m.%Y").to_string()
    }

    /// `dd.mm.yyyy HH:MM`, the format used in run logs.
    pub fn minute_label(self) -> String {
        self.0.format("%d.%m.%Y %H:%M").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
