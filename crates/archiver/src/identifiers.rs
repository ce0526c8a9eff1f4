//! Newtype identifiers for Planka entities.
//!
//! Planka hands out snowflake identifiers serialised as JSON strings. Each kind
//! of entity gets its own newtype so that a [`ListId`] can never be passed where
//! a [`BoardId`] is expected, even though both are strings on the wire.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Identifies a Planka board (a source board or the archive board).
    BoardId
}

string_id! {
    /// Identifies a list (column) on a board.
    ListId
}

string_id! {
    /// Identifies a single card.
    CardId
}

/// Archive list id that marks a mapping as not yet configured.
///
/// Operators replace it with a real list id, usually found with the
/// `planka-archive-lists` diagnostic binary.
pub const UNCONFIGURED_LIST_ID: &str = "FIND_ID";

impl ListId {
    /// Returns `true` if this id is still the [`UNCONFIGURED_LIST_ID`] placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.0 == UNCONFIGURED_LIST_ID
    }
}
