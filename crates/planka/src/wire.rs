//! JSON shapes of Planka API responses and their conversion to domain types.
//!
//! Board reads return an envelope of the form
//! `{"item": {...}, "included": {"lists": [...], "cards": [...]}}`. Every
//! section is optional; a malformed entry is dropped rather than failing the
//! whole read.

use archiver::{Board, BoardId, BoardList, Card, CardId, ListId};
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

const UNTITLED: &str = "Untitled";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBoard {
    #[serde(deserialize_with = "flexible_id")]
    id: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireList {
    #[serde(deserialize_with = "flexible_id")]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_id")]
    board_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCard {
    #[serde(deserialize_with = "flexible_id")]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_id")]
    list_id: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

// Planka ids are snowflakes serialised as strings; older builds emit numbers.
fn flexible_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("unexpected id value {other}"))),
    }
}

fn flexible_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!("unexpected id value {other}"))),
    }
}

/// Extracts the board from a `GET /api/boards/{id}` envelope.
pub(crate) fn board_from_envelope(envelope: &Value) -> Option<Board> {
    let wire: WireBoard = serde_json::from_value(envelope.get("item")?.clone()).ok()?;
    let id = BoardId::new(wire.id)?;
    let name = wire.name.unwrap_or_else(|| format!("Board {id}"));
    Some(Board { id, name })
}

/// Extracts `included.lists` from a board envelope.
pub(crate) fn lists_from_envelope(envelope: &Value, board: &BoardId) -> Vec<BoardList> {
    included(envelope, "lists")
        .filter_map(|entry| serde_json::from_value::<WireList>(entry.clone()).ok())
        .filter_map(|wire| {
            Some(BoardList {
                id: ListId::new(wire.id)?,
                name: wire.name.unwrap_or_else(|| UNTITLED.to_owned()),
                board_id: wire
                    .board_id
                    .and_then(BoardId::new)
                    .unwrap_or_else(|| board.clone()),
            })
        })
        .collect()
}

/// Extracts `included.cards` from a board envelope.
///
/// `updated_at` falls back to `created_at` for cards that were never edited.
pub(crate) fn cards_from_envelope(envelope: &Value, board: &BoardId) -> Vec<Card> {
    included(envelope, "cards")
        .filter(|entry| entry.is_object())
        .filter_map(|entry| serde_json::from_value::<WireCard>(entry.clone()).ok())
        .filter_map(|wire| {
            let created_at = wire.created_at.filter(|s| !s.is_empty());
            Some(Card {
                id: CardId::new(wire.id)?,
                name: wire.name.unwrap_or_else(|| UNTITLED.to_owned()),
                list_id: wire.list_id.and_then(ListId::new),
                board_id: board.clone(),
                updated_at: wire.updated_at.or_else(|| created_at.clone()),
                created_at,
            })
        })
        .collect()
}

fn included<'a>(envelope: &'a Value, section: &str) -> impl Iterator<Item = &'a Value> {
    envelope
        .get("included")
        .and_then(|inc| inc.get(section))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}
