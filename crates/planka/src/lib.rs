//! Planka REST API adapter.
//!
//! Implements the [`archiver::BoardService`] trait over Planka's HTTP API.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Authentication, URL construction, response
//! classification (HTML pages, error statuses, empty bodies, malformed JSON)
//! and envelope parsing all live here. The [`archiver`] crate sees only
//! [`archiver::BoardService`].
//!
//! ## Endpoints
//!
//! | Call | Endpoint |
//! |------|----------|
//! | [`PlankaClient::connect`] | `POST /api/access-tokens` |
//! | [`PlankaClient::board_info`] | `GET /api/boards/{id}` |
//! | [`PlankaClient::board_lists`] | `GET /api/boards/{id}?include=lists` |
//! | [`PlankaClient::board_cards`] | `GET /api/boards/{id}?include=cards` |
//! | [`PlankaClient::move_card`] | `PATCH /api/cards/{id}` |

pub mod client;
pub mod errors;
mod wire;

pub use client::{AccessToken, ConnectionSettings, PlankaClient, DEFAULT_TIMEOUT};
pub use errors::PlankaError;
