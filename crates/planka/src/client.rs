//! Authenticated HTTP client for the Planka REST API.
//!
//! [`PlankaClient::connect`] exchanges credentials for a bearer token once;
//! the token is then attached to every request. All calls after that go
//! through one request wrapper that classifies the response and turns any
//! failure into a logged, empty result.

use std::time::Duration;

use archiver::{Board, BoardId, BoardList, BoardService, Card, CardId, ListId};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode, Url};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument, warn};

use crate::errors::{snippet, PlankaError, BODY_SNIPPET_CHARS};
use crate::wire;

/// Body characters kept when a JSON response cannot be parsed.
const MALFORMED_SNIPPET_CHARS: usize = 300;

/// Timeout applied to every request when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where and as whom to connect.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// Server root, e.g. `https://planka.example.com`. A trailing `/` is ignored.
    pub base_url: String,
    /// Email address or username of the archiving account.
    pub username: String,
    /// Password of the archiving account.
    pub password: String,
    /// Timeout applied to every request, including authentication.
    pub timeout: Duration,
}

/// Bearer token returned by `POST /api/access-tokens`. Never empty.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    fn new(value: &str) -> Option<Self> {
        if value.is_empty() {
            None
        } else {
            Some(Self(value.to_owned()))
        }
    }

    fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// An authenticated Planka session.
///
/// A value of this type only exists after authentication succeeded, so every
/// request it issues carries a token.
#[derive(Debug, Clone)]
pub struct PlankaClient {
    http: Client,
    base_url: String,
    token: AccessToken,
}

impl PlankaClient {
    /// Authenticates against the server and returns a ready client.
    ///
    /// # Errors
    ///
    /// - [`PlankaError::InvalidBaseUrl`] if `base_url` is not an http(s) URL.
    /// - [`PlankaError::AuthenticationRejected`] on any status other than 200.
    /// - [`PlankaError::MissingToken`] when the response has no `item` token.
    /// - [`PlankaError::Transport`] / [`PlankaError::MalformedJson`] when the
    ///   server cannot be reached or answers with something unreadable.
    #[instrument(skip(settings), fields(user = %settings.username))]
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self, PlankaError> {
        let base_url = settings.base_url.trim_end_matches('/').to_owned();
        match Url::parse(&base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(PlankaError::InvalidBaseUrl {
                    url: settings.base_url.clone(),
                })
            }
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let auth_url = format!("{base_url}/api/access-tokens");
        let http = Client::builder()
            .timeout(settings.timeout)
            .default_headers(headers)
            .build()
            .map_err(|source| transport("POST", &auth_url, source))?;

        info!("Authenticating user {}", settings.username);
        let response = http
            .post(&auth_url)
            .json(&json!({
                "emailOrUsername": settings.username,
                "password": settings.password,
            }))
            .send()
            .await
            .map_err(|source| transport("POST", &auth_url, source))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| transport("POST", &auth_url, source))?;

        if status != StatusCode::OK {
            return Err(PlankaError::AuthenticationRejected {
                status: status.as_u16(),
                body: snippet(&text, BODY_SNIPPET_CHARS),
            });
        }

        let body: Value =
            serde_json::from_str(&text).map_err(|_| PlankaError::MalformedJson {
                url: auth_url.clone(),
                body: snippet(&text, MALFORMED_SNIPPET_CHARS),
            })?;
        let token = body
            .get("item")
            .and_then(Value::as_str)
            .and_then(AccessToken::new)
            .ok_or(PlankaError::MissingToken)?;

        info!("Authentication succeeded");
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Sends one API call and classifies the response.
    ///
    /// Returns `Ok(None)` for 204, blank bodies and a JSON `null` body.
    async fn try_request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, PlankaError> {
        let url = self.url(endpoint);
        debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(self.token.as_str());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|source| transport(method.as_str(), &url, source))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| transport(method.as_str(), &url, source))?;

        if looks_like_html(&text) {
            return Err(PlankaError::HtmlResponse {
                endpoint: endpoint.to_owned(),
            });
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(PlankaError::Status {
                status: status.as_u16(),
                method: method.to_string(),
                endpoint: endpoint.to_owned(),
                body: snippet(&text, BODY_SNIPPET_CHARS),
            });
        }

        if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Null) => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(PlankaError::MalformedJson {
                url,
                body: snippet(&text, MALFORMED_SNIPPET_CHARS),
            }),
        }
    }

    /// Sends one API call; any failure is logged and reported as `None`.
    pub async fn request(&self, method: Method, endpoint: &str, body: Option<&Value>) -> Option<Value> {
        match self.try_request(method, endpoint, body).await {
            Ok(value) => value,
            Err(err @ PlankaError::HtmlResponse { .. }) => {
                warn!("{}", err);
                None
            }
            Err(err) => {
                error!("{}", err);
                None
            }
        }
    }

    /// `GET /api/boards/{id}`.
    pub async fn board_info(&self, board: &BoardId) -> Option<Board> {
        let envelope = self
            .request(Method::GET, &format!("boards/{board}"), None)
            .await?;
        wire::board_from_envelope(&envelope)
    }

    /// `GET /api/boards/{id}?include=lists`.
    pub async fn board_lists(&self, board: &BoardId) -> Vec<BoardList> {
        match self
            .request(Method::GET, &format!("boards/{board}?include=lists"), None)
            .await
        {
            Some(envelope) => wire::lists_from_envelope(&envelope, board),
            None => Vec::new(),
        }
    }

    /// `GET /api/boards/{id}?include=cards`.
    pub async fn board_cards(&self, board: &BoardId) -> Vec<Card> {
        match self
            .request(Method::GET, &format!("boards/{board}?include=cards"), None)
            .await
        {
            Some(envelope) => wire::cards_from_envelope(&envelope, board),
            None => Vec::new(),
        }
    }

    /// `PATCH /api/cards/{id}` placing the card at position 0 of the target list.
    ///
    /// Both board and list are sent; Planka needs the board id to move a card
    /// across boards.
    pub async fn move_card(&self, card: &CardId, target_board: &BoardId, target_list: &ListId) -> bool {
        let body = json!({
            "boardId": target_board,
            "listId": target_list,
            "position": 0,
        });
        self.request(Method::PATCH, &format!("cards/{card}"), Some(&body))
            .await
            .is_some()
    }
}

#[async_trait]
impl BoardService for PlankaClient {
    async fn board_info(&self, board: &BoardId) -> Option<Board> {
        PlankaClient::board_info(self, board).await
    }

    async fn board_lists(&self, board: &BoardId) -> Vec<BoardList> {
        PlankaClient::board_lists(self, board).await
    }

    async fn board_cards(&self, board: &BoardId) -> Vec<Card> {
        PlankaClient::board_cards(self, board).await
    }

    async fn move_card(&self, card: &CardId, target_board: &BoardId, target_list: &ListId) -> bool {
        PlankaClient::move_card(self, card, target_board, target_list).await
    }
}

fn transport(method: &str, url: &str, source: reqwest::Error) -> PlankaError {
    PlankaError::Transport {
        method: method.to_owned(),
        url: url.to_owned(),
        source,
    }
}

// Reverse proxies and the Planka SPA fallback answer unknown routes with HTML.
fn looks_like_html(body: &str) -> bool {
    let head: String = body.trim_start().chars().take(16).collect::<String>().to_ascii_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html")
}
