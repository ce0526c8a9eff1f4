//! Errors raised while talking to a Planka server.

use thiserror::Error;

/// Maximum number of body characters carried in an error for logging.
pub(crate) const BODY_SNIPPET_CHARS: usize = 200;

/// Failures of a single Planka API call.
///
/// Only authentication errors escape the client; every other variant is logged
/// by the request wrapper and turned into an empty result.
#[derive(Debug, Error)]
pub enum PlankaError {
    /// The configured base URL cannot be used to build request URLs.
    #[error("Invalid Planka base URL '{url}'")]
    InvalidBaseUrl {
        /// The base URL as configured.
        url: String,
    },

    /// The request never produced a response (DNS, connect, timeout, TLS).
    #[error("Request {method} {url} failed: {source}")]
    Transport {
        /// HTTP method of the failed request.
        method: String,
        /// Full request URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The access-token endpoint answered with something other than 200.
    #[error("Authentication failed with HTTP {status}: {body}")]
    AuthenticationRejected {
        /// Status code returned by the server.
        status: u16,
        /// First characters of the response body.
        body: String,
    },

    /// The access-token endpoint answered 200 without a usable token.
    #[error("No access token in the authentication response")]
    MissingToken,

    /// The server answered with an HTML page where JSON was expected.
    #[error("Server returned HTML instead of JSON for {endpoint}")]
    HtmlResponse {
        /// API path relative to `/api/`.
        endpoint: String,
    },

    /// The server answered with a 4xx or 5xx status.
    #[error("HTTP {status} for {method} {endpoint}: {body}")]
    Status {
        /// Status code returned by the server.
        status: u16,
        /// HTTP method of the request.
        method: String,
        /// API path relative to `/api/`.
        endpoint: String,
        /// First characters of the response body.
        body: String,
    },

    /// The body was not valid JSON.
    #[error("Could not parse JSON response from {url}: {body}")]
    MalformedJson {
        /// Full request URL.
        url: String,
        /// First characters of the response body.
        body: String,
    },
}

/// Returns at most `max` characters of `body`, cut on a character boundary.
pub(crate) fn snippet(body: &str, max: usize) -> String {
    body.chars().take(max).collect()
}
