//! The network boundary: services that resolve book requests to availability records.
//!
//! [`LookupService`] is the seam the orchestrator talks to. The production
//! implementation is [`HttpLookupService`], which speaks the JSON contract
//! below; [`MockLookupService`] returns canned outcomes for tests and demos.
//!
//! # Wire Contract
//!
//! ```text
//! POST /search
//! Content-Type: application/json
//!
//! {"books": [{"title": "Republic", "author": "Plato"}]}
//! ```
//!
//! A 2xx response carries a JSON array of `{title, author, source, link}`
//! records (possibly empty). A non-2xx response should carry
//! `{"error": "message"}`; when it does not, the failure is reported as
//! `Server error: <status>`.

mod http;
pub mod mock;

pub use http::HttpLookupService;
pub use mock::MockLookupService;

use async_trait::async_trait;

use crate::models::{BookRequest, HealthStatus, ResultRecord};

/// A remote service that looks up where books can be downloaded.
///
/// Implementations perform exactly one request per call and never retry.
#[async_trait]
pub trait LookupService: Send + Sync + std::fmt::Debug {
    /// Human-readable name of this service, used in logs
    fn name(&self) -> &str;

    /// Look up every book in one request
    ///
    /// An empty result list is a successful lookup with nothing found.
    async fn search(&self, books: &[BookRequest]) -> Result<Vec<ResultRecord>, LookupError>;

    /// Check that the service is up
    async fn health(&self) -> Result<HealthStatus, LookupError> {
        Err(LookupError::NotImplemented)
    }
}

/// Errors that can occur when talking to a lookup service
///
/// The `Display` text is what the user sees in the error state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The service could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx response whose body is not a record list
    #[error("Invalid response from server: {0}")]
    Decode(String),

    /// Non-2xx response; `message` is the structured `error` field when present
    #[error("{}", server_message(.status, .message))]
    Server { status: u16, message: Option<String> },

    /// The search was cancelled while waiting for the response
    #[error("Search cancelled")]
    Cancelled,

    /// No response within the configured timeout
    #[error("Search timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The operation is not supported by this service
    #[error("Operation not implemented for this service")]
    NotImplemented,
}

fn server_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(msg) => msg.clone(),
        None => format!("Server error: {}", status),
    }
}

impl LookupError {
    /// Whether the failure came from the transport rather than the service
    pub fn is_transport(&self) -> bool {
        matches!(self, LookupError::Network(_) | LookupError::Decode(_))
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Decode(err.to_string())
    }
}
