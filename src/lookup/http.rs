//! HTTP lookup service implementation.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::Config;
use crate::lookup::{LookupError, LookupService};
use crate::models::{
    BookRequest, ErrorBody, HealthStatus, ResultRecord, ResultsBody, SearchRequest,
};
use crate::utils::HttpClient;

/// Lookup service reached over HTTP
///
/// Sends one `POST` per search with the whole batch of books and maps the
/// response onto records or a [`LookupError`].
#[derive(Debug, Clone)]
pub struct HttpLookupService {
    client: Arc<HttpClient>,
    search_url: String,
    health_url: String,
}

impl HttpLookupService {
    /// Create a service from configuration
    pub fn new(config: &Config) -> Result<Self, LookupError> {
        let client = HttpClient::from_config(&config.http)?;
        Ok(Self::with_client(
            Arc::new(client),
            config.search_url(),
            config.health_url(),
        ))
    }

    /// Create a service sharing an existing client
    pub fn with_client(
        client: Arc<HttpClient>,
        search_url: impl Into<String>,
        health_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            search_url: search_url.into(),
            health_url: health_url.into(),
        }
    }

    /// The search endpoint this service posts to
    pub fn search_url(&self) -> &str {
        &self.search_url
    }
}

#[async_trait]
impl LookupService for HttpLookupService {
    fn name(&self) -> &str {
        "http"
    }

    async fn search(&self, books: &[BookRequest]) -> Result<Vec<ResultRecord>, LookupError> {
        let request = SearchRequest::new(books.to_vec());
        debug!("Sending search request for {} books to {}", request.len(), self.search_url);

        let response = self
            .client
            .client()
            .post(&self.search_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        debug!("Response status: {}", status);

        // Read the body as text first so a bad body is a decode error, not a
        // network one.
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message().map(str::to_string));
            if message.is_none() {
                warn!("Unstructured error body with status {}", status);
            }
            return Err(LookupError::Server {
                status: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let parsed: ResultsBody = serde_json::from_str(&body)?;
        let records = parsed.into_records();
        debug!("Search results received: {} records", records.len());
        for record in records.iter().filter(|r| !r.source.is_known()) {
            debug!("Unrecognised provider: {:?}", record.source.name());
        }
        Ok(records)
    }

    async fn health(&self) -> Result<HealthStatus, LookupError> {
        let response = self.client.client().get(&self.health_url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LookupError::Server {
                status: status.as_u16(),
                message: None,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
