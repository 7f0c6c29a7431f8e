//! Mock lookup service for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use crate::lookup::{LookupError, LookupService};
use crate::models::{BookRequest, Provider, ResultRecord};

/// A mock service that returns a predefined outcome and records every call.
#[derive(Debug, Default)]
pub struct MockLookupService {
    response: Mutex<Option<Result<Vec<ResultRecord>, LookupError>>>,
    delay: Mutex<Option<Duration>>,
    calls: Mutex<Vec<Vec<BookRequest>>>,
}

impl MockLookupService {
    /// Create a new mock service that finds nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that returns the given records.
    pub fn with_records(records: Vec<ResultRecord>) -> Self {
        let mock = Self::new();
        mock.set_response(Ok(records));
        mock
    }

    /// Create a mock that fails with the given error.
    pub fn with_error(error: LookupError) -> Self {
        let mock = Self::new();
        mock.set_response(Err(error));
        mock
    }

    /// Set the outcome to return.
    pub fn set_response(&self, response: Result<Vec<ResultRecord>, LookupError>) {
        *lock(&self.response) = Some(response);
    }

    /// Wait this long before answering.
    pub fn set_delay(&self, delay: Duration) {
        *lock(&self.delay) = Some(delay);
    }

    /// Clear the configured outcome.
    pub fn clear_response(&self) {
        *lock(&self.response) = None;
    }

    /// Number of searches received.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// The book batches received, in call order.
    pub fn calls(&self) -> Vec<Vec<BookRequest>> {
        lock(&self.calls).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl LookupService for MockLookupService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, books: &[BookRequest]) -> Result<Vec<ResultRecord>, LookupError> {
        lock(&self.calls).push(books.to_vec());

        let delay = *lock(&self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = lock(&self.response).clone();
        response.unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Helper function to create a mock record for testing.
pub fn make_record(title: &str, author: &str, source: &str) -> ResultRecord {
    ResultRecord::new(
        title,
        author,
        Provider::from_name(source),
        format!("http://example.com/{}", source.replace(' ', "-").to_lowercase()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_defaults_to_empty() {
        let mock = MockLookupService::new();
        let records = tokio_test::block_on(mock.search(&[BookRequest::new("A", "B")])).unwrap();
        assert!(records.is_empty());
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_mock_records_calls_and_response() {
        let mock = MockLookupService::with_records(vec![make_record("A", "B", "LibGen")]);
        let books = vec![BookRequest::new("A", "B"), BookRequest::new("A", "B")];

        let records = tokio_test::block_on(mock.search(&books)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(mock.calls(), vec![books]);
    }

    #[test]
    fn test_mock_error() {
        let mock = MockLookupService::with_error(LookupError::Network("down".into()));
        let err = tokio_test::block_on(mock.search(&[])).unwrap_err();
        assert_eq!(err, LookupError::Network("down".into()));

        mock.clear_response();
        assert!(tokio_test::block_on(mock.search(&[])).is_ok());
    }

    #[test]
    fn test_make_record_link() {
        let record = make_record("Republic", "Plato", "Internet Archive");
        assert_eq!(record.source, Provider::InternetArchive);
        assert_eq!(record.link, "http://example.com/internet-archive");
    }
}
