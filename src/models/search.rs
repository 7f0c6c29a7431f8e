//! Wire bodies exchanged with the lookup service.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{BookRequest, ResultRecord};

/// Body of `POST /search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Books to look up, in input order (duplicates included)
    pub books: Vec<BookRequest>,
}

impl SearchRequest {
    /// Create a new search request
    pub fn new(books: Vec<BookRequest>) -> Self {
        Self { books }
    }

    /// Get the number of books in the request
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Check if the request is empty
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// Structured error body returned with a non-2xx status
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl ErrorBody {
    /// The error message, if the body carried a non-empty string
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// A record that must arrive as a JSON object
///
/// `ResultRecord` alone would also accept a sequence, so `[[]]` would decode
/// as one blank record.
#[derive(Debug, Clone)]
pub struct WireRecord(pub ResultRecord);

impl<'de> Deserialize<'de> for WireRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        ResultRecord::deserialize(serde_json::Value::Object(fields))
            .map(WireRecord)
            .map_err(serde::de::Error::custom)
    }
}

/// Accepted shapes of a successful search response body
///
/// Anything else, including an object without a `results` array, is a
/// decode failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResultsBody {
    /// Bare JSON array of records
    List(Vec<WireRecord>),
    /// `{"results": [...]}` envelope
    Envelope { results: Vec<WireRecord> },
    /// `null`
    Null(()),
}

impl ResultsBody {
    /// Flatten to the record list
    pub fn into_records(self) -> Vec<ResultRecord> {
        match self {
            ResultsBody::List(records) | ResultsBody::Envelope { results: records } => {
                records.into_iter().map(|r| r.0).collect()
            }
            ResultsBody::Null(()) => Vec::new(),
        }
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Provider;

    #[test]
    fn test_search_request_serialization() {
        let request = SearchRequest::new(vec![BookRequest::new("Republic", "Plato")]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"books": [{"title": "Republic", "author": "Plato"}]})
        );
        assert_eq!(request.len(), 1);
        assert!(!request.is_empty());
    }

    #[test]
    fn test_results_body_list() {
        let body: ResultsBody = serde_json::from_str(
            r#"[{"title":"Republic","author":"Plato","source":"LibGen","link":"http://x"}]"#,
        )
        .unwrap();
        let records = body.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, Provider::LibGen);
    }

    #[test]
    fn test_results_body_envelope_and_null() {
        let body: ResultsBody = serde_json::from_str(
            r#"{"results":[{"title":"A","author":"B","source":"x","link":"y"}]}"#,
        )
        .unwrap();
        assert_eq!(body.into_records().len(), 1);

        let body: ResultsBody = serde_json::from_str(r#"{"results":[]}"#).unwrap();
        assert!(body.into_records().is_empty());

        let body: ResultsBody = serde_json::from_str("null").unwrap();
        assert!(body.into_records().is_empty());
    }

    #[test]
    fn test_results_body_rejects_scalars() {
        assert!(serde_json::from_str::<ResultsBody>("42").is_err());
        assert!(serde_json::from_str::<ResultsBody>("\"oops\"").is_err());
    }

    #[test]
    fn test_results_body_rejects_objects_without_results() {
        assert!(serde_json::from_str::<ResultsBody>("{}").is_err());
        assert!(serde_json::from_str::<ResultsBody>(r#"{"error":"db down"}"#).is_err());
        assert!(serde_json::from_str::<ResultsBody>(r#"{"foo":1}"#).is_err());
        assert!(serde_json::from_str::<ResultsBody>(r#"{"results":null}"#).is_err());
    }

    #[test]
    fn test_results_body_rejects_non_object_records() {
        assert!(serde_json::from_str::<ResultsBody>("[[]]").is_err());
        assert!(serde_json::from_str::<ResultsBody>(r#"[["a","b","c","d"]]"#).is_err());
        assert!(serde_json::from_str::<ResultsBody>("[null]").is_err());
        assert!(serde_json::from_str::<ResultsBody>(r#"{"results":[[]]}"#).is_err());
    }

    #[test]
    fn test_wire_record_keeps_lenient_fields() {
        let body: ResultsBody = serde_json::from_str(r#"[{"title":"Dune"}]"#).unwrap();
        let records = body.into_records();
        assert_eq!(records[0].title, "Dune");
        assert_eq!(records[0].author, "");
        assert_eq!(records[0].link, "");
    }

    #[test]
    fn test_error_body_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"error":"db down"}"#).unwrap();
        assert_eq!(body.message(), Some("db down"));

        let body: ErrorBody = serde_json::from_str(r#"{"error":""}"#).unwrap();
        assert_eq!(body.message(), None);

        let body: ErrorBody = serde_json::from_str(r#"{"error":17}"#).unwrap();
        assert_eq!(body.message(), None);

        let body: ErrorBody = serde_json::from_str(r#"{"detail":"x"}"#).unwrap();
        assert_eq!(body.message(), None);
    }
}
