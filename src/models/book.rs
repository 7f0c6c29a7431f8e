//! Book request and availability record models.

use serde::{Deserialize, Serialize};

/// The provider that reported a download location for a book
///
/// Known providers get their own variant so the presentation layer can style
/// them; any other name is carried verbatim in [`Provider::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "OceanOfPDF")]
    OceanOfPdf,
    #[serde(rename = "LibGen")]
    LibGen,
    #[serde(rename = "Internet Archive")]
    InternetArchive,
    #[serde(rename = "Project Gutenberg")]
    ProjectGutenberg,
    #[serde(untagged)]
    Other(String),
}

impl Provider {
    /// Returns the provider name exactly as the lookup service reports it
    pub fn name(&self) -> &str {
        match self {
            Provider::OceanOfPdf => "OceanOfPDF",
            Provider::LibGen => "LibGen",
            Provider::InternetArchive => "Internet Archive",
            Provider::ProjectGutenberg => "Project Gutenberg",
            Provider::Other(s) => s,
        }
    }

    /// Map a raw provider name to its variant
    pub fn from_name(name: &str) -> Self {
        match name {
            "OceanOfPDF" => Provider::OceanOfPdf,
            "LibGen" => Provider::LibGen,
            "Internet Archive" => Provider::InternetArchive,
            "Project Gutenberg" => Provider::ProjectGutenberg,
            other => Provider::Other(other.to_string()),
        }
    }

    /// Whether this is one of the providers the service knows about
    pub fn is_known(&self) -> bool {
        !matches!(self, Provider::Other(_))
    }
}

impl Default for Provider {
    fn default() -> Self {
        Provider::Other(String::new())
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single book to look up, parsed from one "Title – Author" line
///
/// Both fields are trimmed and non-empty when produced by
/// [`parse_books`](crate::utils::parse_books).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookRequest {
    pub title: String,
    pub author: String,
}

impl BookRequest {
    /// Create a new book request
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }
}

impl std::fmt::Display for BookRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} – {}", self.title, self.author)
    }
}

/// One provider's availability entry for a book
///
/// Records are taken verbatim from the lookup service. Missing fields decode
/// as empty strings rather than failing the whole response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Book title as reported by the service
    #[serde(default)]
    pub title: String,

    /// Book author as reported by the service
    #[serde(default)]
    pub author: String,

    /// Provider the link points at
    #[serde(default)]
    pub source: Provider,

    /// Download URL (not checked for reachability)
    #[serde(default)]
    pub link: String,
}

impl ResultRecord {
    /// Create a new result record
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        source: Provider,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            source,
            link: link.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_deserialize_known_and_other() {
        let known: Provider = serde_json::from_str("\"Internet Archive\"").unwrap();
        assert_eq!(known, Provider::InternetArchive);

        let other: Provider = serde_json::from_str("\"Z-Library\"").unwrap();
        assert_eq!(other, Provider::Other("Z-Library".to_string()));
        assert!(!other.is_known());
    }

    #[test]
    fn test_provider_serializes_verbatim() {
        assert_eq!(
            serde_json::to_string(&Provider::OceanOfPdf).unwrap(),
            "\"OceanOfPDF\""
        );
        assert_eq!(
            serde_json::to_string(&Provider::Other("Anna's Archive".into())).unwrap(),
            "\"Anna's Archive\""
        );
    }

    #[test]
    fn test_provider_from_name_matches_name() {
        for name in ["OceanOfPDF", "LibGen", "Internet Archive", "Project Gutenberg", "misc"] {
            assert_eq!(Provider::from_name(name).name(), name);
        }
    }

    #[test]
    fn test_result_record_missing_fields_default() {
        let record: ResultRecord =
            serde_json::from_str(r#"{"title": "Republic", "source": "LibGen"}"#).unwrap();
        assert_eq!(record.title, "Republic");
        assert_eq!(record.author, "");
        assert_eq!(record.source, Provider::LibGen);
        assert_eq!(record.link, "");
    }

    #[test]
    fn test_book_request_display() {
        let book = BookRequest::new("Dune", "Frank Herbert");
        assert_eq!(book.to_string(), "Dune – Frank Herbert");
    }
}
