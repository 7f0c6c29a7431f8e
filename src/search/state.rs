//! The orchestrator's current phase.

use crate::utils::GroupedResults;

/// Exactly one of these is current at any time.
///
/// `Idle` is the initial state and is re-entered at the start of every search
/// (clearing whatever the previous search showed). `Error`, `Empty` and
/// `Results` end a search; any of them can be followed by a new search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchState {
    #[default]
    Idle,
    Loading,
    Error(String),
    Empty,
    Results(GroupedResults),
}

impl SearchState {
    /// Short lowercase name of the state
    pub fn name(&self) -> &'static str {
        match self {
            SearchState::Idle => "idle",
            SearchState::Loading => "loading",
            SearchState::Error(_) => "error",
            SearchState::Empty => "empty",
            SearchState::Results(_) => "results",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading)
    }

    /// Whether a search has finished in this state
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            SearchState::Error(_) | SearchState::Empty | SearchState::Results(_)
        )
    }

    /// The error message, in the error state
    pub fn error_message(&self) -> Option<&str> {
        match self {
            SearchState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    /// The grouped results, in the results state
    pub fn results(&self) -> Option<&GroupedResults> {
        match self {
            SearchState::Results(groups) => Some(groups),
            _ => None,
        }
    }
}

impl std::fmt::Display for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchState::Error(msg) => write!(f, "error: {}", msg),
            SearchState::Results(groups) => write!(
                f,
                "results: {} books, {} links",
                groups.len(),
                groups.record_count()
            ),
            other => write!(f, "{}", other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(SearchState::default(), SearchState::Idle);
        assert!(!SearchState::Idle.is_settled());
    }

    #[test]
    fn test_settled_states() {
        assert!(SearchState::Empty.is_settled());
        assert!(SearchState::Error("x".into()).is_settled());
        assert!(SearchState::Results(GroupedResults::default()).is_settled());
        assert!(!SearchState::Loading.is_settled());
        assert!(SearchState::Loading.is_loading());
    }

    #[test]
    fn test_accessors() {
        let state = SearchState::Error("db down".into());
        assert_eq!(state.error_message(), Some("db down"));
        assert!(state.results().is_none());
        assert_eq!(state.to_string(), "error: db down");
        assert_eq!(SearchState::Empty.to_string(), "empty");
    }
}
