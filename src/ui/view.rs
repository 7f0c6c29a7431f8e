//! Pure rendering of a [`SearchState`] into something a front end can draw.

use serde::Serialize;

use crate::models::Provider;
use crate::search::SearchState;
use crate::utils::GroupedResults;

/// Colour role of a provider badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Primary,
    Success,
    Warning,
    Info,
    Secondary,
}

/// Label shown next to each download link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub tone: Tone,
    /// Icon name, absent for providers without a dedicated style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
}

/// Badge for a provider
pub fn provider_badge(provider: &Provider) -> Badge {
    let (tone, icon) = match provider {
        Provider::OceanOfPdf => (Tone::Primary, Some("water")),
        Provider::LibGen => (Tone::Success, Some("book")),
        Provider::InternetArchive => (Tone::Warning, Some("archive")),
        Provider::ProjectGutenberg => (Tone::Info, Some("book-open")),
        Provider::Other(_) => (Tone::Secondary, None),
    };
    Badge {
        label: provider.name().to_string(),
        tone,
        icon,
    }
}

/// One download link in the results table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub title: String,
    pub author: String,
    /// Number of rows the title and author cells cover; set only on the first
    /// row of each book
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<usize>,
    pub badge: Badge,
    pub link: String,
}

impl ResultRow {
    /// Whether this row starts a new book
    pub fn starts_group(&self) -> bool {
        self.span.is_some()
    }
}

/// What the front end should show; exactly one panel at a time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ViewModel {
    Idle,
    Loading,
    Error {
        message: String,
    },
    Empty,
    Results {
        books: usize,
        rows: Vec<ResultRow>,
    },
}

impl ViewModel {
    /// Name of the visible panel
    pub fn panel(&self) -> &'static str {
        match self {
            ViewModel::Idle => "idle",
            ViewModel::Loading => "loading",
            ViewModel::Error { .. } => "error",
            ViewModel::Empty => "empty",
            ViewModel::Results { .. } => "results",
        }
    }
}

/// Render a state
pub fn render(state: &SearchState) -> ViewModel {
    match state {
        SearchState::Idle => ViewModel::Idle,
        SearchState::Loading => ViewModel::Loading,
        SearchState::Error(message) => ViewModel::Error {
            message: message.clone(),
        },
        SearchState::Empty => ViewModel::Empty,
        SearchState::Results(groups) => ViewModel::Results {
            books: groups.len(),
            rows: result_rows(groups),
        },
    }
}

fn result_rows(groups: &GroupedResults) -> Vec<ResultRow> {
    let mut rows = Vec::with_capacity(groups.record_count());
    for group in groups {
        for (i, record) in group.records.iter().enumerate() {
            rows.push(ResultRow {
                title: group.key.title.clone(),
                author: group.key.author.clone(),
                span: (i == 0).then_some(group.len()),
                badge: provider_badge(&record.source),
                link: record.link.clone(),
            });
        }
    }
    rows
}
