//! # Book Finder
//!
//! Client side of a batch book lookup: parse a free-text list of
//! `Title – Author` lines, send the whole batch to a lookup service in one
//! request, and group the returned download links by book.
//!
//! ## Architecture
//!
//! - [`models`]: Wire types (book requests, result records, providers)
//! - [`utils`]: Input parsing, result grouping and the shared HTTP client
//! - [`lookup`]: The lookup service trait with HTTP and mock implementations
//! - [`search`]: The search state machine and its orchestrator
//! - [`ui`]: Pure view model rendering plus terminal styling helpers
//! - [`config`]: Layered configuration
//!
//! ```rust,no_run
//! use book_finder::lookup::HttpLookupService;
//! use book_finder::search::{SearchOptions, SearchOrchestrator};
//! use book_finder::{config::Config, ui};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let service = Arc::new(HttpLookupService::new(&config)?);
//! let mut orchestrator = SearchOrchestrator::new(service)
//!     .with_options(SearchOptions::from_config(&config.http));
//!
//! let state = orchestrator.search("Republic – Plato\nDune - Frank Herbert").await;
//! println!("{:?}", ui::render(&state));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod lookup;
pub mod models;
pub mod search;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use lookup::{LookupError, LookupService};
pub use models::{BookRequest, Provider, ResultRecord};
pub use search::{SearchOrchestrator, SearchState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
