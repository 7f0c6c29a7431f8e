//! Utility modules supporting book lookups.
//!
//! - [`parse_books`]: Parse a free-text "Title – Author" list into [`BookRequest`](crate::models::BookRequest)s
//! - [`ParseError`]: Why a list was rejected, with the user-facing message as its `Display`
//! - [`group_results`]: Group availability records by book, preserving first-seen order
//! - [`GroupedResults`], [`BookGroup`], [`BookKey`]: The grouped structure handed to rendering
//! - [`HttpClient`]: Shared HTTP client built from [`HttpConfig`](crate::config::HttpConfig)
//!
//! # Parsing and grouping
//!
//! ```rust
//! use book_finder::models::{Provider, ResultRecord};
//! use book_finder::utils::{group_results, parse_books};
//!
//! let books = parse_books("Republic – Plato\nDune - Frank Herbert").unwrap();
//! assert_eq!(books.len(), 2);
//!
//! let grouped = group_results(vec![
//!     ResultRecord::new("Republic", "Plato", Provider::LibGen, "http://a"),
//!     ResultRecord::new("Republic", "Plato", Provider::ProjectGutenberg, "http://b"),
//! ]);
//! assert_eq!(grouped.len(), 1);
//! assert_eq!(grouped.record_count(), 2);
//! ```

mod group;
mod http;
mod parse;

pub use group::{group_results, BookGroup, BookKey, GroupedResults};
pub use http::HttpClient;
pub use parse::{parse_books, ParseError};
