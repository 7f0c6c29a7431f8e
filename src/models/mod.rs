//! Core data models for book lookups.

mod book;
mod search;

pub use book::{BookRequest, Provider, ResultRecord};
pub use search::{ErrorBody, HealthStatus, ResultsBody, SearchRequest, WireRecord};
