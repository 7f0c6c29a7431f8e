//! Basic usage example for the Book Finder library.
//!
//! Runs one search against a canned lookup service and prints the grouped
//! results. Point `HttpLookupService` at a real server to do the same over HTTP.

use book_finder::lookup::mock::make_record;
use book_finder::lookup::MockLookupService;
use book_finder::search::SearchOrchestrator;
use book_finder::ui::{render, styled_badge, ViewModel};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let service = Arc::new(MockLookupService::with_records(vec![
        make_record("Republic", "Plato", "Project Gutenberg"),
        make_record("Dune", "Frank Herbert", "OceanOfPDF"),
        make_record("Republic", "Plato", "Internet Archive"),
    ]));

    let mut orchestrator = SearchOrchestrator::new(service);

    let input = "Republic – Plato\nDune - Frank Herbert\nThe Hobbit — J.R.R. Tolkien";
    println!("Searching for:\n{}\n", input);

    let state = orchestrator.search(input).await;

    match render(&state) {
        ViewModel::Results { books, rows } => {
            println!("Found {} links for {} books", rows.len(), books);
            for row in rows {
                if row.starts_group() {
                    println!("\n{} by {}", row.title, row.author);
                }
                println!("  {} {}", styled_badge(&row.badge), row.link);
            }
        }
        ViewModel::Empty => println!("Nothing found"),
        ViewModel::Error { message } => eprintln!("Error: {}", message),
        other => println!("Unexpected state: {}", other.panel()),
    }

    println!("\nAs JSON:\n{}", serde_json::to_string_pretty(&render(&state))?);

    Ok(())
}
