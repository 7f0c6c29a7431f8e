//! Parsing of free-text "Title – Author" lists into book requests.
//!
//! Each non-blank line must split on exactly one dash delimiter (hyphen, en
//! dash or em dash, optionally surrounded by whitespace) into a title and an
//! author. Parsing fails fast: the first bad line aborts the whole batch.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::models::BookRequest;

/// Input parsing errors
///
/// The `Display` text is shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Please enter at least one book in the format \"Title – Author\"")]
    EmptyInput,

    #[error("Line {line}: Invalid format. Use \"Title – Author\"")]
    LineFormat { line: usize },

    #[error("Line {line}: Both title and author are required")]
    MissingField { line: usize },

    #[error("No valid books found. Please check your formatting.")]
    NoValidBooks,
}

impl ParseError {
    /// The 1-based line number the error refers to, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::LineFormat { line } | ParseError::MissingField { line } => Some(*line),
            _ => None,
        }
    }
}

static DELIMITER: OnceLock<Regex> = OnceLock::new();

/// Hyphen, en dash or em dash with any surrounding whitespace
fn delimiter() -> &'static Regex {
    DELIMITER.get_or_init(|| {
        Regex::new(r"\s*[-\x{2013}\x{2014}]\s*").expect("valid delimiter regex")
    })
}

/// Parse a multi-line batch of "Title – Author" entries
///
/// Blank lines are skipped. Line numbers in errors count only the non-blank
/// lines, so the third entry is always "Line 3" regardless of blank lines
/// between entries. Duplicate entries are kept.
///
/// # Examples
///
/// ```
/// use book_finder::utils::parse_books;
///
/// let books = parse_books("Dune – Frank Herbert\n\nRepublic - Plato").unwrap();
/// assert_eq!(books.len(), 2);
/// assert_eq!(books[1].title, "Republic");
/// ```
pub fn parse_books(raw: &str) -> Result<Vec<BookRequest>, ParseError> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let lines: Vec<&str> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut books = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        books.push(parse_line(line, i + 1)?);
    }

    // Unreachable while every line either parses or errors; kept so an empty
    // batch can never reach the network.
    if books.is_empty() {
        return Err(ParseError::NoValidBooks);
    }

    Ok(books)
}

/// Parse a single trimmed, non-blank line
fn parse_line(line: &str, line_number: usize) -> Result<BookRequest, ParseError> {
    let parts: Vec<&str> = delimiter().split(line).collect();
    if parts.len() != 2 {
        return Err(ParseError::LineFormat { line: line_number });
    }

    let title = parts[0].trim();
    let author = parts[1].trim();
    if title.is_empty() || author.is_empty() {
        return Err(ParseError::MissingField { line: line_number });
    }

    Ok(BookRequest::new(title, author))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_line() {
        let books = parse_books("Republic – Plato").unwrap();
        assert_eq!(books, vec![BookRequest::new("Republic", "Plato")]);
    }

    #[test]
    fn test_parse_delimiter_variants() {
        for input in ["Dune – Herbert", "Dune — Herbert", "Dune - Herbert", "Dune–Herbert"] {
            assert_eq!(
                parse_books(input).unwrap(),
                vec![BookRequest::new("Dune", "Herbert")],
                "input: {input}"
            );
        }
    }

    #[test]
    fn test_parse_multiple_lines_in_order() {
        let input = "  The Republic – Plato  \n\n\tMeditations — Marcus Aurelius\r\nEthics - Spinoza\n";
        let books = parse_books(input).unwrap();
        assert_eq!(
            books,
            vec![
                BookRequest::new("The Republic", "Plato"),
                BookRequest::new("Meditations", "Marcus Aurelius"),
                BookRequest::new("Ethics", "Spinoza"),
            ]
        );
    }

    #[test]
    fn test_parse_keeps_duplicates() {
        let books = parse_books("Dune - Herbert\nDune - Herbert").unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0], books[1]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse_books(""), Err(ParseError::EmptyInput));
        assert_eq!(parse_books("   \n  "), Err(ParseError::EmptyInput));
    }

    #[test]
    fn test_parse_missing_delimiter() {
        let err = parse_books("Dune\n").unwrap_err();
        assert_eq!(err, ParseError::LineFormat { line: 1 });
        assert_eq!(err.line(), Some(1));
        assert_eq!(err.to_string(), "Line 1: Invalid format. Use \"Title – Author\"");
    }

    #[test]
    fn test_parse_too_many_delimiters() {
        // A hyphenated title splits into three parts
        let err = parse_books("Spider-Man – Stan Lee").unwrap_err();
        assert_eq!(err, ParseError::LineFormat { line: 1 });
    }

    #[test]
    fn test_parse_missing_author() {
        let err = parse_books("Dune – ").unwrap_err();
        assert_eq!(err, ParseError::MissingField { line: 1 });
        assert_eq!(err.to_string(), "Line 1: Both title and author are required");
    }

    #[test]
    fn test_parse_missing_title() {
        assert_eq!(
            parse_books("- Herbert"),
            Err(ParseError::MissingField { line: 1 })
        );
    }

    #[test]
    fn test_line_numbers_skip_blank_lines() {
        let input = "Dune - Herbert\n\n\nRepublic - Plato\n\nBroken line";
        assert_eq!(parse_books(input), Err(ParseError::LineFormat { line: 3 }));
    }

    #[test]
    fn test_first_error_wins() {
        let input = "Dune - \nBroken line";
        assert_eq!(parse_books(input), Err(ParseError::MissingField { line: 1 }));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ParseError::EmptyInput.to_string(),
            "Please enter at least one book in the format \"Title – Author\""
        );
        assert_eq!(
            ParseError::NoValidBooks.to_string(),
            "No valid books found. Please check your formatting."
        );
        assert_eq!(ParseError::NoValidBooks.line(), None);
    }
}
