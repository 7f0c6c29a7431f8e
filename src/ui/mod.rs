//! Presentation helpers.
//!
//! [`render`] turns a [`SearchState`](crate::search::SearchState) into a
//! [`ViewModel`] without touching the terminal, so it can be tested directly.
//! The rest of this module styles that model for a terminal: status icons,
//! coloured provider badges and a loading spinner.

mod view;

pub use view::{provider_badge, render, Badge, ResultRow, Tone, ViewModel};

use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
}

/// Status icons for different outcomes.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
    }
}

/// Format a status line with a coloured icon.
pub fn status_line(status: Status, msg: &str) -> String {
    let icon = status_icon(status);
    let icon = match status {
        Status::Success => icon.green().bold().to_string(),
        Status::Error => icon.red().bold().to_string(),
        Status::Warning => icon.yellow().bold().to_string(),
    };
    format!("{} {}", icon, msg)
}

/// Terminal glyph for a badge icon name.
pub fn badge_glyph(icon: Option<&str>) -> &'static str {
    match icon {
        Some("water") => "🌊",
        Some("book") => "📗",
        Some("archive") => "🗄",
        Some("book-open") => "📖",
        _ => "📄",
    }
}

/// Badge text coloured by tone.
pub fn styled_badge(badge: &Badge) -> String {
    let text = format!("{} {}", badge_glyph(badge.icon), badge.label);
    match badge.tone {
        Tone::Primary => text.blue().bold().to_string(),
        Tone::Success => text.green().bold().to_string(),
        Tone::Warning => text.yellow().bold().to_string(),
        Tone::Info => text.cyan().bold().to_string(),
        Tone::Secondary => text.dimmed().to_string(),
    }
}

/// Truncate text to fit within the specified width using unicode-aware truncation.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width <= 3 {
        return "...".to_string();
    }

    if unicode_width::UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }

    let budget = max_width - 3;
    let mut width = 0;
    let mut truncated = String::new();
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(1);
        if width + w > budget {
            break;
        }
        width += w;
        truncated.push(c);
    }

    format!("{}...", truncated)
}

/// Loading spinner shown while a search is in flight.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        let style = indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed}")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ");
        pb.set_style(style);
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Remove the spinner from the terminal.
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_icon() {
        assert_eq!(status_icon(Status::Success), "✓");
        assert_eq!(status_icon(Status::Error), "✗");
        assert_eq!(status_icon(Status::Warning), "⚠");
    }

    #[test]
    fn test_status_line_keeps_message() {
        assert!(status_line(Status::Warning, "No results").ends_with("No results"));
    }

    #[test]
    fn test_badge_glyph() {
        assert_eq!(badge_glyph(Some("water")), "🌊");
        assert_eq!(badge_glyph(None), "📄");
    }

    #[test]
    fn test_styled_badge_contains_label() {
        let badge = provider_badge(&crate::models::Provider::LibGen);
        assert!(styled_badge(&badge).contains("LibGen"));
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("Hello", 10), "Hello");
        assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
        assert_eq!(truncate_with_ellipsis("", 10), "");
        assert_eq!(truncate_with_ellipsis("Hello", 3), "...");
        assert_eq!(truncate_with_ellipsis("日本語の本", 7), "日本...");
    }
}
