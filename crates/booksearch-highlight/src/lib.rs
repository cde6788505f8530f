//! Terminal styling for booksearch.
//!
//! Syntax highlighting for the TOML and JSON the CLI prints, styled rendering of
//! highlighted search snippets, and small helpers for headers and status messages.

#![warn(missing_docs)]

use booksearch_score::{Markers, parse_segments};
use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// A syntax highlighter for terminal output.
pub struct Highlighter {
    /// Language definitions, including TOML and JSON.
    syntax_set: SyntaxSet,
    /// Color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// The theme in use.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a highlighter with the Dracula theme.
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Highlights TOML.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, "toml")
    }

    /// Highlights JSON.
    pub fn highlight_json(&self, content: &str) -> String {
        self.highlight(content, "json")
    }

    /// Highlights content with the named syntax.
    ///
    /// Unknown syntaxes fall back to plain text.
    pub fn highlight(&self, content: &str, syntax_name: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension(syntax_name)
            .or_else(|| self.syntax_set.find_syntax_by_name(syntax_name))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self.theme_set.get(self.theme);
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
        }
        output.push_str(colors::RESET);
        output
    }
}

/// ANSI color codes.
pub mod colors {
    /// Bold.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan, for headers.
    pub const CYAN: &str = "\x1b[36m";
    /// Green, for success.
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow, for warnings and matched words.
    pub const YELLOW: &str = "\x1b[33m";
    /// Dim.
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Formats a header in bold cyan.
pub fn header(text: &str) -> String {
    format!("{}{}{}{}", colors::BOLD, colors::CYAN, text, colors::RESET)
}

/// Formats a subheader in bold.
pub fn subheader(text: &str) -> String {
    format!("{}{}{}", colors::BOLD, text, colors::RESET)
}

/// Formats less important text.
pub fn dim(text: &str) -> String {
    format!("{}{}{}", colors::DIM, text, colors::RESET)
}

/// Formats a success message in green.
pub fn success(text: &str) -> String {
    format!("{}{}{}", colors::GREEN, text, colors::RESET)
}

/// Formats a warning in yellow.
pub fn warning(text: &str) -> String {
    format!("{}{}{}", colors::YELLOW, text, colors::RESET)
}

/// Returns a dimmed horizontal rule.
pub fn rule(width: usize) -> String {
    dim(&"─".repeat(width))
}

/// Renders a highlighted snippet for the terminal.
///
/// Emphasized spans are shown in bold yellow with the markers removed; whitespace runs,
/// including newlines from the stored text, collapse to a single space.
pub fn render_snippet(snippet: &str, markers: &Markers) -> String {
    let mut output = String::new();
    for segment in parse_segments(snippet, markers) {
        let text = collapse_whitespace(&segment.text);
        if segment.emphasized {
            output.push_str(colors::BOLD);
            output.push_str(colors::YELLOW);
            output.push_str(&text);
            output.push_str(colors::RESET);
        } else {
            output.push_str(&text);
        }
    }
    output.trim().to_string()
}

/// Replaces every whitespace run with one space, keeping leading and trailing space.
fn collapse_whitespace(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_space {
                output.push(' ');
            }
            in_space = true;
        } else {
            output.push(ch);
            in_space = false;
        }
    }
    output
}
