//! Highlight markup tokenizer.
//!
//! The backend returns snippets as plain text interleaved with marked spans:
//!
//! ```text
//! snippet  := (text | open text close)*
//! ```
//!
//! [`parse_segments`] consumes that grammar into [`Segment`]s, and [`tokenize`] splits the
//! segments into whitespace-delimited [`Token`]s. Malformed markup is tolerated: an open
//! marker inside a marked span is ignored, a close marker outside one is dropped, and an
//! unterminated span runs to the end of the snippet.

use std::mem;

use serde::Serialize;

/// Default marker that opens a highlighted span.
pub const DEFAULT_OPEN: &str = "<em>";

/// Default marker that closes a highlighted span.
pub const DEFAULT_CLOSE: &str = "</em>";

/// The pair of markers delimiting highlighted spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    /// Opening marker.
    open: String,
    /// Closing marker.
    close: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self::new(DEFAULT_OPEN, DEFAULT_CLOSE)
    }
}

impl Markers {
    /// Creates a marker pair.
    ///
    /// Empty markers would match everywhere; they fall back to the defaults.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        let open = open.into();
        let close = close.into();
        if open.is_empty() || close.is_empty() {
            return Self {
                open: DEFAULT_OPEN.to_string(),
                close: DEFAULT_CLOSE.to_string(),
            };
        }
        Self { open, close }
    }

    /// Returns the opening marker.
    pub fn open(&self) -> &str {
        &self.open
    }

    /// Returns the closing marker.
    pub fn close(&self) -> &str {
        &self.close
    }
}

/// A run of snippet text, either inside or outside a highlighted span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Text with markers removed.
    pub text: String,
    /// Whether the text was inside a highlighted span.
    pub emphasized: bool,
}

/// A whitespace-delimited unit of a snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A word with no highlighted text.
    Plain(String),
    /// The highlighted text of a matched word.
    ///
    /// A word holding several highlighted spans (`<em>old</em>-<em>man</em>`) yields one
    /// `Match` per span; unhighlighted glue around a span (`<em>sea</em>,`) is dropped.
    Match(String),
}

/// Splits a snippet into marked and unmarked segments.
struct MarkupLexer<'a> {
    /// Marker pair being recognised.
    markers: &'a Markers,
    /// Unconsumed input.
    rest: &'a str,
    /// Whether the lexer is inside a highlighted span.
    emphasized: bool,
}

impl<'a> MarkupLexer<'a> {
    /// Creates a lexer over `input`.
    fn new(input: &'a str, markers: &'a Markers) -> Self {
        Self {
            markers,
            rest: input,
            emphasized: false,
        }
    }

    /// Consumes the entire input.
    fn segments(mut self) -> Vec<Segment> {
        let mut segments = Vec::new();
        while let Some(segment) = self.next_segment() {
            if !segment.text.is_empty() {
                segments.push(segment);
            }
        }
        segments
    }

    /// Returns the next segment, or None at end of input.
    fn next_segment(&mut self) -> Option<Segment> {
        if self.rest.is_empty() {
            return None;
        }

        let emphasized = self.emphasized;
        let mut text = String::new();

        while !self.rest.is_empty() {
            if let Some(after) = self.rest.strip_prefix(self.markers.open.as_str()) {
                self.rest = after;
                if !self.emphasized {
                    self.emphasized = true;
                    break;
                }
                continue;
            }
            if let Some(after) = self.rest.strip_prefix(self.markers.close.as_str()) {
                self.rest = after;
                if self.emphasized {
                    self.emphasized = false;
                    break;
                }
                continue;
            }

            let Some(ch) = self.rest.chars().next() else {
                break;
            };
            text.push(ch);
            self.rest = &self.rest[ch.len_utf8()..];
        }

        Some(Segment { text, emphasized })
    }
}

/// Parses a highlighted snippet into segments, dropping empty ones.
pub fn parse_segments(snippet: &str, markers: &Markers) -> Vec<Segment> {
    MarkupLexer::new(snippet, markers).segments()
}

/// Accumulates characters of the word currently being read.
#[derive(Default)]
struct WordBuilder {
    /// Unhighlighted characters of the word.
    plain: String,
    /// Completed highlighted spans of the word.
    matches: Vec<String>,
    /// Highlighted span still being read.
    current: Option<String>,
}

impl WordBuilder {
    /// Adds one character of the word.
    fn push(&mut self, ch: char, emphasized: bool) {
        if emphasized {
            self.current.get_or_insert_with(String::new).push(ch);
        } else {
            self.end_span();
            self.plain.push(ch);
        }
    }

    /// Closes the highlighted span being read, if any.
    fn end_span(&mut self) {
        if let Some(span) = self.current.take() {
            self.matches.push(span);
        }
    }

    /// Emits the finished word and resets the builder.
    fn finish(&mut self, tokens: &mut Vec<Token>) {
        self.end_span();
        if !self.matches.is_empty() {
            tokens.extend(self.matches.drain(..).map(Token::Match));
        } else if !self.plain.is_empty() {
            tokens.push(Token::Plain(mem::take(&mut self.plain)));
        }
        self.plain.clear();
    }
}

/// Splits a highlighted snippet into plain and matched tokens.
pub fn tokenize(snippet: &str, markers: &Markers) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = WordBuilder::default();

    for segment in parse_segments(snippet, markers) {
        for ch in segment.text.chars() {
            if ch.is_whitespace() {
                word.finish(&mut tokens);
            } else {
                word.push(ch, segment.emphasized);
            }
        }
        word.end_span();
    }
    word.finish(&mut tokens);

    tokens
}
