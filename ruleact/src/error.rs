//! Source locations and the syntax error raised by the parser engine.
//!
//! [`Position`] and [`Span`] track where a token or a reduced symbol came
//! from. The `span!` macro builds an `Option<Span>` inline, which is handy in
//! tests that match on token spans.
//!
//! # Examples
//!
//! ```rust
//! # use ruleact::{Position, Span, SyntaxError, span};
//! let sp = Span::new(Position::new(0, 2), Position::new(0, 5));
//! assert!(!sp.is_empty());
//! assert_eq!(sp.merge(&Span::new(Position::new(0, 0), Position::new(0, 1))).start.column, 0);
//!
//! let err = SyntaxError::Token("+".into());
//! assert_eq!(err.to_string(), "Syntax error at '+'");
//!
//! assert!(span!(0, 0, 0, 3).is_some());
//! ```

use smartstring::alias::String;
use thiserror::Error;

/// A 0-based line/column position in source text.
#[derive(Debug, Clone, Default, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// 0-based line number.
    pub line: usize,
    /// 0-based column number (byte offset within the line).
    pub column: usize,
}

impl Position {
    /// Creates a new `Position`.
    #[inline]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A half-open source range: `[start, end)`.
///
/// Conventionally `start <= end` in lexicographic `(line, column)` order;
/// this is not enforced.
#[derive(Debug, Clone, Default, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Creates a new `Span`.
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Returns the smallest span covering both `self` and `other`.
    #[inline]
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Merges two optional spans; `None` is the identity.
    pub fn merge_opt(a: Option<Span>, b: Option<Span>) -> Option<Span> {
        match (a, b) {
            (Some(a), Some(b)) => Some(a.merge(&b)),
            (a, None) => a,
            (None, b) => b,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Raised by the parser engine when the table has no action for the
/// incoming token.
///
/// The message format is the one printed to users, so callers can report the
/// error with its `Display` impl and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// An unexpected token; carries the token's source text.
    #[error("Syntax error at '{0}'")]
    Token(String),

    /// Input ended while a statement was still open.
    #[error("Syntax error at EOF")]
    Eof,
}

/// Build an `Option<Span>` inline from 0-based line/column coordinates.
///
/// ```rust
/// # use ruleact::span;
/// let s = span!(0, 1, 0, 5);
/// assert_eq!(s.unwrap().end.column, 5);
/// ```
#[macro_export]
macro_rules! span {
    ($line_start:expr, $col_start:expr, $line_end:expr, $col_end:expr) => {
        Some($crate::Span {
            start: $crate::Position { line: $line_start, column: $col_start },
            end: $crate::Position { line: $line_end, column: $col_end },
        })
    };
}
