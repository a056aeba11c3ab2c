//! # Error Types
//!
//! The full error taxonomy:
//!
//! - [`CompileError`]: grammar source could not be compiled. Always fatal;
//!   no partial grammar exists afterwards.
//! - [`GrammarError`](crate::grammar::GrammarError): validation failures from
//!   the programmatic builder; the compiler wraps them with a [`Location`].
//! - [`ParseError`]: a top-level parse that did not succeed - either the
//!   expected steady-state [`ParseFailure`] or the hard
//!   [`ParseError::RecursionLimit`].
//!
//! Failures *inside* a parse (an alternative not matching, a repetition
//! ending, a stack operation on an empty stack) are ordinary control flow in
//! the matcher and never surface as errors.
//!
//! With the `diagnostics` feature enabled, all of these implement
//! [`miette::Diagnostic`] with labeled source spans.

pub(crate) mod report;

use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::grammar::{GrammarError, RuleId};
use crate::syntax::LineCol;

/// A position in grammar or input source: byte offset plus line/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Location {
    /// Byte offset.
    pub offset: u32,
    /// Line/column of the offset.
    pub line_col: LineCol,
}

impl Location {
    /// Create a location.
    #[must_use]
    pub const fn new(offset: u32, line_col: LineCol) -> Self {
        Self { offset, line_col }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.line_col)
    }
}

#[cfg(feature = "diagnostics")]
impl From<Location> for miette::SourceSpan {
    fn from(location: Location) -> Self {
        Self::new(miette::SourceOffset::from(location.offset as usize), 1)
    }
}

/// A grammar that could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum CompileError {
    /// A character the grammar syntax has no use for.
    #[error("unexpected character '{ch}' at {location}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(compile::unexpected_char)))]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Where it was found.
        #[cfg_attr(feature = "diagnostics", label("unexpected character"))]
        location: Location,
    },

    /// A string literal with no closing quote.
    #[error("unterminated string literal starting at {location}")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(code(compile::unterminated_string))
    )]
    UnterminatedString {
        /// Start of the literal.
        #[cfg_attr(feature = "diagnostics", label("string starts here"))]
        location: Location,
    },

    /// A block comment with no closing `*/`.
    #[error("unterminated block comment starting at {location}")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(code(compile::unterminated_comment))
    )]
    UnterminatedComment {
        /// Start of the comment.
        #[cfg_attr(feature = "diagnostics", label("comment starts here"))]
        location: Location,
    },

    /// An escape sequence the string syntax does not define.
    #[error("invalid escape sequence '{escape}' at {location}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(compile::invalid_escape)))]
    InvalidEscape {
        /// The escape as written.
        escape: String,
        /// Where it was found.
        #[cfg_attr(feature = "diagnostics", label("invalid escape"))]
        location: Location,
    },

    /// A character literal that is empty or holds more than one character.
    #[error("invalid character literal at {location}")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(code(compile::invalid_char_literal))
    )]
    InvalidCharLiteral {
        /// Where it was found.
        #[cfg_attr(feature = "diagnostics", label("invalid character literal"))]
        location: Location,
    },

    /// The parser expected different syntax here.
    #[error("expected {expected}, found {found} at {location}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(compile::unexpected_token)))]
    UnexpectedToken {
        /// What was found, rendered for humans.
        found: String,
        /// What the grammar syntax allows here.
        expected: String,
        /// Where it was found.
        #[cfg_attr(feature = "diagnostics", label("unexpected"))]
        location: Location,
    },

    /// The grammar source ended mid-definition.
    #[error("unexpected end of grammar, expected {expected}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(compile::unexpected_eof)))]
    UnexpectedEof {
        /// What the grammar syntax still required.
        expected: String,
        /// End of the source.
        #[cfg_attr(feature = "diagnostics", label("grammar ends here"))]
        location: Location,
    },

    /// Validation failed after parsing; see the wrapped [`GrammarError`].
    #[error("{source} (at {location})")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(compile::invalid_grammar)))]
    Grammar {
        /// The validation failure.
        source: GrammarError,
        /// Definition site of the offending rule.
        #[cfg_attr(feature = "diagnostics", label("defined here"))]
        location: Location,
    },
}

impl CompileError {
    /// The source location the error points at.
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::UnexpectedChar { location, .. }
            | Self::UnterminatedString { location }
            | Self::UnterminatedComment { location }
            | Self::InvalidEscape { location, .. }
            | Self::InvalidCharLiteral { location }
            | Self::UnexpectedToken { location, .. }
            | Self::UnexpectedEof { location, .. }
            | Self::Grammar { location, .. } => *location,
        }
    }
}

/// A top-level parse invocation that did not produce a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum ParseError {
    /// The input did not match; the ordinary outcome for bad input.
    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Failure(#[from] ParseFailure),

    /// The matcher exceeded its recursion budget. Aborts this invocation
    /// only; the grammar and other parses are unaffected.
    #[error("recursion limit of {limit} exceeded while parsing")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parse::recursion_limit)))]
    RecursionLimit {
        /// The configured limit that was hit.
        limit: usize,
    },
}

impl ParseError {
    /// The structured failure, when this is [`ParseError::Failure`].
    #[must_use]
    pub const fn failure(&self) -> Option<&ParseFailure> {
        match self {
            Self::Failure(failure) => Some(failure),
            Self::RecursionLimit { .. } => None,
        }
    }
}

/// Structured data for a failed parse: the furthest input offset any match
/// attempt reached, and the rules that failed exactly there.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
#[cfg_attr(feature = "diagnostics", diagnostic(code(parse::failure)))]
#[error("parse error at {}: expected {}", .location, format_expected_list(.expected))]
pub struct ParseFailure {
    #[cfg_attr(feature = "diagnostics", label("unexpected input"))]
    location: Location,
    attempted: Vec<RuleId>,
    expected: Vec<String>,
}

impl ParseFailure {
    pub(crate) fn new(location: Location, attempted: Vec<RuleId>, expected: Vec<String>) -> Self {
        Self {
            location,
            attempted,
            expected,
        }
    }

    /// The furthest byte offset reached by any match attempt.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.location.offset as usize
    }

    /// Line/column of [`ParseFailure::offset`].
    #[must_use]
    pub const fn line_col(&self) -> LineCol {
        self.location.line_col
    }

    /// The rules whose attempts failed at the furthest offset, in grammar
    /// insertion order.
    #[must_use]
    pub fn attempted_rules(&self) -> &[RuleId] {
        &self.attempted
    }

    /// Names of [`ParseFailure::attempted_rules`], same order.
    #[must_use]
    pub fn expected(&self) -> &[String] {
        &self.expected
    }
}

/// Render an expected-alternatives list: `a`, `a or b`, `a, b, or c`.
#[must_use]
pub fn format_expected_list(expected: &[String]) -> String {
    match expected {
        [] => "nothing".to_string(),
        [only] => only.clone(),
        [first, second] => format!("{first} or {second}"),
        [head @ .., last] => {
            let mut result = head.join(", ");
            result.push_str(", or ");
            result.push_str(last);
            result
        }
    }
}
