//! # Syntax Module
//!
//! The parse-result surface: spans and positions over the borrowed input,
//! the line index used for diagnostics, and the token/pair views over the
//! flat event queue the matcher produces.
//!
//! A successful parse yields [`Pairs`], a restartable iterator of [`Pair`]s.
//! Each pair is one rule match: a span of the input, the matching rule's id,
//! and its nested children. Underneath, all pairs share a single immutable
//! event queue; navigation is index arithmetic, never tree allocation.

pub mod line_col;
pub mod pair;
pub mod span;
pub mod tokens;

pub use line_col::{LineCol, LineIndex};
pub use pair::{Pair, Pairs};
pub use span::{Position, Span};
pub use tokens::{Token, Tokens};

pub(crate) use tokens::TokenEvent;
