//! # Pegra
//!
//! A parsing expression grammar (PEG) engine: compile a grammar once, then
//! run eager, non-backtracking matches against any number of inputs and
//! navigate the results as a tree of pairs.
//!
//! ## Overview
//!
//! - **Compiled grammars**: [`compile`] turns grammar source text into an
//!   immutable [`Grammar`]; [`GrammarBuilder`] does the same from code.
//!   Undefined or duplicate rules, reserved names, malformed repetitions,
//!   and unguarded left recursion are all rejected at compile time.
//! - **PEG matching**: ordered choice with first-match-wins, eager
//!   repetition, predicates, atomic and silent rules, implicit
//!   `WHITESPACE`/`COMMENT` injection, and a `PUSH`/`POP`/`PEEK` match
//!   stack for re-matching identical text.
//! - **Pairs API**: a successful [`parse`] yields [`Pairs`] - nested,
//!   ordered spans of the input, one per rule match.
//! - **Precise failures**: a failed parse reports the furthest offset
//!   reached and the rules expected there, with line/column positions.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pegra::{compile, parse};
//!
//! let grammar = compile(r#"
//!     WHITESPACE = _{ " " }
//!     sum        = { num ~ ("+" ~ num)* }
//!     num        = @{ ASCII_DIGIT+ }
//! "#)?;
//!
//! let sum = grammar.rule_id("sum").unwrap();
//! let pairs = parse(&grammar, sum, "12 + 34 + 56")?;
//!
//! for pair in pairs.clone().next().unwrap().into_inner() {
//!     println!("{}: {:?}", grammar.name(pair.as_rule()), pair.as_str());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`grammar`] - Grammar model, builder, and validation
//! - [`compiler`] - Grammar source text compiler
//! - [`engine`] - The matching engine
//! - [`syntax`] - Pairs, tokens, spans, and positions
//! - [`error`] - Error types and failure reporting
//! - [`testing`] - Parse-tree rendering helpers for tests
//!
//! ## Concurrency
//!
//! A [`Grammar`] is immutable after construction and shareable across
//! threads; every parse owns its state, so concurrent parses need no
//! synchronization. Matching performs no I/O and never blocks.

pub mod compiler;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod syntax;
pub mod testing;

// Re-export the working surface at the crate root.
pub use compiler::compile;
pub use engine::{parse, parse_at, parse_with_config, ParseConfig, DEFAULT_RECURSION_LIMIT};
pub use error::{CompileError, Location, ParseError, ParseFailure};
pub use grammar::{Expr, Grammar, GrammarBuilder, GrammarError, Modifier, RuleId};
pub use syntax::{LineCol, LineIndex, Pair, Pairs, Position, Span, Token, Tokens};
