//! # Matching Engine
//!
//! Executes a compiled [`Grammar`] against an input string.
//!
//! Matching is pure, synchronous, and single-threaded per invocation: the
//! grammar and input are immutable borrows, and all mutable state lives in a
//! per-call context. Any number of parses may run concurrently against the
//! same grammar.
//!
//! ## Entry points
//!
//! - [`parse`] - match a rule at offset zero with default limits.
//! - [`parse_at`] - match starting at a given byte offset.
//! - [`parse_with_config`] - override the recursion budget.
//!
//! A successful parse returns [`Pairs`] over the input; a failed one returns
//! [`ParseError::Failure`] carrying the furthest failure position and the
//! rules expected there. The only other outcome is
//! [`ParseError::RecursionLimit`].

pub mod config;
pub(crate) mod context;
pub(crate) mod matcher;
pub(crate) mod stack;

pub use config::{ParseConfig, DEFAULT_RECURSION_LIMIT};

use std::sync::Arc;

use crate::engine::context::MatchContext;
use crate::engine::matcher::Outcome;
use crate::error::{report, ParseError};
use crate::grammar::{Grammar, RuleId};
use crate::syntax::Pairs;

/// Match `rule` against `input` from the beginning.
///
/// # Errors
///
/// [`ParseError::Failure`] when the input does not match, or
/// [`ParseError::RecursionLimit`] if the default recursion budget is
/// exceeded.
pub fn parse<'i>(
    grammar: &Grammar,
    rule: RuleId,
    input: &'i str,
) -> Result<Pairs<'i>, ParseError> {
    run(grammar, rule, input, 0, &ParseConfig::default())
}

/// Match `rule` against `input` starting at byte offset `start`.
///
/// # Errors
///
/// As [`parse`].
///
/// # Panics
///
/// Panics if `start` is past the end of `input` or not on a character
/// boundary.
pub fn parse_at<'i>(
    grammar: &Grammar,
    rule: RuleId,
    input: &'i str,
    start: usize,
) -> Result<Pairs<'i>, ParseError> {
    run(grammar, rule, input, start, &ParseConfig::default())
}

/// Match `rule` against `input` with an explicit [`ParseConfig`].
///
/// # Errors
///
/// As [`parse`].
pub fn parse_with_config<'i>(
    grammar: &Grammar,
    rule: RuleId,
    input: &'i str,
    config: &ParseConfig,
) -> Result<Pairs<'i>, ParseError> {
    run(grammar, rule, input, 0, config)
}

impl Grammar {
    /// Convenience for [`parse`]: `grammar.parse(rule, input)`.
    ///
    /// # Errors
    ///
    /// As [`parse`].
    pub fn parse<'i>(&self, rule: RuleId, input: &'i str) -> Result<Pairs<'i>, ParseError> {
        parse(self, rule, input)
    }
}

fn run<'i>(
    grammar: &Grammar,
    rule: RuleId,
    input: &'i str,
    start: usize,
    config: &ParseConfig,
) -> Result<Pairs<'i>, ParseError> {
    assert!(
        start <= input.len() && input.is_char_boundary(start),
        "start offset {start} is not a character boundary of the input"
    );

    let mut ctx = MatchContext::new(grammar, input, start, rule, config);
    match matcher::match_rule(&mut ctx, rule)? {
        Outcome::Matched => {
            let len = ctx.queue.len();
            Ok(Pairs::new(Arc::new(ctx.queue), input, 0, len))
        }
        Outcome::Failed => {
            let (pos, attempted) = ctx.tracker.into_parts();
            Err(ParseError::Failure(report::build_failure(
                grammar, input, pos, attempted,
            )))
        }
    }
}
