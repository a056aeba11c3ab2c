//! Builds a [`ParseFailure`] from the matcher's failure tracking.

use crate::error::{Location, ParseFailure};
use crate::grammar::{Grammar, RuleId};
use crate::syntax::LineIndex;

/// Assemble the diagnostic for a failed top-level parse.
///
/// `attempted` holds the rules whose attempts failed at `offset`, the
/// furthest position any attempt reached. Rules are reported in grammar
/// insertion order, deduplicated.
pub(crate) fn build_failure(
    grammar: &Grammar,
    input: &str,
    offset: usize,
    mut attempted: Vec<RuleId>,
) -> ParseFailure {
    attempted.sort_unstable();
    attempted.dedup();

    let expected = attempted
        .iter()
        .map(|id| grammar.name(*id).to_string())
        .collect();

    let line_col = LineIndex::new(input).line_col(offset);
    let location = Location::new(u32::try_from(offset).unwrap_or(u32::MAX), line_col);

    ParseFailure::new(location, attempted, expected)
}
