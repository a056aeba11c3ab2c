//! # Testing Utilities
//!
//! Helpers for asserting on parse-tree structure in tests. The rendered
//! form is one line per pair, indented by nesting depth:
//!
//! ```text
//! expr 0..5 "1+2+3"
//!   num 0..1 "1"
//!   num 2..3 "2"
//!   num 4..5 "3"
//! ```

use std::fmt::Write;

use crate::grammar::Grammar;
use crate::syntax::{Pair, Pairs};

/// Render a pair forest with rule names resolved through `grammar`.
#[must_use]
pub fn render_pairs(grammar: &Grammar, pairs: Pairs<'_>) -> String {
    let mut out = String::new();
    for pair in pairs {
        render_into(grammar, &pair, 0, &mut out);
    }
    out
}

/// Render a single pair and its subtree.
#[must_use]
pub fn render_pair(grammar: &Grammar, pair: &Pair<'_>) -> String {
    let mut out = String::new();
    render_into(grammar, pair, 0, &mut out);
    out
}

fn render_into(grammar: &Grammar, pair: &Pair<'_>, depth: usize, out: &mut String) {
    let span = pair.as_span();
    let _ = writeln!(
        out,
        "{:indent$}{} {}..{} {:?}",
        "",
        grammar.name(pair.as_rule()),
        span.start(),
        span.end(),
        span.as_str(),
        indent = depth * 2
    );
    for child in pair.clone().into_inner() {
        render_into(grammar, &child, depth + 1, out);
    }
}
