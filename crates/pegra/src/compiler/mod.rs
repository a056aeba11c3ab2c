//! # Grammar Compiler
//!
//! Compiles grammar source text into a [`Grammar`].
//!
//! Rules are written `name = modifier? { expression }` with the modifiers
//! `_` (silent), `@` (atomic), `$` (compound-atomic), and `!` (non-atomic).
//! Expressions combine literals (`"text"`, `^"text"` for case-insensitive),
//! character ranges (`'a'..'z'`), rule references, the built-in rules
//! (`ANY`, `SOI`, `EOI`, `ASCII_DIGIT`, …), stack operators
//! (`PUSH(expr)`, `POP`, `PEEK`), sequences `~`, ordered choices `|`,
//! predicates `&`/`!`, and repetitions `*`, `+`, `?`, `{n}`, `{m,n}`,
//! `{m,}`, `{,n}`. Whitespace and `//`-line or `/* */`-block comments
//! separate tokens.
//!
//! Compilation is pure and deterministic: the same source yields a
//! structurally identical grammar, and any error aborts with no grammar at
//! all. Parsing goes through the same
//! [`GrammarBuilder`](crate::grammar::GrammarBuilder) validation as
//! programmatic construction; this module's contribution on top is source
//! locations on every error.

pub(crate) mod lexer;
pub(crate) mod parser;

use compact_str::CompactString;
use hashbrown::HashMap;

use crate::error::{CompileError, Location};
use crate::grammar::{Grammar, GrammarBuilder, GrammarError};
use crate::syntax::LineIndex;

/// Compile grammar source text.
///
/// # Errors
///
/// Any lexical, syntactic, or validation problem aborts compilation with a
/// [`CompileError`] carrying the relevant source location.
pub fn compile(source: &str) -> Result<Grammar, CompileError> {
    let index = LineIndex::new(source);
    let tokens = lexer::tokenize(source, &index)?;
    let parsed = parser::parse_rules(source.len(), tokens, &index)?;
    let ref_sites = parsed.ref_sites;

    let mut def_sites: HashMap<CompactString, Vec<u32>, ahash::RandomState> = HashMap::default();
    let mut builder = GrammarBuilder::new();
    for rule in parsed.rules {
        def_sites
            .entry(rule.name.clone())
            .or_default()
            .push(rule.offset);
        builder = builder.rule(rule.name, rule.modifier, rule.expr);
    }

    builder.build().map_err(|error| {
        let offset = match &error {
            // Point at the second definition, the one that collides.
            GrammarError::DuplicateRule { name } => def_sites
                .get(name.as_str())
                .and_then(|sites| sites.get(1).or_else(|| sites.first()))
                .copied(),
            GrammarError::UndefinedRule { name } => ref_sites.get(name.as_str()).copied(),
            GrammarError::ReservedRule { name } | GrammarError::NullableRepetition { rule: name } => {
                def_sites
                    .get(name.as_str())
                    .and_then(|sites| sites.first())
                    .copied()
            }
            GrammarError::LeftRecursion { cycle } => cycle
                .first()
                .and_then(|name| def_sites.get(name.as_str()))
                .and_then(|sites| sites.first())
                .copied(),
            GrammarError::InvalidRepeat { .. } => None,
        }
        .unwrap_or(0);

        CompileError::Grammar {
            source: error,
            location: Location::new(offset, index.line_col(offset as usize)),
        }
    })
}
