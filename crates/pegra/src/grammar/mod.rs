//! # Grammar Module
//!
//! Compiled grammar representation and the programmatic builder API.
//!
//! A [`Grammar`] is an arena of named rules. Rule references inside
//! expressions are [`RuleId`]s - plain indices into the arena - so recursive
//! and mutually recursive grammars involve no ownership cycles, and a built
//! grammar is immutable and freely shareable across threads. Rule names are
//! interned; diagnostics resolve them back through the grammar.
//!
//! Grammars come from two places:
//!
//! - [`crate::compile`] parses grammar source text, or
//! - [`GrammarBuilder`] assembles rules from [`Expr`] values in code.
//!
//! Both run the same validation: undefined or reserved names, malformed
//! repetition bounds, repetitions that cannot make progress, and rules that
//! can recurse into themselves without consuming input are all rejected.

pub mod builder;
pub mod expr;
pub mod validate;

pub use builder::GrammarBuilder;
pub use expr::Expr;
pub use validate::GrammarError;

pub(crate) use expr::Node;

use hashbrown::HashMap;
use lasso::{Rodeo, RodeoReader, Spur};

/// Identifier of a rule within one [`Grammar`].
///
/// A `RuleId` is an index into the grammar's rule arena. Ids are only
/// meaningful together with the grammar that produced them; resolve a name
/// with [`Grammar::rule_id`] and go back with [`Grammar::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(pub(crate) u32);

impl RuleId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a rule's matches surface in the parse result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Modifier {
    /// Emit a pair; implicit whitespace applies inside.
    #[default]
    Normal,
    /// No pair for this rule itself; descendants surface normally.
    Silent,
    /// No implicit whitespace inside, and descendants emit no pairs.
    Atomic,
    /// No implicit whitespace inside; descendants still emit pairs.
    CompoundAtomic,
    /// Restores normal matching even under an atomic ancestor.
    NonAtomic,
}

/// One rule in the arena.
#[derive(Debug, Clone)]
pub(crate) struct Rule {
    pub(crate) name: Spur,
    pub(crate) node: Node,
    pub(crate) modifier: Modifier,
    pub(crate) builtin: bool,
}

/// A compiled, immutable grammar.
///
/// Produced by [`crate::compile`] or [`GrammarBuilder::build`]. Holds the
/// rule arena, the interned name table, and the ids of the implicit
/// `WHITESPACE`/`COMMENT` rules when the grammar defines them. Shareable
/// read-only across concurrent parses.
pub struct Grammar {
    rules: Vec<Rule>,
    names: RodeoReader,
    by_name: HashMap<Spur, RuleId, ahash::RandomState>,
    whitespace: Option<RuleId>,
    comment: Option<RuleId>,
}

impl Grammar {
    pub(crate) fn new(
        rules: Vec<Rule>,
        names: Rodeo,
        by_name: HashMap<Spur, RuleId, ahash::RandomState>,
    ) -> Self {
        let names = names.into_reader();
        let whitespace = lookup(&names, &by_name, "WHITESPACE");
        let comment = lookup(&names, &by_name, "COMMENT");
        Self {
            rules,
            names,
            by_name,
            whitespace,
            comment,
        }
    }

    /// Look up a rule by name.
    #[must_use]
    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        lookup(&self.names, &self.by_name, name)
    }

    /// Resolve a rule id back to its name.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this grammar.
    #[must_use]
    pub fn name(&self, id: RuleId) -> &str {
        self.names.resolve(&self.rules[id.index()].name)
    }

    /// Whether `id` names one of the predefined rules (`ANY`, `EOI`, …).
    #[must_use]
    pub fn is_builtin(&self, id: RuleId) -> bool {
        self.rules[id.index()].builtin
    }

    /// Iterate over all rules in insertion order (built-ins first).
    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &str)> {
        self.rules.iter().enumerate().map(|(i, rule)| {
            (
                RuleId(u32::try_from(i).unwrap_or(u32::MAX)),
                self.names.resolve(&rule.name),
            )
        })
    }

    /// Number of rules, built-ins included.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub(crate) fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    pub(crate) fn whitespace(&self) -> Option<RuleId> {
        self.whitespace
    }

    pub(crate) fn comment(&self) -> Option<RuleId> {
        self.comment
    }
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar")
            .field("rules", &self.rules().map(|(_, n)| n).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

fn lookup(
    names: &RodeoReader,
    by_name: &HashMap<Spur, RuleId, ahash::RandomState>,
    name: &str,
) -> Option<RuleId> {
    names.get(name).and_then(|spur| by_name.get(&spur).copied())
}

/// Names that grammars may reference but never define.
///
/// Everything in [`builtin_rules`] plus the stack operators, which are
/// keywords of the grammar syntax rather than rules.
pub(crate) const RESERVED: &[&str] = &[
    "ANY",
    "SOI",
    "EOI",
    "NEWLINE",
    "ASCII_DIGIT",
    "ASCII_NONZERO_DIGIT",
    "ASCII_ALPHA_LOWER",
    "ASCII_ALPHA_UPPER",
    "ASCII_ALPHA",
    "ASCII_ALPHANUMERIC",
    "ASCII_HEX_DIGIT",
    "ASCII",
    "PUSH",
    "POP",
    "PEEK",
];

/// The predefined rules seeded into every grammar arena, in id order.
///
/// All are silent except `EOI`: the end-of-input marker materializes a pair,
/// so consumers iterating a `file`-style rule see it explicitly.
pub(crate) fn builtin_rules() -> Vec<(&'static str, Modifier, Node)> {
    use Modifier::{Normal, Silent};

    let lit = |text: &str| Node::Literal {
        text: text.into(),
        insensitive: false,
    };

    vec![
        ("ANY", Silent, Node::Any),
        ("SOI", Silent, Node::StartOfInput),
        ("EOI", Normal, Node::EndOfInput),
        (
            "NEWLINE",
            Silent,
            Node::Choice(vec![lit("\n"), lit("\r\n"), lit("\r")]),
        ),
        ("ASCII_DIGIT", Silent, Node::Range { lo: '0', hi: '9' }),
        (
            "ASCII_NONZERO_DIGIT",
            Silent,
            Node::Range { lo: '1', hi: '9' },
        ),
        (
            "ASCII_ALPHA_LOWER",
            Silent,
            Node::Range { lo: 'a', hi: 'z' },
        ),
        (
            "ASCII_ALPHA_UPPER",
            Silent,
            Node::Range { lo: 'A', hi: 'Z' },
        ),
        (
            "ASCII_ALPHA",
            Silent,
            Node::Choice(vec![
                Node::Range { lo: 'a', hi: 'z' },
                Node::Range { lo: 'A', hi: 'Z' },
            ]),
        ),
        (
            "ASCII_ALPHANUMERIC",
            Silent,
            Node::Choice(vec![
                Node::Range { lo: '0', hi: '9' },
                Node::Range { lo: 'a', hi: 'z' },
                Node::Range { lo: 'A', hi: 'Z' },
            ]),
        ),
        (
            "ASCII_HEX_DIGIT",
            Silent,
            Node::Choice(vec![
                Node::Range { lo: '0', hi: '9' },
                Node::Range { lo: 'a', hi: 'f' },
                Node::Range { lo: 'A', hi: 'F' },
            ]),
        ),
        (
            "ASCII",
            Silent,
            Node::Range {
                lo: '\0',
                hi: '\u{7f}',
            },
        ),
    ]
}
