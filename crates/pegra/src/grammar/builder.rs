//! Programmatic grammar construction.

use compact_str::CompactString;
use hashbrown::HashMap;
use lasso::Rodeo;

use crate::grammar::{
    builtin_rules, validate, Expr, Grammar, GrammarError, Modifier, Node, Rule, RuleId, RESERVED,
};

/// Builder for assembling a [`Grammar`] in code.
///
/// The grammar compiler lowers parsed grammar source through this same API,
/// so both paths share one validation pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use pegra::{Expr, GrammarBuilder, Modifier};
///
/// let grammar = GrammarBuilder::new()
///     .rule(
///         "num",
///         Modifier::Normal,
///         Expr::plus(Expr::rule("ASCII_DIGIT")),
///     )
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    rules: Vec<(CompactString, Modifier, Expr)>,
}

impl GrammarBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule definition. Order is preserved and matters for diagnostics.
    #[must_use]
    pub fn rule(mut self, name: impl Into<CompactString>, modifier: Modifier, expr: Expr) -> Self {
        self.rules.push((name.into(), modifier, expr));
        self
    }

    /// Resolve references, validate, and produce the immutable [`Grammar`].
    ///
    /// # Errors
    ///
    /// Returns the first [`GrammarError`] found: duplicate, reserved, or
    /// undefined rule names, malformed repetition bounds, repetitions that
    /// cannot progress, or zero-consumption recursion cycles. No partial
    /// grammar is ever produced.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        let mut names = Rodeo::default();
        let mut by_name: HashMap<_, _, ahash::RandomState> = HashMap::default();
        let mut rules = Vec::with_capacity(self.rules.len() + 16);

        for (name, modifier, node) in builtin_rules() {
            let spur = names.get_or_intern_static(name);
            let id = RuleId(u32::try_from(rules.len()).unwrap_or(u32::MAX));
            by_name.insert(spur, id);
            rules.push(Rule {
                name: spur,
                node,
                modifier,
                builtin: true,
            });
        }

        // Assign ids to every user rule before resolving any body, so that
        // forward and mutually recursive references work.
        let mut pending = Vec::with_capacity(self.rules.len());
        for (name, modifier, expr) in self.rules {
            if RESERVED.contains(&name.as_str()) {
                return Err(GrammarError::ReservedRule {
                    name: name.to_string(),
                });
            }
            let spur = names.get_or_intern(name.as_str());
            let id = RuleId(u32::try_from(rules.len() + pending.len()).unwrap_or(u32::MAX));
            if by_name.insert(spur, id).is_some() {
                return Err(GrammarError::DuplicateRule {
                    name: name.to_string(),
                });
            }
            pending.push((spur, modifier, expr));
        }

        for (spur, modifier, expr) in pending {
            let node = resolve(expr, &names, &by_name)?;
            rules.push(Rule {
                name: spur,
                node,
                modifier,
                builtin: false,
            });
        }

        validate::validate(&rules, &names)?;

        Ok(Grammar::new(rules, names, by_name))
    }
}

fn resolve(
    expr: Expr,
    names: &Rodeo,
    by_name: &HashMap<lasso::Spur, RuleId, ahash::RandomState>,
) -> Result<Node, GrammarError> {
    Ok(match expr {
        Expr::Literal { text, insensitive } => Node::Literal { text, insensitive },
        Expr::Range { lo, hi } => Node::Range { lo, hi },
        Expr::Any => Node::Any,
        Expr::Seq(exprs) => Node::Seq(
            exprs
                .into_iter()
                .map(|e| resolve(e, names, by_name))
                .collect::<Result<_, _>>()?,
        ),
        Expr::Choice(exprs) => Node::Choice(
            exprs
                .into_iter()
                .map(|e| resolve(e, names, by_name))
                .collect::<Result<_, _>>()?,
        ),
        Expr::Repeat { expr, min, max } => Node::Repeat {
            node: Box::new(resolve(*expr, names, by_name)?),
            min,
            max,
        },
        Expr::Predicate { expr, positive } => Node::Predicate {
            node: Box::new(resolve(*expr, names, by_name)?),
            positive,
        },
        Expr::Ref(name) => {
            let id = names
                .get(name.as_str())
                .and_then(|spur| by_name.get(&spur).copied())
                .ok_or_else(|| GrammarError::UndefinedRule {
                    name: name.to_string(),
                })?;
            Node::Rule(id)
        }
        Expr::Push(expr) => Node::Push(Box::new(resolve(*expr, names, by_name)?)),
        Expr::Pop => Node::Pop,
        Expr::Peek => Node::Peek,
        Expr::StartOfInput => Node::StartOfInput,
        Expr::EndOfInput => Node::EndOfInput,
    })
}
