//! Static grammar validation.
//!
//! Runs after name resolution, over the resolved rule arena. Three analyses:
//! repetition bounds, repetitions whose body can match empty (which would
//! never terminate under eager matching), and zero-consumption recursion -
//! any rule able to reach itself again without the matcher having consumed
//! input in between, which covers classic left recursion through sequences,
//! choices, repetitions, and predicates.

use lasso::Rodeo;
use thiserror::Error;

use crate::grammar::{Node, Rule};

/// Validation failure for a grammar built through
/// [`GrammarBuilder`](crate::grammar::GrammarBuilder).
///
/// The text compiler wraps these with the offending rule's source location;
/// see [`CompileError`](crate::error::CompileError).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// The same rule name was defined twice.
    #[error("rule '{name}' is defined twice")]
    DuplicateRule {
        /// Offending rule name.
        name: String,
    },

    /// An expression references a rule the grammar does not define.
    #[error("rule '{name}' is undefined")]
    UndefinedRule {
        /// The missing name.
        name: String,
    },

    /// A definition collides with a built-in rule or stack operator.
    #[error("'{name}' is a reserved identifier and cannot be defined")]
    ReservedRule {
        /// The reserved name.
        name: String,
    },

    /// Repetition bounds with `min > max`.
    #[error("repetition bounds {{{min}, {max}}} are invalid: min exceeds max")]
    InvalidRepeat {
        /// Lower bound.
        min: u32,
        /// Upper bound.
        max: u32,
    },

    /// An unbounded repetition whose body can match the empty string.
    #[error("rule '{rule}' repeats an expression that can match empty input")]
    NullableRepetition {
        /// Rule containing the repetition.
        rule: String,
    },

    /// A rule can recurse into itself without consuming any input.
    #[error("grammar is left-recursive: {}", cycle.join(" -> "))]
    LeftRecursion {
        /// The offending cycle, first rule repeated at the end.
        cycle: Vec<String>,
    },
}

pub(crate) fn validate(rules: &[Rule], names: &Rodeo) -> Result<(), GrammarError> {
    let nullable = compute_nullable(rules);

    for rule in rules {
        check_repeats(&rule.node, rule, names, &nullable)?;
    }

    check_left_recursion(rules, names, &nullable)
}

/// Per-rule "can match the empty string", computed to a fixpoint.
///
/// Starts all-false and only ever flips entries to true, so iteration
/// terminates. Stack inspection (`POP`/`PEEK`) and predicates are treated as
/// nullable: the conservative direction for both repetition and recursion
/// checks.
fn compute_nullable(rules: &[Rule]) -> Vec<bool> {
    let mut nullable = vec![false; rules.len()];
    loop {
        let mut changed = false;
        for (i, rule) in rules.iter().enumerate() {
            if !nullable[i] && node_nullable(&rule.node, &nullable) {
                nullable[i] = true;
                changed = true;
            }
        }
        if !changed {
            return nullable;
        }
    }
}

fn node_nullable(node: &Node, nullable: &[bool]) -> bool {
    match node {
        Node::Literal { text, .. } => text.is_empty(),
        Node::Range { .. } | Node::Any => false,
        Node::Seq(children) => children.iter().all(|c| node_nullable(c, nullable)),
        Node::Choice(children) => children.iter().any(|c| node_nullable(c, nullable)),
        Node::Repeat { node, min, .. } => *min == 0 || node_nullable(node, nullable),
        Node::Rule(id) => nullable[id.index()],
        Node::Push(node) => node_nullable(node, nullable),
        Node::Predicate { .. }
        | Node::Pop
        | Node::Peek
        | Node::StartOfInput
        | Node::EndOfInput => true,
    }
}

fn check_repeats(
    node: &Node,
    rule: &Rule,
    names: &Rodeo,
    nullable: &[bool],
) -> Result<(), GrammarError> {
    match node {
        Node::Repeat {
            node: inner,
            min,
            max,
        } => {
            if let Some(max) = max {
                if min > max {
                    return Err(GrammarError::InvalidRepeat {
                        min: *min,
                        max: *max,
                    });
                }
            } else if node_nullable(inner, nullable) {
                return Err(GrammarError::NullableRepetition {
                    rule: names.resolve(&rule.name).to_string(),
                });
            }
            check_repeats(inner, rule, names, nullable)
        }
        Node::Seq(children) | Node::Choice(children) => {
            for child in children {
                check_repeats(child, rule, names, nullable)?;
            }
            Ok(())
        }
        Node::Predicate { node: inner, .. } | Node::Push(inner) => {
            check_repeats(inner, rule, names, nullable)
        }
        _ => Ok(()),
    }
}

/// Rule references reachable from `node` before any input is necessarily
/// consumed. These are the edges of the zero-consumption graph; a cycle in
/// that graph is unguarded (left) recursion.
fn head_refs(node: &Node, nullable: &[bool], out: &mut Vec<usize>) {
    match node {
        Node::Rule(id) => out.push(id.index()),
        Node::Seq(children) => {
            for child in children {
                head_refs(child, nullable, out);
                if !node_nullable(child, nullable) {
                    break;
                }
            }
        }
        Node::Choice(children) => {
            for child in children {
                head_refs(child, nullable, out);
            }
        }
        Node::Repeat { node, .. } | Node::Predicate { node, .. } | Node::Push(node) => {
            head_refs(node, nullable, out);
        }
        _ => {}
    }
}

fn check_left_recursion(
    rules: &[Rule],
    names: &Rodeo,
    nullable: &[bool],
) -> Result<(), GrammarError> {
    let edges: Vec<Vec<usize>> = rules
        .iter()
        .map(|rule| {
            let mut out = Vec::new();
            head_refs(&rule.node, nullable, &mut out);
            out
        })
        .collect();

    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        White,
        Gray,
        Black,
    }

    fn visit(
        index: usize,
        edges: &[Vec<usize>],
        colors: &mut [Color],
        path: &mut Vec<usize>,
    ) -> Option<Vec<usize>> {
        colors[index] = Color::Gray;
        path.push(index);
        for &next in &edges[index] {
            match colors[next] {
                Color::Gray => {
                    let start = path.iter().position(|&i| i == next).unwrap_or(0);
                    let mut cycle: Vec<usize> = path[start..].to_vec();
                    cycle.push(next);
                    return Some(cycle);
                }
                Color::White => {
                    if let Some(cycle) = visit(next, edges, colors, path) {
                        return Some(cycle);
                    }
                }
                Color::Black => {}
            }
        }
        path.pop();
        colors[index] = Color::Black;
        None
    }

    let mut colors = vec![Color::White; rules.len()];
    for index in 0..rules.len() {
        if colors[index] == Color::White {
            let mut path = Vec::new();
            if let Some(cycle) = visit(index, &edges, &mut colors, &mut path) {
                return Err(GrammarError::LeftRecursion {
                    cycle: cycle
                        .into_iter()
                        .map(|i| names.resolve(&rules[i].name).to_string())
                        .collect(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::grammar::{Expr, GrammarBuilder, GrammarError, Modifier};

    #[test]
    fn test_direct_left_recursion_rejected() {
        let err = GrammarBuilder::new()
            .rule(
                "e",
                Modifier::Normal,
                Expr::seq([Expr::rule("e"), Expr::literal("+")]),
            )
            .build()
            .unwrap_err();
        match err {
            GrammarError::LeftRecursion { cycle } => {
                assert_eq!(cycle, vec!["e", "e"]);
            }
            other => panic!("expected left recursion, got {other:?}"),
        }
    }

    #[test]
    fn test_indirect_left_recursion_rejected() {
        let err = GrammarBuilder::new()
            .rule("a", Modifier::Normal, Expr::rule("b"))
            .rule(
                "b",
                Modifier::Normal,
                Expr::seq([Expr::rule("a"), Expr::literal("x")]),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, GrammarError::LeftRecursion { .. }));
    }

    #[test]
    fn test_guarded_recursion_allowed() {
        // Consumes "(" before recursing: fine.
        let grammar = GrammarBuilder::new()
            .rule(
                "parens",
                Modifier::Normal,
                Expr::choice([
                    Expr::seq([
                        Expr::literal("("),
                        Expr::rule("parens"),
                        Expr::literal(")"),
                    ]),
                    Expr::literal(""),
                ]),
            )
            .build();
        assert!(grammar.is_ok());
    }

    #[test]
    fn test_recursion_through_nullable_prefix_rejected() {
        // The optional prefix can match empty, so the recursion is unguarded.
        let err = GrammarBuilder::new()
            .rule(
                "r",
                Modifier::Normal,
                Expr::seq([Expr::opt(Expr::literal("-")), Expr::rule("r")]),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, GrammarError::LeftRecursion { .. }));
    }

    #[test]
    fn test_invalid_repeat_bounds_rejected() {
        let err = GrammarBuilder::new()
            .rule("r", Modifier::Normal, Expr::repeat(Expr::Any, 3, Some(2)))
            .build()
            .unwrap_err();
        assert_eq!(err, GrammarError::InvalidRepeat { min: 3, max: 2 });
    }

    #[test]
    fn test_nullable_repetition_rejected() {
        let err = GrammarBuilder::new()
            .rule("r", Modifier::Normal, Expr::star(Expr::opt(Expr::Any)))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            GrammarError::NullableRepetition {
                rule: "r".to_string()
            }
        );
    }

    #[test]
    fn test_bounded_repeat_of_nullable_allowed() {
        let grammar = GrammarBuilder::new()
            .rule(
                "r",
                Modifier::Normal,
                Expr::repeat(Expr::opt(Expr::Any), 0, Some(4)),
            )
            .build();
        assert!(grammar.is_ok());
    }

    #[test]
    fn test_recursion_inside_predicate_rejected() {
        let err = GrammarBuilder::new()
            .rule(
                "r",
                Modifier::Normal,
                Expr::seq([Expr::pos_pred(Expr::rule("r")), Expr::literal("a")]),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, GrammarError::LeftRecursion { .. }));
    }
}
