//! The matching algorithm.
//!
//! One function per concern: [`match_rule`] handles rule entry (atomicity
//! transition, token emission, failure attribution), [`match_node`] guards
//! recursion depth and dispatches over the closed [`Node`] set.
//!
//! The central invariant is non-backtracking with local restoration: when
//! any node reports [`Outcome::Failed`], the context's position, token
//! queue, and match stack are exactly as they were when that node was
//! entered. Completed sub-matches inside a successful node are permanent;
//! only a failing attempt is rolled back, and only as a whole. The failure
//! tracker is deliberately outside this rollback, which is what lets it
//! remember the furthest offset any attempt reached.

use crate::engine::context::{Atomicity, MatchContext};
use crate::error::ParseError;
use crate::grammar::{Modifier, Node, RuleId};
use crate::syntax::TokenEvent;

/// Local control-flow result of matching one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Matched,
    Failed,
}

use Outcome::{Failed, Matched};

/// Match the rule `id` at the current position.
pub(crate) fn match_rule(ctx: &mut MatchContext<'_, '_>, id: RuleId) -> Result<Outcome, ParseError> {
    let grammar = ctx.grammar;
    let rule = grammar.rule(id);
    let start = ctx.pos;

    let caller_atomicity = ctx.atomicity;
    let caller_rule = ctx.current_rule;

    ctx.atomicity = match rule.modifier {
        Modifier::Atomic => Atomicity::Atomic,
        Modifier::CompoundAtomic => Atomicity::CompoundAtomic,
        Modifier::NonAtomic => Atomicity::Normal,
        Modifier::Normal | Modifier::Silent => caller_atomicity,
    };
    ctx.current_rule = id;

    // A rule materializes iff it is not silent and no atomic ancestor is
    // suppressing descendants. Compound-atomic ancestors keep materializing,
    // and a non-atomic rule resets the ancestor context before the check.
    let emission_atomicity = if rule.modifier == Modifier::NonAtomic {
        Atomicity::Normal
    } else {
        caller_atomicity
    };
    let emit = emission_atomicity != Atomicity::Atomic && rule.modifier != Modifier::Silent;
    let start_index = ctx.queue.len();
    if emit {
        ctx.queue.push(TokenEvent::Start {
            rule: id,
            pos: u32::try_from(start).unwrap_or(u32::MAX),
            end_index: 0,
        });
    }

    let outcome = match_node(ctx, &rule.node)?;

    ctx.atomicity = caller_atomicity;
    ctx.current_rule = caller_rule;

    match outcome {
        Matched => {
            if emit {
                let end_index = ctx.queue.len();
                ctx.queue.push(TokenEvent::End {
                    rule: id,
                    pos: u32::try_from(ctx.pos).unwrap_or(u32::MAX),
                });
                if let TokenEvent::Start { end_index: slot, .. } = &mut ctx.queue[start_index] {
                    *slot = u32::try_from(end_index).unwrap_or(u32::MAX);
                }
            }
            Ok(Matched)
        }
        Failed => {
            // The body restored everything behind our own start event.
            if emit {
                ctx.queue.truncate(start_index);
            }
            Ok(Failed)
        }
    }
}

/// Match one expression node at the current position.
pub(crate) fn match_node(ctx: &mut MatchContext<'_, '_>, node: &Node) -> Result<Outcome, ParseError> {
    if ctx.depth >= ctx.max_depth {
        return Err(ParseError::RecursionLimit {
            limit: ctx.max_depth,
        });
    }
    ctx.depth += 1;
    let outcome = match_node_inner(ctx, node);
    ctx.depth -= 1;
    outcome
}

fn match_node_inner(ctx: &mut MatchContext<'_, '_>, node: &Node) -> Result<Outcome, ParseError> {
    match node {
        Node::Literal { text, insensitive } => Ok(match_literal(ctx, text, *insensitive)),

        Node::Range { lo, hi } => Ok(match ctx.rest().chars().next() {
            Some(c) if *lo <= c && c <= *hi => {
                ctx.pos += c.len_utf8();
                Matched
            }
            _ => {
                ctx.fail_here();
                Failed
            }
        }),

        Node::Any => Ok(match ctx.rest().chars().next() {
            Some(c) => {
                ctx.pos += c.len_utf8();
                Matched
            }
            None => {
                ctx.fail_here();
                Failed
            }
        }),

        Node::Seq(children) => {
            let entry = ctx.checkpoint();
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    skip_implicit(ctx)?;
                }
                if match_node(ctx, child)? == Failed {
                    ctx.restore(entry);
                    return Ok(Failed);
                }
            }
            Ok(Matched)
        }

        Node::Choice(children) => {
            // Every alternative starts from the same position; a failed
            // alternative restored the context itself.
            for child in children {
                if match_node(ctx, child)? == Matched {
                    return Ok(Matched);
                }
            }
            Ok(Failed)
        }

        Node::Repeat { node, min, max } => {
            let entry = ctx.checkpoint();
            let mut count: u32 = 0;
            loop {
                if let Some(max) = max {
                    if count >= *max {
                        break;
                    }
                }
                let iteration = ctx.checkpoint();
                if count > 0 {
                    skip_implicit(ctx)?;
                }
                match match_node(ctx, node)? {
                    Matched => {
                        if ctx.pos == iteration.pos
                            && ctx.stack.as_slice() == iteration.stack.as_slice()
                        {
                            // Matched without progress; a further iteration
                            // would do the same forever.
                            ctx.restore(iteration);
                            break;
                        }
                        count += 1;
                    }
                    Failed => {
                        ctx.restore(iteration);
                        break;
                    }
                }
            }
            if count >= *min {
                Ok(Matched)
            } else {
                ctx.restore(entry);
                Ok(Failed)
            }
        }

        Node::Predicate { node, positive } => {
            let entry = ctx.checkpoint();
            let was_tracking = ctx.tracker.enabled;
            ctx.tracker.enabled = false;
            let inner = match_node(ctx, node)?;
            ctx.tracker.enabled = was_tracking;
            ctx.restore(entry);
            if (inner == Matched) == *positive {
                Ok(Matched)
            } else {
                ctx.fail_here();
                Ok(Failed)
            }
        }

        Node::Rule(id) => match_rule(ctx, *id),

        Node::Push(node) => {
            let start = ctx.pos;
            match match_node(ctx, node)? {
                Matched => {
                    ctx.stack.push((
                        u32::try_from(start).unwrap_or(u32::MAX),
                        u32::try_from(ctx.pos).unwrap_or(u32::MAX),
                    ));
                    Ok(Matched)
                }
                Failed => Ok(Failed),
            }
        }

        Node::Pop => Ok(match_stack_top(ctx, true)),
        Node::Peek => Ok(match_stack_top(ctx, false)),

        Node::StartOfInput => Ok(if ctx.pos == 0 {
            Matched
        } else {
            ctx.fail_here();
            Failed
        }),

        Node::EndOfInput => Ok(if ctx.pos == ctx.input.len() {
            Matched
        } else {
            ctx.fail_here();
            Failed
        }),
    }
}

fn match_literal(ctx: &mut MatchContext<'_, '_>, text: &str, insensitive: bool) -> Outcome {
    if insensitive {
        let mut actual = ctx.rest().chars();
        let mut len = 0usize;
        for expected in text.chars() {
            match actual.next() {
                Some(c) if c.eq_ignore_ascii_case(&expected) => len += c.len_utf8(),
                _ => {
                    ctx.fail_here();
                    return Failed;
                }
            }
        }
        ctx.pos += len;
        Matched
    } else if ctx.rest().starts_with(text) {
        ctx.pos += text.len();
        Matched
    } else {
        ctx.fail_here();
        Failed
    }
}

/// Match the top stack entry's text verbatim, popping it on success when
/// `consume_slot` is set. An empty stack is an ordinary match failure.
fn match_stack_top(ctx: &mut MatchContext<'_, '_>, consume_slot: bool) -> Outcome {
    let Some((start, end)) = ctx.stack.top() else {
        ctx.fail_here();
        return Failed;
    };
    let input = ctx.input;
    let text = &input[start as usize..end as usize];
    if input[ctx.pos..].starts_with(text) {
        ctx.pos += text.len();
        if consume_slot {
            ctx.stack.pop();
        }
        Matched
    } else {
        ctx.fail_here();
        Failed
    }
}

/// Greedily consume `(WHITESPACE | COMMENT)*` between tokens.
///
/// Runs only in normal atomicity. The implicit rules are matched atomically
/// (no recursive injection inside them, no pairs) and without failure
/// tracking. The position check terminates the loop even if an implicit
/// rule matches the empty string.
fn skip_implicit(ctx: &mut MatchContext<'_, '_>) -> Result<(), ParseError> {
    if ctx.atomicity != Atomicity::Normal {
        return Ok(());
    }
    let whitespace = ctx.grammar.whitespace();
    let comment = ctx.grammar.comment();
    if whitespace.is_none() && comment.is_none() {
        return Ok(());
    }

    let saved_atomicity = ctx.atomicity;
    let was_tracking = ctx.tracker.enabled;
    ctx.atomicity = Atomicity::Atomic;
    ctx.tracker.enabled = false;

    loop {
        let before = ctx.pos;
        if let Some(id) = whitespace {
            match_rule(ctx, id)?;
        }
        if let Some(id) = comment {
            match_rule(ctx, id)?;
        }
        if ctx.pos == before {
            break;
        }
    }

    ctx.atomicity = saved_atomicity;
    ctx.tracker.enabled = was_tracking;
    Ok(())
}
