//! Per-invocation matcher state.
//!
//! Everything mutable during a parse lives in one [`MatchContext`] threaded
//! through the matcher: position, token queue, match stack, ambient
//! atomicity, recursion depth, and failure tracking. The grammar and input
//! are immutable borrows, so independent parses share nothing and run in
//! parallel freely.

use smallvec::SmallVec;

use crate::engine::config::ParseConfig;
use crate::engine::stack::{MatchStack, StackSlot};
use crate::grammar::{Grammar, RuleId};
use crate::syntax::TokenEvent;

/// Ambient whitespace mode while matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Atomicity {
    /// Implicit whitespace applies; rules emit tokens normally.
    Normal,
    /// No implicit whitespace; descendant rules emit no tokens.
    Atomic,
    /// No implicit whitespace; descendant rules emit tokens.
    CompoundAtomic,
}

/// Monotonic record of the furthest failure.
///
/// `record` keeps the rightmost offset seen and the set of rules that failed
/// exactly there; earlier offsets never displace later ones. Tracking is
/// switched off inside predicates and implicit whitespace, whose failures
/// are not diagnostic.
#[derive(Debug)]
pub(crate) struct FailureTracker {
    pos: usize,
    rules: Vec<RuleId>,
    pub(crate) enabled: bool,
}

impl FailureTracker {
    fn new(start: usize) -> Self {
        Self {
            pos: start,
            rules: Vec::new(),
            enabled: true,
        }
    }

    pub(crate) fn record(&mut self, rule: RuleId, pos: usize) {
        if !self.enabled || pos < self.pos {
            return;
        }
        if pos > self.pos {
            self.pos = pos;
            self.rules.clear();
        }
        if !self.rules.contains(&rule) {
            self.rules.push(rule);
        }
    }

    pub(crate) fn into_parts(self) -> (usize, Vec<RuleId>) {
        (self.pos, self.rules)
    }
}

/// Snapshot of the mutable state, for restoring failed attempts.
pub(crate) struct Checkpoint {
    pub(crate) pos: usize,
    queue_len: usize,
    pub(crate) stack: SmallVec<[StackSlot; 8]>,
}

/// The state of one in-progress parse.
pub(crate) struct MatchContext<'g, 'i> {
    pub(crate) grammar: &'g Grammar,
    pub(crate) input: &'i str,
    pub(crate) pos: usize,
    pub(crate) queue: Vec<TokenEvent>,
    pub(crate) stack: MatchStack,
    pub(crate) atomicity: Atomicity,
    pub(crate) depth: usize,
    pub(crate) max_depth: usize,
    /// Innermost named rule being matched; failures attribute to it.
    pub(crate) current_rule: RuleId,
    pub(crate) tracker: FailureTracker,
}

impl<'g, 'i> MatchContext<'g, 'i> {
    pub(crate) fn new(
        grammar: &'g Grammar,
        input: &'i str,
        start: usize,
        entry: RuleId,
        config: &ParseConfig,
    ) -> Self {
        Self {
            grammar,
            input,
            pos: start,
            queue: Vec::new(),
            stack: MatchStack::new(),
            atomicity: Atomicity::Normal,
            depth: 0,
            max_depth: config.max_recursion_depth,
            current_rule: entry,
            tracker: FailureTracker::new(start),
        }
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            queue_len: self.queue.len(),
            stack: self.stack.snapshot(),
        }
    }

    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.queue.truncate(checkpoint.queue_len);
        self.stack.restore(checkpoint.stack);
    }

    /// Record a primitive failure at the current position.
    pub(crate) fn fail_here(&mut self) {
        self.tracker.record(self.current_rule, self.pos);
    }

    /// The unconsumed remainder of the input.
    #[inline]
    pub(crate) fn rest(&self) -> &'i str {
        &self.input[self.pos..]
    }
}
