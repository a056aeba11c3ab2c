//! The match stack backing `PUSH`/`POP`/`PEEK`.

use smallvec::SmallVec;

/// A stack slot: the byte range of a previously matched substring.
pub(crate) type StackSlot = (u32, u32);

/// Per-parse stack of matched spans.
///
/// Owned by exactly one [`MatchContext`](crate::engine::context::MatchContext)
/// and reset at the start of each top-level parse. Failing alternatives
/// restore it wholesale from checkpoint snapshots; slots are `Copy`, so a
/// snapshot is a flat copy.
#[derive(Debug, Default, Clone)]
pub(crate) struct MatchStack {
    slots: SmallVec<[StackSlot; 8]>,
}

impl MatchStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, slot: StackSlot) {
        self.slots.push(slot);
    }

    pub(crate) fn pop(&mut self) -> Option<StackSlot> {
        self.slots.pop()
    }

    pub(crate) fn top(&self) -> Option<StackSlot> {
        self.slots.last().copied()
    }

    pub(crate) fn as_slice(&self) -> &[StackSlot] {
        &self.slots
    }

    pub(crate) fn snapshot(&self) -> SmallVec<[StackSlot; 8]> {
        self.slots.clone()
    }

    pub(crate) fn restore(&mut self, snapshot: SmallVec<[StackSlot; 8]>) {
        self.slots = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_order() {
        let mut stack = MatchStack::new();
        stack.push((0, 1));
        stack.push((1, 3));
        assert_eq!(stack.top(), Some((1, 3)));
        assert_eq!(stack.pop(), Some((1, 3)));
        assert_eq!(stack.pop(), Some((0, 1)));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut stack = MatchStack::new();
        stack.push((0, 2));
        let snapshot = stack.snapshot();
        stack.push((2, 4));
        stack.pop();
        stack.pop();
        stack.restore(snapshot);
        assert_eq!(stack.as_slice(), &[(0, 2)]);
    }
}
