//! Pairs: the navigable view of a successful parse.

use std::sync::Arc;

use crate::grammar::RuleId;
use crate::syntax::span::Span;
use crate::syntax::tokens::{TokenEvent, Tokens};

/// An iterator over sibling [`Pair`]s.
///
/// Returned by a successful parse (the top-level matches) and by
/// [`Pair::into_inner`] (a pair's children). Cloning is cheap and restarts
/// iteration from the clone point; all pairs share one immutable queue.
#[derive(Clone)]
pub struct Pairs<'i> {
    queue: Arc<Vec<TokenEvent>>,
    input: &'i str,
    cursor: usize,
    end: usize,
}

impl<'i> Pairs<'i> {
    pub(crate) fn new(
        queue: Arc<Vec<TokenEvent>>,
        input: &'i str,
        cursor: usize,
        end: usize,
    ) -> Self {
        Self {
            queue,
            input,
            cursor,
            end,
        }
    }

    /// The next pair, without advancing.
    #[must_use]
    pub fn peek(&self) -> Option<Pair<'i>> {
        self.clone().next()
    }

    /// Flat token events for every remaining pair.
    #[must_use]
    pub fn tokens(&self) -> Tokens<'i> {
        Tokens::new(Arc::clone(&self.queue), self.input, self.cursor, self.end)
    }

    /// The input these pairs were parsed from.
    #[must_use]
    pub const fn as_input(&self) -> &'i str {
        self.input
    }
}

impl<'i> Iterator for Pairs<'i> {
    type Item = Pair<'i>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.end {
            return None;
        }
        let start = self.cursor;
        match self.queue[start] {
            TokenEvent::Start { end_index, .. } => {
                self.cursor = end_index as usize + 1;
                Some(Pair {
                    queue: Arc::clone(&self.queue),
                    input: self.input,
                    start,
                })
            }
            // A well-formed queue never puts an `End` at a sibling boundary.
            TokenEvent::End { .. } => None,
        }
    }
}

impl std::fmt::Debug for Pairs<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// One successful rule match: a rule id, the matched span, and children.
#[derive(Clone)]
pub struct Pair<'i> {
    queue: Arc<Vec<TokenEvent>>,
    input: &'i str,
    start: usize,
}

impl<'i> Pair<'i> {
    /// The rule this pair matched.
    #[must_use]
    pub fn as_rule(&self) -> RuleId {
        match self.queue[self.start] {
            TokenEvent::Start { rule, .. } => rule,
            TokenEvent::End { rule, .. } => rule,
        }
    }

    /// The matched input text.
    #[must_use]
    pub fn as_str(&self) -> &'i str {
        self.as_span().as_str()
    }

    /// The matched span.
    #[must_use]
    pub fn as_span(&self) -> Span<'i> {
        let (start_pos, end_index) = match self.queue[self.start] {
            TokenEvent::Start { pos, end_index, .. } => (pos as usize, end_index as usize),
            TokenEvent::End { pos, .. } => (pos as usize, self.start),
        };
        let end_pos = match self.queue[end_index] {
            TokenEvent::End { pos, .. } => pos as usize,
            TokenEvent::Start { pos, .. } => pos as usize,
        };
        Span::new(self.input, start_pos, end_pos)
    }

    /// Iterate over this pair's immediate children.
    #[must_use]
    pub fn into_inner(self) -> Pairs<'i> {
        let end_index = self.end_index();
        Pairs::new(self.queue, self.input, self.start + 1, end_index)
    }

    /// As [`Pair::into_inner`], without consuming the pair.
    #[must_use]
    pub fn children(&self) -> Pairs<'i> {
        self.clone().into_inner()
    }

    /// Flat token events covering this pair and everything inside it.
    #[must_use]
    pub fn tokens(&self) -> Tokens<'i> {
        let end_index = self.end_index();
        Tokens::new(
            Arc::clone(&self.queue),
            self.input,
            self.start,
            end_index + 1,
        )
    }

    /// The input this pair was parsed from.
    #[must_use]
    pub const fn as_input(&self) -> &'i str {
        self.input
    }

    fn end_index(&self) -> usize {
        match self.queue[self.start] {
            TokenEvent::Start { end_index, .. } => end_index as usize,
            TokenEvent::End { .. } => self.start,
        }
    }
}

impl std::fmt::Debug for Pair<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let span = self.as_span();
        f.debug_struct("Pair")
            .field("rule", &self.as_rule())
            .field("span", &format_args!("{}..{}", span.start(), span.end()))
            .field("text", &span.as_str())
            .finish()
    }
}
