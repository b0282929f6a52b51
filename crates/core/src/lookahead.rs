//! Bounded lookahead and history over any pull-based source.
//!
//! [`LookaheadStream`] keeps up to `size + 1` pre-fetched items so that
//! `ahead(size)` never needs more than one extra pull, and a history of the
//! last `size + 1` consumed items for `behind`. `back` undoes one `next`.

use std::collections::VecDeque;
use thiserror::Error;

/// An `ahead`/`behind` index outside `1..=size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("lookahead index {index} is outside 1..={size}")]
pub struct RangeError {
    pub index: usize,
    pub size: usize,
}

pub struct LookaheadStream<I: Iterator> {
    source: I,
    size: usize,
    ahead: VecDeque<I::Item>,
    /// Most recently consumed item first.
    behind: VecDeque<I::Item>,
    exhausted: bool,
}

impl<I> LookaheadStream<I>
where
    I: Iterator,
    I::Item: Clone,
{
    /// Wrap `source` with a lookahead depth of `size` (at least 1).
    pub fn new(source: I, size: usize) -> Self {
        let size = size.max(1);
        LookaheadStream {
            source,
            size,
            ahead: VecDeque::with_capacity(size + 1),
            behind: VecDeque::with_capacity(size + 1),
            exhausted: false,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn check(&self, index: usize) -> Result<(), RangeError> {
        if index == 0 || index > self.size {
            return Err(RangeError {
                index,
                size: self.size,
            });
        }
        Ok(())
    }

    fn fill(&mut self) {
        while !self.exhausted && self.ahead.len() <= self.size {
            match self.source.next() {
                Some(item) => self.ahead.push_back(item),
                None => self.exhausted = true,
            }
        }
    }

    /// The item `index` positions ahead of the cursor, without consuming it.
    pub fn ahead(&mut self, index: usize) -> Result<Option<&I::Item>, RangeError> {
        self.check(index)?;
        self.fill();
        Ok(self.ahead.get(index - 1))
    }

    /// The item `index` positions behind the cursor; `1` is the last consumed.
    pub fn behind(&self, index: usize) -> Result<Option<&I::Item>, RangeError> {
        self.check(index)?;
        Ok(self.behind.get(index - 1))
    }

    /// Re-queue `item` in front of the pending items, undoing the last `next`.
    ///
    /// Callers must not undo more `next` calls than they made.
    pub fn back(&mut self, item: I::Item) {
        self.behind.pop_front();
        self.ahead.push_front(item);
    }

    /// Replace the next pending item with `items` (in order) and return it.
    /// Nothing is recorded in the history.
    pub fn expand_next<R>(&mut self, items: R) -> Option<I::Item>
    where
        R: IntoIterator<Item = I::Item>,
    {
        self.fill();
        let old = self.ahead.pop_front()?;
        for (i, item) in items.into_iter().enumerate() {
            self.ahead.insert(i, item);
        }
        Some(old)
    }

    /// True once the source and the pending buffer are both exhausted.
    pub fn is_done(&mut self) -> bool {
        self.fill();
        self.ahead.is_empty()
    }
}

impl<I> Iterator for LookaheadStream<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        self.fill();
        let item = self.ahead.pop_front()?;
        if self.behind.len() > self.size {
            self.behind.pop_back();
        }
        self.behind.push_front(item.clone());
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(n: u32, size: usize) -> LookaheadStream<std::ops::Range<u32>> {
        LookaheadStream::new(0..n, size)
    }

    #[test]
    fn ahead_peeks_without_consuming() {
        let mut s = stream(5, 2);
        assert_eq!(s.ahead(1), Ok(Some(&0)));
        assert_eq!(s.ahead(2), Ok(Some(&1)));
        assert_eq!(s.ahead(1), Ok(Some(&0)));
        assert_eq!(s.next(), Some(0));
        assert_eq!(s.ahead(1), Ok(Some(&1)));
    }

    #[test]
    fn ahead_past_end_is_none() {
        let mut s = stream(1, 3);
        assert_eq!(s.ahead(1), Ok(Some(&0)));
        assert_eq!(s.ahead(2), Ok(None));
        assert_eq!(s.ahead(3), Ok(None));
    }

    #[test]
    fn indices_outside_depth_are_range_errors() {
        let mut s = stream(5, 2);
        assert_eq!(s.ahead(0), Err(RangeError { index: 0, size: 2 }));
        assert_eq!(s.ahead(3), Err(RangeError { index: 3, size: 2 }));
        assert_eq!(s.behind(3), Err(RangeError { index: 3, size: 2 }));
    }

    #[test]
    fn zero_depth_is_raised_to_one() {
        let mut s = stream(3, 0);
        assert_eq!(s.size(), 1);
        assert_eq!(s.ahead(1), Ok(Some(&0)));
        assert_eq!(s.ahead(2), Err(RangeError { index: 2, size: 1 }));
    }

    #[test]
    fn behind_tracks_history() {
        let mut s = stream(5, 2);
        assert_eq!(s.behind(1), Ok(None));
        s.next();
        assert_eq!(s.behind(1), Ok(Some(&0)));
        assert_eq!(s.behind(2), Ok(None));
        s.next();
        s.next();
        assert_eq!(s.behind(1), Ok(Some(&2)));
        assert_eq!(s.behind(2), Ok(Some(&1)));
    }

    #[test]
    fn back_undoes_next() {
        let mut s = stream(3, 2);
        assert_eq!(s.next(), Some(0));
        let one = s.next().unwrap();
        s.back(one);
        assert_eq!(s.behind(1), Ok(Some(&0)));
        assert_eq!(s.next(), Some(1));
        assert_eq!(s.next(), Some(2));
        assert_eq!(s.next(), None);
    }

    #[test]
    fn back_clears_done_state() {
        let mut s = stream(1, 1);
        let last = s.next().unwrap();
        assert!(s.is_done());
        s.back(last);
        assert!(!s.is_done());
        assert_eq!(s.next(), Some(0));
        assert!(s.is_done());
    }

    #[test]
    fn expand_next_replaces_pending_item() {
        let mut s = stream(3, 2);
        assert_eq!(s.expand_next([10, 11]), Some(0));
        let rest: Vec<_> = s.collect();
        assert_eq!(rest, vec![10, 11, 1, 2]);
    }

    #[test]
    fn pulls_lazily() {
        let mut pulled = 0;
        let source = std::iter::from_fn(|| {
            pulled += 1;
            Some(pulled)
        });
        let mut s = LookaheadStream::new(source, 2);
        assert_eq!(s.ahead(1), Ok(Some(&1)));
        drop(s);
        assert_eq!(pulled, 3);
    }
}
