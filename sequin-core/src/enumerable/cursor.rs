//! Traversal handles over an Enumerable.
//!
//! Three ways to read a sequence, with different sharing rules:
//!
//! * [`Traversal`] (`traverse`, `for x in &mut seq`): a materialized sequence
//!   hands out a fresh walk from position 0 every time. A streaming sequence
//!   hands out its single shared handle, so every traversal continues where
//!   the last one stopped.
//! * [`Cursor`] (`cursor`, `next_value`): the instance's own persistent
//!   position. For a materialized sequence it survives between calls.
//! * [`IntoIter`] (`for x in seq`): consumes the wrapper.
//!
//! Both borrowing handles hold `&mut Enumerable`, so two live traversals of
//! one instance cannot coexist.

use super::{Enumerable, Repr, Stream};
use std::iter::Chain;

/// Per-request traversal; see the module docs for sharing rules
pub struct Traversal<'e, 'a, T> {
    inner: TraversalInner<'e, 'a, T>,
}

enum TraversalInner<'e, 'a, T> {
    Fresh(std::slice::Iter<'e, T>),
    Shared {
        source: &'e mut Stream<'a, T>,
        lookahead: &'e mut Option<T>,
    },
}

impl<T: Clone> Iterator for Traversal<'_, '_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match &mut self.inner {
            TraversalInner::Fresh(items) => items.next().cloned(),
            TraversalInner::Shared { source, lookahead } => {
                lookahead.take().or_else(|| source.next())
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            TraversalInner::Fresh(items) => items.size_hint(),
            TraversalInner::Shared { source, lookahead } => {
                let extra = usize::from(lookahead.is_some());
                let (low, high) = source.size_hint();
                (
                    low.saturating_add(extra),
                    high.and_then(|h| h.checked_add(extra)),
                )
            }
        }
    }
}

/// Reads through the instance's persistent cursor
pub struct Cursor<'e, 'a, T> {
    owner: &'e mut Enumerable<'a, T>,
}

impl<'a, T: Clone + 'a> Iterator for Cursor<'_, 'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.owner.next_value()
    }
}

/// Owning iterator; a materialized sequence is yielded from position 0
pub struct IntoIter<'a, T> {
    inner: IntoIterInner<'a, T>,
}

enum IntoIterInner<'a, T> {
    Materialized(std::vec::IntoIter<T>),
    Streaming(Chain<std::option::IntoIter<T>, Stream<'a, T>>),
}

impl<T> Iterator for IntoIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match &mut self.inner {
            IntoIterInner::Materialized(items) => items.next(),
            IntoIterInner::Streaming(source) => source.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IntoIterInner::Materialized(items) => items.size_hint(),
            IntoIterInner::Streaming(source) => source.size_hint(),
        }
    }
}

impl<'a, T: 'a> Enumerable<'a, T> {
    /// Start a traversal.
    ///
    /// Materialized: an independent walk from the first element. Streaming:
    /// the shared handle, positioned wherever earlier reads left it.
    pub fn traverse(&mut self) -> Traversal<'_, 'a, T> {
        let inner = match &mut self.repr {
            Repr::Materialized { items, .. } => TraversalInner::Fresh(items.iter()),
            Repr::Streaming { source, lookahead } => TraversalInner::Shared { source, lookahead },
        };
        Traversal { inner }
    }

    /// Pull the next element through the instance's persistent cursor.
    ///
    /// `None` means the sequence is exhausted. For a materialized sequence the
    /// position persists across calls but does not affect `traverse` or any
    /// operator; for a stream it is the same shared position everything uses.
    pub fn next_value(&mut self) -> Option<T>
    where
        T: Clone,
    {
        match &mut self.repr {
            Repr::Materialized { items, position } => {
                let value = items.get(*position).cloned();
                if value.is_some() {
                    *position += 1;
                }
                value
            }
            Repr::Streaming { source, lookahead } => lookahead.take().or_else(|| source.next()),
        }
    }

    /// Iterator adapter over `next_value`
    pub fn cursor(&mut self) -> Cursor<'_, 'a, T> {
        Cursor { owner: self }
    }
}

impl<'a, T: 'a> IntoIterator for Enumerable<'a, T> {
    type Item = T;
    type IntoIter = IntoIter<'a, T>;

    fn into_iter(self) -> IntoIter<'a, T> {
        let inner = match self.repr {
            Repr::Materialized { items, .. } => IntoIterInner::Materialized(items.into_iter()),
            Repr::Streaming { source, lookahead } => {
                IntoIterInner::Streaming(lookahead.into_iter().chain(source))
            }
        };
        IntoIter { inner }
    }
}

impl<'e, 'a, T: Clone + 'a> IntoIterator for &'e mut Enumerable<'a, T> {
    type Item = T;
    type IntoIter = Traversal<'e, 'a, T>;

    fn into_iter(self) -> Traversal<'e, 'a, T> {
        self.traverse()
    }
}
