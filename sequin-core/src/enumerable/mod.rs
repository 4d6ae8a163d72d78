//! The Enumerable engine: one chainable wrapper over two execution models.
//!
//! An [`Enumerable`] is either *materialized* (an owned `Vec`, re-iterable and
//! randomly indexable) or *streaming* (a single-pass iterator wrapped without
//! copying). Every operator dispatches on that representation:
//!
//! * Transforming operators (`filter`, `select`, `take`, ...) take `self` by
//!   value and return a new instance of the same kind. A streaming source moves
//!   into its successor, so the parent can no longer be read.
//! * Terminal operators (`first`, `count`, `to_list`, ...) take `&mut self`.
//!   On a materialized sequence they read without consuming. On a streaming
//!   sequence they advance the one shared cursor, and whatever they pulled is
//!   gone for every later reader of the same instance.
//! * Eager steps (`materialize`, sorting, grouping, `distinct`, negative
//!   indexing of a stream) buffer the whole remaining source: O(n) time and
//!   space. They are logged through `tracing`.
//!
//! A streaming source left half-read by a failing operator is not rewound.

mod cursor;
mod index;
mod ordering;
mod projection;
mod terminal;

pub use cursor::{Cursor, IntoIter, Traversal};
pub use ordering::Grouping;

use crate::config::QueryOptions;
use crate::observability;
use std::fmt;

pub(crate) type Stream<'a, T> = Box<dyn Iterator<Item = T> + 'a>;

pub(crate) enum Repr<'a, T> {
    /// Owned elements plus the persistent cursor position used by `next_value`
    Materialized { items: Vec<T>, position: usize },
    /// Single-pass source; `lookahead` holds at most one peeked element
    Streaming {
        source: Stream<'a, T>,
        lookahead: Option<T>,
    },
}

/// A sequence plus the query operators that run over it
pub struct Enumerable<'a, T> {
    pub(crate) repr: Repr<'a, T>,
    pub(crate) options: QueryOptions,
}

impl<'a, T: 'a> Enumerable<'a, T> {
    /// Wrap owned elements as a materialized sequence
    pub fn new(items: Vec<T>) -> Self {
        Self::from_items(items, QueryOptions::default())
    }

    /// An empty materialized sequence
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Copy a slice into a materialized sequence
    pub fn from_slice(items: &[T]) -> Self
    where
        T: Clone,
    {
        Self::new(items.to_vec())
    }

    /// Wrap a single-pass source without copying it.
    ///
    /// The source may be infinite. Only operators that need the whole sequence
    /// (ordering, grouping, `count`, `last`, ...) will fail to terminate on it.
    pub fn streaming<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Self::from_stream(source.into_iter(), QueryOptions::default())
    }

    /// Replace the options this sequence (and everything chained from it) uses
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> QueryOptions {
        self.options
    }

    pub fn is_materialized(&self) -> bool {
        matches!(self.repr, Repr::Materialized { .. })
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.repr, Repr::Streaming { .. })
    }

    /// Borrow the elements of a materialized sequence; `None` for streams
    pub fn as_slice(&self) -> Option<&[T]> {
        match &self.repr {
            Repr::Materialized { items, .. } => Some(items),
            Repr::Streaming { .. } => None,
        }
    }

    /// Buffer a streaming sequence into a materialized one.
    ///
    /// Costs O(n) time and space and never returns on an infinite source.
    /// A sequence that is already materialized is returned unchanged.
    pub fn materialize(self) -> Self {
        if self.is_materialized() {
            return self;
        }
        let (items, options) = self.buffer("materialize");
        Self::from_items(items, options)
    }

    pub(crate) fn from_items(items: Vec<T>, options: QueryOptions) -> Self {
        Self {
            repr: Repr::Materialized { items, position: 0 },
            options,
        }
    }

    pub(crate) fn from_stream<I>(source: I, options: QueryOptions) -> Self
    where
        I: Iterator<Item = T> + 'a,
    {
        Self {
            repr: Repr::Streaming {
                source: Box::new(source),
                lookahead: None,
            },
            options,
        }
    }

    /// Take every remaining element, logging the eager step
    pub(crate) fn buffer(self, operation: &'static str) -> (Vec<T>, QueryOptions) {
        let Enumerable { repr, options } = self;
        let (items, from_stream) = match repr {
            Repr::Materialized { items, .. } => (items, false),
            Repr::Streaming { source, lookahead } => (resume(lookahead, source).collect(), true),
        };
        observability::Materialized {
            operation,
            buffered: items.len(),
            from_stream,
        }
        .log(&options);
        (items, options)
    }
}

/// The rest of a stream, starting with any peeked element
pub(crate) fn resume<'a, T: 'a>(
    lookahead: Option<T>,
    source: Stream<'a, T>,
) -> impl Iterator<Item = T> + 'a {
    lookahead.into_iter().chain(source)
}

/// Pull everything left in a stream; the source stays in place, exhausted
pub(crate) fn drain<T>(source: &mut Stream<'_, T>, lookahead: &mut Option<T>) -> Vec<T> {
    lookahead.take().into_iter().chain(source.by_ref()).collect()
}

impl<'a, T: 'a> Default for Enumerable<'a, T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, T: 'a> From<Vec<T>> for Enumerable<'a, T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<'a, T: 'a, const N: usize> From<[T; N]> for Enumerable<'a, T> {
    fn from(items: [T; N]) -> Self {
        Self::new(Vec::from(items))
    }
}

/// Collecting always produces a materialized sequence
impl<'a, T: 'a> FromIterator<T> for Enumerable<'a, T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T: fmt::Debug> fmt::Debug for Enumerable<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Materialized { items, position } => f
                .debug_struct("Enumerable")
                .field("materialized", items)
                .field("position", position)
                .finish(),
            Repr::Streaming { lookahead, .. } => f
                .debug_struct("Enumerable")
                .field("streaming", &"..")
                .field("lookahead", lookahead)
                .finish(),
        }
    }
}
