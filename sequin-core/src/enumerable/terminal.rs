//! Terminal operators: they read the sequence to produce a value.
//!
//! On a materialized sequence every read starts from the first element and
//! consumes nothing. On a stream they pull from the shared cursor; whatever
//! they pulled is gone afterwards, including when they fail or short-circuit.

use super::{drain, Enumerable, Repr};
use crate::config::EqualityMode;
use crate::error::CallbackError;
use crate::{observability, SequinError};
use std::collections::HashSet;
use std::hash::Hash;

impl<'a, T: 'a> Enumerable<'a, T> {
    /// Visit elements until `visit` returns `Some`
    fn find_map<B>(&mut self, mut visit: impl FnMut(&T) -> Option<B>) -> Option<B> {
        match &mut self.repr {
            Repr::Materialized { items, .. } => items.iter().find_map(visit),
            Repr::Streaming { source, lookahead } => lookahead
                .take()
                .into_iter()
                .chain(source.by_ref())
                .find_map(|item| visit(&item)),
        }
    }

    /// Look at the next element without consuming it.
    ///
    /// A stream pulls one element into a lookahead slot that every later read
    /// serves first.
    pub fn peek(&mut self) -> Option<&T> {
        match &mut self.repr {
            Repr::Materialized { items, .. } => items.first(),
            Repr::Streaming { source, lookahead } => {
                if lookahead.is_none() {
                    *lookahead = source.next();
                }
                lookahead.as_ref()
            }
        }
    }

    /// Truthiness: at least one element is available
    pub fn has_elements(&mut self) -> bool {
        self.peek().is_some()
    }

    pub fn is_empty(&mut self) -> bool {
        !self.has_elements()
    }

    pub fn first(&mut self) -> crate::Result<T>
    where
        T: Clone,
    {
        self.first_where(|_| true)
    }

    /// First element matching `predicate`.
    ///
    /// A stream is consumed up to and including the match, or entirely when
    /// nothing matches.
    pub fn first_where<P>(&mut self, predicate: P) -> crate::Result<T>
    where
        T: Clone,
        P: FnMut(&T) -> bool,
    {
        self.find_first(predicate).ok_or(SequinError::empty("first"))
    }

    fn find_first<P>(&mut self, mut predicate: P) -> Option<T>
    where
        T: Clone,
        P: FnMut(&T) -> bool,
    {
        self.find_map(|item| predicate(item).then(|| item.clone()))
    }

    /// `first`, with `default` standing in for an empty sequence
    pub fn first_or_default(&mut self, default: T) -> T
    where
        T: Clone,
    {
        self.first_or_default_where(default, |_| true)
    }

    /// `first_where`, with `default` standing in when nothing matches.
    ///
    /// Only the empty condition is replaced; a panicking predicate still
    /// propagates.
    pub fn first_or_default_where<P>(&mut self, default: T, predicate: P) -> T
    where
        T: Clone,
        P: FnMut(&T) -> bool,
    {
        self.find_first(predicate).unwrap_or(default)
    }

    pub fn last(&mut self) -> crate::Result<T>
    where
        T: Clone,
    {
        self.last_where(|_| true)
    }

    /// Last element matching `predicate`.
    ///
    /// A materialized sequence is scanned from the end. A stream has no end to
    /// look at: the whole remaining source is consumed (never returning on an
    /// infinite one), keeping only the most recent match.
    pub fn last_where<P>(&mut self, mut predicate: P) -> crate::Result<T>
    where
        T: Clone,
        P: FnMut(&T) -> bool,
    {
        let found = match &mut self.repr {
            Repr::Materialized { items, .. } => {
                items.iter().rev().find(|item| predicate(item)).cloned()
            }
            Repr::Streaming { source, lookahead } => lookahead
                .take()
                .into_iter()
                .chain(source.by_ref())
                .filter(|item| predicate(item))
                .last(),
        };
        found.ok_or(SequinError::empty("last"))
    }

    /// Number of elements. O(1) when materialized; drains a stream.
    pub fn count(&mut self) -> usize {
        match &mut self.repr {
            Repr::Materialized { items, .. } => items.len(),
            Repr::Streaming { source, lookahead } => {
                lookahead.take().into_iter().chain(source.by_ref()).count()
            }
        }
    }

    pub fn count_where<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        match &mut self.repr {
            Repr::Materialized { items, .. } => {
                items.iter().filter(|item| predicate(item)).count()
            }
            Repr::Streaming { source, lookahead } => lookahead
                .take()
                .into_iter()
                .chain(source.by_ref())
                .filter(|item| predicate(item))
                .count(),
        }
    }

    /// At least one element exists. Peeks, so a stream loses nothing.
    pub fn any(&mut self) -> bool {
        self.has_elements()
    }

    /// Some element matches; a stream is consumed up to the first match
    pub fn any_where<P>(&mut self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.find_map(|item| predicate(item).then_some(())).is_some()
    }

    /// Every element matches; a stream is consumed up to the first miss
    pub fn all<P>(&mut self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.find_map(|item| (!predicate(item)).then_some(())).is_none()
    }

    /// Containment by value equality
    pub fn contains(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.any_where(|item| item == value)
    }

    /// Left fold seeded with the first element
    pub fn aggregate<F>(&mut self, func: F) -> crate::Result<T>
    where
        T: Clone,
        F: FnMut(T, T) -> T,
    {
        let mut elements = self.traverse();
        let seed = elements.next().ok_or(SequinError::empty("aggregate"))?;
        Ok(elements.fold(seed, func))
    }

    /// Left fold from `seed`; an empty sequence yields `seed`
    pub fn aggregate_with_seed<F>(&mut self, seed: T, func: F) -> T
    where
        T: Clone,
        F: FnMut(T, T) -> T,
    {
        self.fold(seed, func)
    }

    /// Left fold into any accumulator type
    pub fn fold<A, F>(&mut self, seed: A, func: F) -> A
    where
        T: Clone,
        F: FnMut(A, T) -> A,
    {
        self.traverse().fold(seed, func)
    }

    /// Left fold with a fallible combiner.
    ///
    /// The first error stops the fold; elements after it are not pulled.
    pub fn try_fold<A, E, F>(&mut self, seed: A, mut func: F) -> crate::Result<A>
    where
        T: Clone,
        E: Into<CallbackError>,
        F: FnMut(A, T) -> Result<A, E>,
    {
        let mut acc = seed;
        for item in self.traverse() {
            acc = func(acc, item).map_err(|e| SequinError::Callback(e.into()))?;
        }
        Ok(acc)
    }

    /// Position-by-position comparison with `other`.
    ///
    /// Under `EqualityMode::Prefix` (the default) comparison stops at the
    /// shorter sequence, so `[1, 2]` equals `[1, 2, 3]`. `EqualityMode::Full`
    /// also requires both to end together. The mode comes from `self`.
    pub fn sequence_equal<'b>(&mut self, other: &mut Enumerable<'b, T>) -> bool
    where
        T: PartialEq + Clone + 'b,
    {
        let mut compared = 0;
        let left_ended = {
            let mut left = self.traverse();
            let mut right = other.traverse();
            loop {
                let Some(a) = left.next() else { break true };
                let Some(b) = right.next() else { break false };
                if a != b {
                    return false;
                }
                compared += 1;
            }
        };

        if left_ended && !other.has_elements() {
            return true;
        }
        match self.options.equality {
            EqualityMode::Full => false,
            EqualityMode::Prefix => {
                observability::PrefixMatchOnly { compared }.log();
                true
            }
        }
    }

    /// All elements as a `Vec`; a materialized sequence is cloned, a stream drained
    pub fn to_list(&mut self) -> Vec<T>
    where
        T: Clone,
    {
        let options = self.options;
        match &mut self.repr {
            Repr::Materialized { items, .. } => items.clone(),
            Repr::Streaming { source, lookahead } => {
                let items = drain(source, lookahead);
                observability::Materialized {
                    operation: "to_list",
                    buffered: items.len(),
                    from_stream: true,
                }
                .log(&options);
                items
            }
        }
    }

    /// `to_list` without the `Clone` bound, consuming the wrapper
    pub fn into_list(self) -> Vec<T> {
        if self.is_streaming() {
            return self.buffer("into_list").0;
        }
        self.into_iter().collect()
    }

    /// Unique elements as a `HashSet`
    pub fn to_set(&mut self) -> HashSet<T>
    where
        T: Eq + Hash + Clone,
    {
        let options = self.options;
        match &mut self.repr {
            Repr::Materialized { items, .. } => items.iter().cloned().collect(),
            Repr::Streaming { source, lookahead } => {
                let set: HashSet<T> = lookahead.take().into_iter().chain(source.by_ref()).collect();
                observability::Materialized {
                    operation: "to_set",
                    buffered: set.len(),
                    from_stream: true,
                }
                .log(&options);
                set
            }
        }
    }
}

impl<'a, U: 'a, E: 'a> Enumerable<'a, Result<U, E>>
where
    E: Into<CallbackError>,
{
    /// Collect successful values, stopping at the first error.
    ///
    /// Nothing after the failing element is pulled from a stream.
    pub fn try_into_list(self) -> crate::Result<Vec<U>> {
        self.into_iter()
            .map(|item| item.map_err(|e| SequinError::Callback(e.into())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueryOptions;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_first_and_default() {
        let mut empty = Enumerable::<&str>::empty();
        assert!(matches!(
            empty.first(),
            Err(SequinError::EmptySequence { operation: "first" })
        ));
        assert_eq!(empty.first_or_default("X"), "X");

        let mut seq = Enumerable::new(vec![3, 8, 5]);
        assert_eq!(seq.first().unwrap(), 3);
        assert_eq!(seq.first_where(|x| *x > 4).unwrap(), 8);
        assert_eq!(seq.first_or_default_where(0, |x| *x > 10), 0);
    }

    #[test]
    fn test_first_or_default_lets_predicate_panic_through() {
        let result = std::panic::catch_unwind(|| {
            let mut seq = Enumerable::new(vec![4, 0, 2]);
            seq.first_or_default_where(-1, |x| 8 / x > 100)
        });
        assert!(result.is_err());

        let result = std::panic::catch_unwind(|| {
            let mut seq = Enumerable::streaming(vec![4, 0, 2]);
            seq.first_or_default_where(-1, |x| 8 / x > 100)
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_first_streaming_consumes_through_match() {
        let mut seq = Enumerable::streaming(1..=6);
        assert_eq!(seq.first_where(|x| x % 3 == 0).unwrap(), 3);
        assert_eq!(seq.first().unwrap(), 4);
    }

    #[test]
    fn test_last() {
        let mut seq = Enumerable::new(vec![1, 2, 3, 4]);
        assert_eq!(seq.last().unwrap(), 4);
        assert_eq!(seq.last_where(|x| x % 2 == 1).unwrap(), 3);
        assert!(seq.last_where(|x| *x > 9).is_err());

        let mut seq = Enumerable::streaming(vec![1, 2, 3, 4]);
        assert_eq!(seq.last_where(|x| x % 2 == 1).unwrap(), 3);
        // The whole stream went into finding it
        assert!(matches!(
            seq.last(),
            Err(SequinError::EmptySequence { operation: "last" })
        ));
    }

    #[test]
    fn test_count() {
        let mut seq = Enumerable::new(vec![1, 2, 3]);
        assert_eq!(seq.count(), 3);
        assert_eq!(seq.count_where(|x| *x >= 2), 2);
        assert_eq!(seq.count(), 3);

        let mut seq = Enumerable::streaming(vec![1, 2, 3]);
        assert_eq!(seq.count_where(|x| *x >= 2), 2);
        assert_eq!(seq.count(), 0);
    }

    #[test]
    fn test_any_peeks_without_consuming() {
        let pulled = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulled);
        let mut seq = Enumerable::streaming((1..).inspect(move |_| counter.set(counter.get() + 1)));

        assert!(seq.any());
        assert!(seq.has_elements());
        assert_eq!(pulled.get(), 1);
        assert_eq!(seq.first().unwrap(), 1);
        assert_eq!(pulled.get(), 1);
    }

    #[test]
    fn test_truthiness_of_empty_stream() {
        let mut seq = Enumerable::streaming(Vec::<u8>::new());
        assert!(seq.is_empty());
        assert!(!seq.any());
    }

    #[test]
    fn test_any_where_and_all_short_circuit() {
        let mut seq = Enumerable::streaming(vec![2, 4, 5, 6]);
        assert!(!seq.all(|x| x % 2 == 0));
        // 5 was the falsifying element and is gone
        assert_eq!(seq.first().unwrap(), 6);

        let mut seq = Enumerable::streaming(vec![1, 2, 3]);
        assert!(seq.any_where(|x| *x == 2));
        assert_eq!(seq.to_list(), vec![3]);

        let mut empty = Enumerable::<i32>::empty();
        assert!(empty.all(|_| false));
    }

    #[test]
    fn test_contains() {
        let mut seq = Enumerable::new(vec!["a".to_string(), "b".to_string()]);
        assert!(seq.contains(&"b".to_string()));
        assert!(!seq.contains(&"z".to_string()));

        let mut seq = Enumerable::streaming(1..10);
        assert!(seq.contains(&4));
        assert_eq!(seq.first().unwrap(), 5);
    }

    #[test]
    fn test_aggregate() {
        let mut seq = Enumerable::new(vec![1, 2, 3, 4]);
        assert_eq!(seq.aggregate(|acc, x| acc * 10 + x).unwrap(), 1234);
        assert_eq!(seq.aggregate_with_seed(9, |acc, x| acc * 10 + x), 91234);
        assert_eq!(seq.fold(String::new(), |acc, x| acc + &x.to_string()), "1234");

        let mut empty = Enumerable::<i32>::streaming(std::iter::empty());
        assert!(matches!(
            empty.aggregate(|a, b| a + b),
            Err(SequinError::EmptySequence { operation: "aggregate" })
        ));
        assert_eq!(empty.aggregate_with_seed(7, |a, b| a + b), 7);
    }

    #[test]
    fn test_try_fold_stops_at_error() {
        let mut seq = Enumerable::streaming(vec!["1", "2", "x", "4"]);
        let result = seq.try_fold(0, |acc, s| s.parse::<i32>().map(|n| acc + n));
        assert!(matches!(result, Err(SequinError::Callback(_))));
        // Not rewound: the element after the failure is next
        assert_eq!(seq.first().unwrap(), "4");
    }

    #[test]
    fn test_try_into_list() {
        let ok = Enumerable::new(vec!["1", "2"]).select(|s| s.parse::<i32>());
        assert_eq!(ok.try_into_list().unwrap(), vec![1, 2]);

        let pulled = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulled);
        let failing = Enumerable::streaming(vec!["1", "oops", "3"])
            .select(move |s| {
                counter.set(counter.get() + 1);
                s.parse::<i32>()
            });
        assert!(matches!(
            failing.try_into_list(),
            Err(SequinError::Callback(_))
        ));
        assert_eq!(pulled.get(), 2);
    }

    #[test]
    fn test_sequence_equal_prefix_default() {
        let mut a = Enumerable::new(vec![1, 2]);
        let mut b = Enumerable::new(vec![1, 2, 3]);
        assert!(a.sequence_equal(&mut b));
        assert!(b.sequence_equal(&mut a));

        let mut c = Enumerable::new(vec![1, 5]);
        assert!(!a.sequence_equal(&mut c));
    }

    #[test]
    fn test_sequence_equal_full_mode() {
        let full = QueryOptions::new().with_equality(EqualityMode::Full);
        let mut a = Enumerable::new(vec![1, 2]).with_options(full);
        let mut b = Enumerable::streaming(vec![1, 2, 3]);
        assert!(!a.sequence_equal(&mut b));

        let mut a = Enumerable::new(vec![1, 2, 3]).with_options(full);
        let mut b = Enumerable::streaming(vec![1, 2, 3]);
        assert!(a.sequence_equal(&mut b));

        let mut a = Enumerable::new(vec![1, 2, 3]).with_options(full);
        let mut b = Enumerable::new(vec![1, 2]);
        assert!(!a.sequence_equal(&mut b));
    }

    #[test]
    fn test_to_list_and_set() {
        let mut seq = Enumerable::new(vec![1, 2, 2]);
        assert_eq!(seq.to_list(), vec![1, 2, 2]);
        assert_eq!(seq.to_list(), vec![1, 2, 2]);
        assert_eq!(seq.to_set(), HashSet::from([1, 2]));

        let mut seq = Enumerable::streaming(vec![3, 3, 4]);
        assert_eq!(seq.to_set(), HashSet::from([3, 4]));
        assert!(seq.to_list().is_empty());
    }

    #[test]
    fn test_into_list_without_clone() {
        struct Token(u8);
        let tokens = Enumerable::streaming((0..3).map(Token)).into_list();
        assert_eq!(tokens.iter().map(|t| t.0).sum::<u8>(), 3);
    }
}
