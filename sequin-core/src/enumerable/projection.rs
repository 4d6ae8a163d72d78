//! Filtering, projection, flattening, windowing and concatenation.
//!
//! These keep the receiver's representation: a materialized input is
//! transformed eagerly into a new `Vec`, a streaming input gets a lazy adapter
//! that runs element by element as the result is pulled. A panicking callable
//! stops the pull where it happened.

use super::{resume, Enumerable, Repr};
use std::ops::Add;

impl<'a, T: 'a> Enumerable<'a, T> {
    /// Keep the elements matching `predicate`
    #[doc(alias = "where")]
    pub fn filter<P>(self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool + 'a,
    {
        let Enumerable { repr, options } = self;
        match repr {
            Repr::Materialized { mut items, .. } => {
                items.retain(|item| predicate(item));
                Self::from_items(items, options)
            }
            Repr::Streaming { source, lookahead } => Self::from_stream(
                resume(lookahead, source).filter(move |item| predicate(item)),
                options,
            ),
        }
    }

    /// Map every element through `selector`
    pub fn select<R, F>(self, selector: F) -> Enumerable<'a, R>
    where
        R: 'a,
        F: FnMut(T) -> R + 'a,
    {
        let Enumerable { repr, options } = self;
        match repr {
            Repr::Materialized { items, .. } => {
                Enumerable::from_items(items.into_iter().map(selector).collect(), options)
            }
            Repr::Streaming { source, lookahead } => {
                Enumerable::from_stream(resume(lookahead, source).map(selector), options)
            }
        }
    }

    /// Map every element to a sub-sequence and flatten one level.
    ///
    /// Sub-sequences are emitted whole, one after another, in source order.
    pub fn select_many<R, I, F>(self, selector: F) -> Enumerable<'a, R>
    where
        R: 'a,
        I: IntoIterator<Item = R> + 'a,
        I::IntoIter: 'a,
        F: FnMut(T) -> I + 'a,
    {
        let Enumerable { repr, options } = self;
        match repr {
            Repr::Materialized { items, .. } => {
                Enumerable::from_items(items.into_iter().flat_map(selector).collect(), options)
            }
            Repr::Streaming { source, lookahead } => {
                Enumerable::from_stream(resume(lookahead, source).flat_map(selector), options)
            }
        }
    }

    /// The first `count` elements; fewer if the sequence is shorter
    pub fn take(self, count: usize) -> Self {
        let Enumerable { repr, options } = self;
        match repr {
            Repr::Materialized { mut items, .. } => {
                items.truncate(count);
                Self::from_items(items, options)
            }
            Repr::Streaming { source, lookahead } => {
                Self::from_stream(resume(lookahead, source).take(count), options)
            }
        }
    }

    /// Everything after the first `count` elements.
    ///
    /// On a stream the skipped elements are pulled lazily, the first time the
    /// result is read.
    pub fn skip(self, count: usize) -> Self {
        let Enumerable { repr, options } = self;
        match repr {
            Repr::Materialized { mut items, .. } => {
                items.drain(..count.min(items.len()));
                Self::from_items(items, options)
            }
            Repr::Streaming { source, lookahead } => {
                Self::from_stream(resume(lookahead, source).skip(count), options)
            }
        }
    }

    /// This sequence followed by `other`.
    ///
    /// Always streaming: both sources are chained, nothing is copied.
    pub fn concat<I>(self, other: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        let options = self.options;
        Self::from_stream(self.into_iter().chain(other), options)
    }
}

impl<'a, T: 'a, I> Add<I> for Enumerable<'a, T>
where
    I: IntoIterator<Item = T>,
    I::IntoIter: 'a,
{
    type Output = Enumerable<'a, T>;

    fn add(self, other: I) -> Self::Output {
        self.concat(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_filter_select_materialized() {
        let mut seq = Enumerable::new((0..5).collect())
            .filter(|x| x % 2 == 0)
            .select(|x| x * x);
        assert!(seq.is_materialized());
        assert_eq!(seq.to_list(), vec![0, 4, 16]);
    }

    #[test]
    fn test_filter_select_streaming_is_lazy() {
        let pulled = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulled);
        let source = (0..).inspect(move |_| counter.set(counter.get() + 1));

        let mut seq = Enumerable::streaming(source)
            .filter(|x| x % 2 == 0)
            .select(|x| x * x);
        assert!(seq.is_streaming());
        assert_eq!(pulled.get(), 0);

        assert_eq!(seq.first().unwrap(), 0);
        assert_eq!(seq.first().unwrap(), 4);
        assert_eq!(pulled.get(), 3);
    }

    #[test]
    fn test_select_many_keeps_subsequences_together() {
        let words = vec!["ab", "", "cde"];
        let mut flat = Enumerable::new(words.clone()).select_many(|w| w.chars());
        assert_eq!(flat.to_list(), vec!['a', 'b', 'c', 'd', 'e']);

        let mut flat = Enumerable::streaming(words).select_many(|w| w.chars().rev());
        assert!(flat.is_streaming());
        assert_eq!(flat.to_list(), vec!['b', 'a', 'e', 'd', 'c']);
    }

    #[test]
    fn test_select_many_borrowing_selector() {
        let nested = vec![vec![1, 2], vec![], vec![3]];
        let mut flat =
            Enumerable::streaming(nested.iter()).select_many(|inner| inner.iter().copied());
        assert_eq!(flat.to_list(), vec![1, 2, 3]);
    }

    #[test]
    fn test_take_and_skip_clamp() {
        let mut seq = Enumerable::new(vec![1, 2, 3]).take(10);
        assert_eq!(seq.to_list(), vec![1, 2, 3]);

        let mut seq = Enumerable::new(vec![1, 2, 3]).take(0);
        assert!(seq.is_empty());

        let mut seq = Enumerable::new(vec![1, 2, 3]).skip(0);
        assert_eq!(seq.to_list(), vec![1, 2, 3]);

        let mut seq = Enumerable::new(vec![1, 2, 3]).skip(7);
        assert_eq!(seq.count(), 0);
    }

    #[test]
    fn test_take_on_infinite_stream() {
        let mut seq = Enumerable::streaming(1..).skip(2).take(3);
        assert!(seq.is_streaming());
        assert_eq!(seq.to_list(), vec![3, 4, 5]);
    }

    #[test]
    fn test_take_after_peek_keeps_peeked_element() {
        let mut seq = Enumerable::streaming(vec![1, 2, 3]);
        assert!(seq.any());
        let mut head = seq.take(2);
        assert_eq!(head.to_list(), vec![1, 2]);
    }

    #[test]
    fn test_concat_is_streaming() {
        let mut joined = Enumerable::new(vec![1, 2]) + Enumerable::new(vec![3, 4]);
        assert!(joined.is_streaming());
        assert_eq!(joined.to_list(), vec![1, 2, 3, 4]);

        let mut joined = Enumerable::streaming(0..2).concat(vec![9]);
        assert_eq!(joined.to_list(), vec![0, 1, 9]);
    }

    #[test]
    fn test_predicate_panic_propagates() {
        let result = std::panic::catch_unwind(|| {
            Enumerable::new(vec![1, 0, 2])
                .select(|x| 10 / x)
                .count()
        });
        assert!(result.is_err());
    }
}
