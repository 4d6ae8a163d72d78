//! Ordering, grouping and deduplication.
//!
//! All of these need the whole sequence before producing anything, so they
//! buffer the source (O(n) time and space) and always return a materialized
//! sequence. Running one on an infinite stream does not terminate.

use super::Enumerable;
use crate::config::QueryOptions;
use crate::SequinError;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// One key and the elements that produced it, in source order.
///
/// Equality compares the key and elements; the inherited options are ignored.
#[derive(Debug, Clone)]
pub struct Grouping<K, T> {
    key: K,
    elements: Vec<T>,
    options: QueryOptions,
}

impl<K, T> Grouping<K, T> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The group's elements as a materialized sequence
    pub fn group<'g>(&self) -> Enumerable<'g, T>
    where
        T: Clone + 'g,
    {
        Enumerable::from_items(self.elements.clone(), self.options)
    }

    /// Split into the key and a materialized sequence of the elements
    pub fn into_parts<'g>(self) -> (K, Enumerable<'g, T>)
    where
        T: 'g,
    {
        (self.key, Enumerable::from_items(self.elements, self.options))
    }
}

impl<K: PartialEq, T: PartialEq> PartialEq for Grouping<K, T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.elements == other.elements
    }
}

impl<K: Eq, T: Eq> Eq for Grouping<K, T> {}

impl<'a, T: 'a> Enumerable<'a, T> {
    /// Stable ascending sort by `key_selector`.
    ///
    /// Keys only need `PartialOrd`; a pair that does not compare (a NaN, say)
    /// fails the whole sort with `NotComparable`.
    pub fn order_by<K, F>(self, key_selector: F) -> crate::Result<Self>
    where
        K: PartialOrd,
        F: FnMut(&T) -> K,
    {
        self.sorted("order_by", key_selector, false)
    }

    /// Stable descending sort by `key_selector`; equal keys keep source order
    pub fn order_by_descending<K, F>(self, key_selector: F) -> crate::Result<Self>
    where
        K: PartialOrd,
        F: FnMut(&T) -> K,
    {
        self.sorted("order_by_descending", key_selector, true)
    }

    /// `order_by` with the element itself as key
    pub fn order(self) -> crate::Result<Self>
    where
        T: PartialOrd + Clone,
    {
        self.order_by(T::clone)
    }

    /// `order_by_descending` with the element itself as key
    pub fn order_descending(self) -> crate::Result<Self>
    where
        T: PartialOrd + Clone,
    {
        self.order_by_descending(T::clone)
    }

    fn sorted<K, F>(
        self,
        operation: &'static str,
        mut key_selector: F,
        descending: bool,
    ) -> crate::Result<Self>
    where
        K: PartialOrd,
        F: FnMut(&T) -> K,
    {
        let (items, options) = self.buffer(operation);
        let mut keyed: Vec<(K, T)> = items
            .into_iter()
            .map(|item| (key_selector(&item), item))
            .collect();

        // A key that does not compare with itself (NaN) would hand the sort an
        // inconsistent order
        if keyed.iter().any(|(key, _)| key.partial_cmp(key).is_none()) {
            return Err(SequinError::NotComparable { operation });
        }

        let mut incomparable = false;
        keyed.sort_by(|(a, _), (b, _)| {
            let ordering = if descending {
                b.partial_cmp(a)
            } else {
                a.partial_cmp(b)
            };
            ordering.unwrap_or_else(|| {
                incomparable = true;
                Ordering::Equal
            })
        });
        if incomparable {
            return Err(SequinError::NotComparable { operation });
        }

        let items = keyed.into_iter().map(|(_, item)| item).collect();
        Ok(Self::from_items(items, options))
    }

    /// Group elements by key.
    ///
    /// Groups come out in the order their key was first seen; each group keeps
    /// its elements in source order.
    pub fn group_by<K, F>(self, mut key_selector: F) -> Enumerable<'a, Grouping<K, T>>
    where
        K: Eq + Hash + Clone + 'a,
        F: FnMut(&T) -> K,
    {
        let (items, options) = self.buffer("group_by");
        let mut slots: HashMap<K, usize> = HashMap::new();
        let mut groups: Vec<Grouping<K, T>> = Vec::new();

        for item in items {
            let key = key_selector(&item);
            match slots.get(&key) {
                Some(&slot) => groups[slot].elements.push(item),
                None => {
                    slots.insert(key.clone(), groups.len());
                    groups.push(Grouping {
                        key,
                        elements: vec![item],
                        options,
                    });
                }
            }
        }

        Enumerable::from_items(groups, options)
    }

    /// Each distinct value once, in order of first occurrence
    pub fn distinct(self) -> Self
    where
        T: Eq + Hash + Clone,
    {
        let (items, options) = self.buffer("distinct");
        let mut seen = HashSet::with_capacity(items.len());
        let unique = items
            .into_iter()
            .filter(|item| seen.insert(item.clone()))
            .collect();
        Self::from_items(unique, options)
    }
}
