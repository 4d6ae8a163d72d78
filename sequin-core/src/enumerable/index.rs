//! Positional access and slicing

use super::{drain, resume, Enumerable, Repr};
use crate::{observability, SequinError};

impl<'a, T: 'a> Enumerable<'a, T> {
    /// Element at `index`; negative indices count from the end.
    ///
    /// * Materialized: O(1), nothing is consumed.
    /// * Streaming, `index >= 0`: pulls `index + 1` elements from the shared
    ///   cursor. They stay consumed even when the index is out of range.
    /// * Streaming, `index < 0`: buffers the entire remaining stream (O(n) time
    ///   and space) to find the end, leaving the instance exhausted.
    pub fn get(&mut self, index: isize) -> crate::Result<T>
    where
        T: Clone,
    {
        let options = self.options;
        match &mut self.repr {
            Repr::Materialized { items, .. } => resolve(items.len(), index)
                .map(|at| items[at].clone())
                .ok_or(SequinError::IndexOutOfRange {
                    index,
                    len: items.len(),
                }),
            Repr::Streaming { source, lookahead } if index < 0 => {
                let mut buffered = drain(source, lookahead);
                observability::Materialized {
                    operation: "get",
                    buffered: buffered.len(),
                    from_stream: true,
                }
                .log(&options);
                let len = buffered.len();
                resolve(len, index)
                    .map(|at| buffered.swap_remove(at))
                    .ok_or(SequinError::IndexOutOfRange { index, len })
            }
            Repr::Streaming { source, lookahead } => {
                let target = index.unsigned_abs();
                let mut pulled = 0;
                while let Some(value) = lookahead.take().or_else(|| source.next()) {
                    if pulled == target {
                        return Ok(value);
                    }
                    pulled += 1;
                }
                Err(SequinError::IndexOutOfRange { index, len: pulled })
            }
        }
    }

    /// Elements from `start` up to `stop`, taking every `step`-th one.
    ///
    /// `None` bounds run to the matching end of the sequence.
    ///
    /// * Materialized: negative bounds count from the end and a negative step
    ///   walks backwards (`slice(None, None, -1)` reverses). Bounds past either
    ///   end are clamped. The result is a new materialized sequence.
    /// * Streaming: a lazy window over what remains, evaluated only when read.
    ///   A stream has no known end, so negative bounds or a negative step return
    ///   `NegativeStreamSlice`; call `materialize()` first to use them.
    pub fn slice(
        self,
        start: Option<isize>,
        stop: Option<isize>,
        step: isize,
    ) -> crate::Result<Self> {
        if step == 0 {
            return Err(SequinError::InvalidStep);
        }
        let Enumerable { repr, options } = self;
        match repr {
            Repr::Materialized { items, .. } => {
                let window = Window::resolve(items.len(), start, stop, step);
                Ok(Self::from_items(window.select(items), options))
            }
            Repr::Streaming { source, lookahead } => {
                if [start, stop, Some(step)].into_iter().flatten().any(|b| b < 0) {
                    return Err(SequinError::NegativeStreamSlice);
                }
                let from = start.map_or(0, isize::unsigned_abs);
                let width = stop.map_or(usize::MAX, |s| s.unsigned_abs().saturating_sub(from));
                Ok(Self::from_stream(
                    resume(lookahead, source)
                        .skip(from)
                        .take(width)
                        .step_by(step.unsigned_abs()),
                    options,
                ))
            }
        }
    }
}

/// Slice bounds normalized against a known length.
///
/// Going forward, `start` and `stop` lie in `0..=len`. Going backward they lie
/// in `-1..len`, where `-1` means "before the first element".
#[derive(Debug, PartialEq, Eq)]
struct Window {
    start: isize,
    stop: isize,
    step: isize,
}

impl Window {
    fn resolve(len: usize, start: Option<isize>, stop: Option<isize>, step: isize) -> Self {
        let len = isize::try_from(len).unwrap_or(isize::MAX);
        let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };
        let clamp = |bound: isize| {
            let bound = if bound < 0 { bound.saturating_add(len) } else { bound };
            bound.clamp(lower, upper)
        };
        let (first, last) = if step < 0 { (upper, lower) } else { (lower, upper) };
        Self {
            start: start.map_or(first, clamp),
            stop: stop.map_or(last, clamp),
            step,
        }
    }

    fn select<T>(&self, items: Vec<T>) -> Vec<T> {
        let stride = self.step.unsigned_abs();
        if self.step > 0 {
            let width = self.stop.saturating_sub(self.start).max(0).unsigned_abs();
            items
                .into_iter()
                .skip(self.start.unsigned_abs())
                .take(width)
                .step_by(stride)
                .collect()
        } else {
            // Walk (stop, start] from the top down
            let end = (self.start + 1).max(0).unsigned_abs();
            let begin = (self.stop + 1).max(0).unsigned_abs();
            items
                .into_iter()
                .take(end)
                .skip(begin)
                .rev()
                .step_by(stride)
                .collect()
        }
    }
}

/// Map a possibly negative index onto `0..len`
fn resolve(len: usize, index: isize) -> Option<usize> {
    let at = if index < 0 {
        len.checked_sub(index.unsigned_abs())?
    } else {
        index.unsigned_abs()
    };
    (at < len).then_some(at)
}
