//! Positional slicing: `slice`, `take`, `drop`, `take_right`, `drop_right`.
//!
//! # Overview
//! - [`ListSequence::slice`] - Contiguous view `[start, end)`, negative bounds counted from the end
//! - [`ListSequence::take`] / [`ListSequence::drop`] - Leading prefix / everything after it
//! - [`ListSequence::take_right`] / [`ListSequence::drop_right`] - Trailing suffix / everything
//!   before it
//!
//! All of them reduce to one [`SliceList`] node. Non-negative bounds are used
//! as-is; as soon as one bound is negative the upstream size is materialized
//! once, both bounds are resolved against it and the result is memoized.
//!
//! The iterator forms stream when they can (non-negative bounds, or a known
//! upstream size) and otherwise buffer: `take_right` keeps a ring of the last
//! `n` elements, `drop_right` looks `n` elements ahead.

use crate::error::{Result, SequenceError};
use crate::node::{indexed_iterator, ArcList, BoxIter, IteratorMaterializer, ListMaterializer};
use crate::scratch::{BufferedIter, Ring};
use crate::sequence::{IteratorSequence, ListSequence, SeqBound};
use crate::state::StateCell;
use crate::utils::{count_bound, resolve_bound, tail_bound};
use std::sync::Arc;

pub(crate) struct SliceList<E> {
    upstream: ArcList<E>,
    bounds: StateCell<(isize, isize), (usize, usize)>,
}

impl<E: SeqBound> SliceList<E> {
    pub(crate) fn new(upstream: ArcList<E>, start: isize, end: isize) -> Self {
        Self {
            upstream,
            bounds: StateCell::new("slice", (start, end)),
        }
    }

    /// Resolved `(start, end)`, with `end` not yet clamped to the upstream size.
    fn resolve(&self) -> Result<(usize, usize)> {
        self.bounds.resolve(|(start, end)| {
            if start >= 0 && end >= 0 {
                return Ok((start.unsigned_abs(), end.unsigned_abs()));
            }
            let size = self.upstream.materialize_size()?;
            Ok((resolve_bound(start, size), resolve_bound(end, size)))
        })
    }

    fn upstream_index(&self, index: usize) -> Result<Option<usize>> {
        let (start, end) = self.resolve()?;
        // An offset past `usize::MAX` is simply out of range.
        let Some(shifted) = start.checked_add(index) else {
            return Ok(None);
        };
        if shifted < end && self.upstream.can_materialize_element(shifted)? {
            Ok(Some(shifted))
        } else {
            Ok(None)
        }
    }
}

impl<E: SeqBound> ListMaterializer<E> for SliceList<E> {
    fn known_size(&self) -> Option<usize> {
        let size = self.upstream.known_size()?;
        let (start, end) = match self.bounds.recipe() {
            Some((start, end)) => (resolve_bound(start, size), resolve_bound(end, size)),
            None => self.bounds.material()?,
        };
        Some(end.min(size).saturating_sub(start))
    }

    fn can_materialize_element(&self, index: usize) -> Result<bool> {
        Ok(self.upstream_index(index)?.is_some())
    }

    fn materialize_element(&self, index: usize) -> Result<E> {
        match self.upstream_index(index)? {
            Some(shifted) => self.upstream.materialize_element(shifted),
            None => Err(SequenceError::IndexOutOfBounds { index }),
        }
    }

    fn materialize_size(&self) -> Result<usize> {
        let (start, end) = self.resolve()?;
        let size = self.upstream.materialize_size()?;
        Ok(end.min(size).saturating_sub(start))
    }

    fn materialize_iterator(self: Arc<Self>) -> BoxIter<E> {
        indexed_iterator(self)
    }
}

/// Streaming slice: skip `start` elements on first pull, then yield up to `remaining`.
pub(crate) struct SliceIter<E> {
    upstream: BoxIter<E>,
    skip: usize,
    remaining: usize,
}

impl<E> SliceIter<E> {
    fn skip_head(&mut self) -> Result<()> {
        if self.skip > 0 && self.remaining > 0 {
            let skipped = self.upstream.materialize_skip(self.skip)?;
            if skipped < self.skip {
                self.remaining = 0;
            }
            self.skip = 0;
        }
        Ok(())
    }
}

impl<E> IteratorMaterializer<E> for SliceIter<E> {
    fn known_size(&self) -> Option<usize> {
        if self.remaining == 0 {
            return Some(0);
        }
        let size = self.upstream.known_size()?;
        Some(size.saturating_sub(self.skip).min(self.remaining))
    }

    fn materialize_has_next(&mut self) -> Result<bool> {
        self.skip_head()?;
        Ok(self.remaining > 0 && self.upstream.materialize_has_next()?)
    }

    fn materialize_next(&mut self) -> Result<E> {
        if !self.materialize_has_next()? {
            return Err(SequenceError::NoSuchElement);
        }
        self.remaining -= 1;
        self.upstream.materialize_next()
    }

    fn materialize_skip(&mut self, count: usize) -> Result<usize> {
        self.skip_head()?;
        let skipped = self.upstream.materialize_skip(count.min(self.remaining))?;
        self.remaining -= skipped;
        Ok(skipped)
    }
}

pub(crate) fn slice_iter<E: SeqBound>(
    upstream: BoxIter<E>,
    start: isize,
    end: isize,
) -> BoxIter<E> {
    let resolved = if start >= 0 && end >= 0 {
        Some((start.unsigned_abs(), end.unsigned_abs()))
    } else {
        upstream
            .known_size()
            .map(|size| (resolve_bound(start, size), resolve_bound(end, size)))
    };
    match resolved {
        Some((skip, end)) => Box::new(SliceIter {
            upstream,
            skip,
            remaining: end.saturating_sub(skip),
        }),
        None => Box::new(BufferedIter::new(upstream, None, move |list: ArcList<E>| {
            Arc::new(SliceList::new(list, start, end)).materialize_iterator()
        })),
    }
}

/// Yields the last `count` elements, held back in a ring until upstream ends.
struct TakeRightIter<E> {
    upstream: BoxIter<E>,
    ring: Ring<E>,
    count: usize,
    filled: bool,
}

impl<E> TakeRightIter<E> {
    fn fill(&mut self) -> Result<()> {
        if !self.filled {
            while self.upstream.materialize_has_next()? {
                self.ring.push(self.upstream.materialize_next()?);
            }
            self.filled = true;
        }
        Ok(())
    }
}

impl<E: Send> IteratorMaterializer<E> for TakeRightIter<E> {
    fn known_size(&self) -> Option<usize> {
        if self.filled {
            Some(self.ring.len())
        } else {
            self.upstream.known_size().map(|n| n.min(self.count))
        }
    }

    fn materialize_has_next(&mut self) -> Result<bool> {
        self.fill()?;
        Ok(!self.ring.is_empty())
    }

    fn materialize_next(&mut self) -> Result<E> {
        self.fill()?;
        self.ring.pop_front().ok_or(SequenceError::NoSuchElement)
    }
}

/// Yields all but the last `count` elements, looking `count` elements ahead.
struct DropRightIter<E> {
    upstream: BoxIter<E>,
    ring: Ring<E>,
    count: usize,
}

impl<E: Send> IteratorMaterializer<E> for DropRightIter<E> {
    fn known_size(&self) -> Option<usize> {
        let size = self.upstream.known_size()?;
        Some(size.saturating_add(self.ring.len()).saturating_sub(self.count))
    }

    fn materialize_has_next(&mut self) -> Result<bool> {
        while !self.ring.is_full() && self.upstream.materialize_has_next()? {
            self.ring.push(self.upstream.materialize_next()?);
        }
        Ok(self.ring.is_full() && self.upstream.materialize_has_next()?)
    }

    fn materialize_next(&mut self) -> Result<E> {
        if !self.materialize_has_next()? {
            return Err(SequenceError::NoSuchElement);
        }
        let element = self.upstream.materialize_next()?;
        self.ring.push(element).ok_or(SequenceError::NoSuchElement)
    }
}

impl<E: SeqBound> ListSequence<E> {
    /// Contiguous view over `[start, end)`.
    ///
    /// Negative bounds count from the end and are resolved once, against the
    /// upstream size, the first time the slice is queried. An empty range
    /// (after resolution) yields an empty sequence.
    ///
    /// # Example
    /// ```
    /// use ironseq::ListSequence;
    ///
    /// let digits = ListSequence::from_vec((0..7).collect());
    /// assert_eq!(digits.slice(2, 5).to_vec()?, vec![2, 3, 4]);
    /// assert_eq!(digits.slice(-3, -1).to_vec()?, vec![4, 5]);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn slice(&self, start: isize, end: isize) -> Self {
        ListSequence::from_materializer(SliceList::new(Arc::clone(&self.list), start, end))
    }

    /// The first `count` elements.
    #[must_use]
    pub fn take(&self, count: usize) -> Self {
        self.slice(0, count_bound(count))
    }

    /// Everything after the first `count` elements.
    #[must_use]
    pub fn drop(&self, count: usize) -> Self {
        self.slice(count_bound(count), isize::MAX)
    }

    /// The last `count` elements.
    #[must_use]
    pub fn take_right(&self, count: usize) -> Self {
        self.slice(tail_bound(count), isize::MAX)
    }

    /// Everything before the last `count` elements.
    #[must_use]
    pub fn drop_right(&self, count: usize) -> Self {
        self.slice(0, tail_bound(count))
    }
}

impl<E: SeqBound> IteratorSequence<E> {
    /// Elements in `[start, end)`; see [`ListSequence::slice`].
    ///
    /// Negative bounds over an upstream of unknown size buffer the whole upstream.
    #[must_use]
    pub fn slice(self, start: isize, end: isize) -> Self {
        IteratorSequence::from_boxed(slice_iter(self.iter, start, end))
    }

    /// The first `count` elements.
    ///
    /// # Example
    /// ```
    /// use ironseq::IteratorSequence;
    ///
    /// assert_eq!(IteratorSequence::repeat_forever('x').take(3).to_vec()?, vec!['x'; 3]);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn take(self, count: usize) -> Self {
        self.slice(0, count_bound(count))
    }

    /// Everything after the first `count` elements, skipped on the first pull.
    #[must_use]
    pub fn drop(self, count: usize) -> Self {
        self.slice(count_bound(count), isize::MAX)
    }

    /// The last `count` elements. Pulls the whole upstream on first demand.
    #[must_use]
    pub fn take_right(self, count: usize) -> Self {
        IteratorSequence::from_materializer(TakeRightIter {
            upstream: self.iter,
            ring: Ring::new(count),
            count,
            filled: false,
        })
    }

    /// Everything before the last `count` elements.
    #[must_use]
    pub fn drop_right(self, count: usize) -> Self {
        IteratorSequence::from_materializer(DropRightIter {
            upstream: self.iter,
            ring: Ring::new(count),
            count,
        })
    }
}
