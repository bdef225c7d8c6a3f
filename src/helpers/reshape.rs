//! Shape-changing operators: `resize` and `reverse`.
//!
//! `resize(len, filler)` truncates longer sources and pads shorter ones with
//! `filler`; its size is `len` without looking at the upstream. `reverse`
//! maps index `i` to `size - 1 - i`, so it materializes the upstream size once
//! (list) or buffers the whole upstream (iterator).

use crate::error::{Result, SequenceError};
use crate::node::{indexed_iterator, ArcList, BoxIter, IteratorMaterializer, ListMaterializer};
use crate::scratch::BufferedIter;
use crate::sequence::{IteratorSequence, ListSequence, SeqBound};
use crate::state::StateCell;
use std::sync::Arc;

struct ResizeList<E> {
    upstream: ArcList<E>,
    len: usize,
    filler: E,
}

impl<E: SeqBound> ListMaterializer<E> for ResizeList<E> {
    fn known_size(&self) -> Option<usize> {
        Some(self.len)
    }

    fn can_materialize_element(&self, index: usize) -> Result<bool> {
        Ok(index < self.len)
    }

    fn materialize_element(&self, index: usize) -> Result<E> {
        if index >= self.len {
            return Err(SequenceError::IndexOutOfBounds { index });
        }
        if self.upstream.can_materialize_element(index)? {
            self.upstream.materialize_element(index)
        } else {
            Ok(self.filler.clone())
        }
    }

    fn materialize_size(&self) -> Result<usize> {
        Ok(self.len)
    }

    fn materialize_iterator(self: Arc<Self>) -> BoxIter<E> {
        Box::new(ResizeIter {
            upstream: Arc::clone(&self.upstream).materialize_iterator(),
            remaining: self.len,
            filler: self.filler.clone(),
        })
    }
}

struct ResizeIter<E> {
    upstream: BoxIter<E>,
    remaining: usize,
    filler: E,
}

impl<E: Clone + Send> IteratorMaterializer<E> for ResizeIter<E> {
    fn known_size(&self) -> Option<usize> {
        Some(self.remaining)
    }

    fn materialize_has_next(&mut self) -> Result<bool> {
        Ok(self.remaining > 0)
    }

    fn materialize_next(&mut self) -> Result<E> {
        if self.remaining == 0 {
            return Err(SequenceError::NoSuchElement);
        }
        self.remaining -= 1;
        if self.upstream.materialize_has_next()? {
            self.upstream.materialize_next()
        } else {
            Ok(self.filler.clone())
        }
    }

    fn materialize_skip(&mut self, count: usize) -> Result<usize> {
        let skipped = count.min(self.remaining);
        self.upstream.materialize_skip(skipped)?;
        self.remaining -= skipped;
        Ok(skipped)
    }
}

pub(crate) struct ReverseList<E> {
    upstream: ArcList<E>,
    size: StateCell<(), usize>,
}

impl<E: SeqBound> ReverseList<E> {
    pub(crate) fn new(upstream: ArcList<E>) -> Self {
        Self {
            upstream,
            size: StateCell::new("reverse", ()),
        }
    }

    fn size(&self) -> Result<usize> {
        match self.upstream.known_size() {
            Some(size) => Ok(size),
            None => self.size.resolve(|()| self.upstream.materialize_size()),
        }
    }
}

impl<E: SeqBound> ListMaterializer<E> for ReverseList<E> {
    fn known_size(&self) -> Option<usize> {
        self.upstream.known_size().or_else(|| self.size.material())
    }

    fn can_materialize_element(&self, index: usize) -> Result<bool> {
        Ok(index < self.size()?)
    }

    fn materialize_element(&self, index: usize) -> Result<E> {
        let size = self.size()?;
        if index >= size {
            return Err(SequenceError::IndexOutOfBounds { index });
        }
        self.upstream.materialize_element(size - 1 - index)
    }

    fn materialize_size(&self) -> Result<usize> {
        self.size()
    }

    fn materialize_iterator(self: Arc<Self>) -> BoxIter<E> {
        indexed_iterator(self)
    }
}

impl<E: SeqBound> ListSequence<E> {
    /// Exactly `len` elements: truncated, or padded with `filler`.
    ///
    /// # Example
    /// ```
    /// use ironseq::ListSequence;
    ///
    /// let short = ListSequence::from_vec(vec![1, 2]);
    /// assert_eq!(short.resize(4, 0).to_vec()?, vec![1, 2, 0, 0]);
    /// assert_eq!(short.resize(1, 0).to_vec()?, vec![1]);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn resize(&self, len: usize, filler: E) -> Self {
        ListSequence::from_materializer(ResizeList {
            upstream: Arc::clone(&self.list),
            len,
            filler,
        })
    }

    /// The elements in reverse order.
    #[must_use]
    pub fn reverse(&self) -> Self {
        ListSequence::from_materializer(ReverseList::new(Arc::clone(&self.list)))
    }
}

impl<E: SeqBound> IteratorSequence<E> {
    /// Exactly `len` elements: truncated, or padded with `filler`.
    #[must_use]
    pub fn resize(self, len: usize, filler: E) -> Self {
        IteratorSequence::from_materializer(ResizeIter {
            upstream: self.iter,
            remaining: len,
            filler,
        })
    }

    /// The elements in reverse order. Buffers the whole upstream on first pull.
    #[must_use]
    pub fn reverse(self) -> Self {
        let size_hint = self.iter.known_size();
        let reversed = BufferedIter::new(self.iter, size_hint, |list: ArcList<E>| {
            Arc::new(ReverseList::new(list)).materialize_iterator()
        });
        IteratorSequence::from_materializer(reversed)
    }
}
