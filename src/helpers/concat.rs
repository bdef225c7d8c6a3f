//! Concatenation: `append`, `append_element`, `prepend`, `prepend_element`.
//!
//! A [`ConcatList`] answers index `i` from the first list while it has an
//! element there and from the second list shifted by the first list's size
//! otherwise. The iterator form drains the first upstream, releases it, and
//! continues with the second.

use crate::error::{Result, SequenceError};
use crate::node::{ArcList, BoxIter, IteratorMaterializer, ListMaterializer};
use crate::sequence::{iter_of, list_of, singleton, IteratorSequence, ListSequence, SeqBound};
use crate::utils::checked_add;
use std::sync::Arc;

pub(crate) struct ConcatList<E> {
    first: ArcList<E>,
    second: ArcList<E>,
}

impl<E: SeqBound> ConcatList<E> {
    fn locate(&self, index: usize) -> Result<Option<(&ArcList<E>, usize)>> {
        if self.first.can_materialize_element(index)? {
            return Ok(Some((&self.first, index)));
        }
        let shifted = index - self.first.materialize_size()?.min(index);
        Ok(self
            .second
            .can_materialize_element(shifted)?
            .then_some((&self.second, shifted)))
    }
}

impl<E: SeqBound> ListMaterializer<E> for ConcatList<E> {
    fn known_size(&self) -> Option<usize> {
        self.first.known_size()?.checked_add(self.second.known_size()?)
    }

    fn can_materialize_element(&self, index: usize) -> Result<bool> {
        Ok(self.locate(index)?.is_some())
    }

    fn materialize_element(&self, index: usize) -> Result<E> {
        match self.locate(index)? {
            Some((list, shifted)) => list.materialize_element(shifted),
            None => Err(SequenceError::IndexOutOfBounds { index }),
        }
    }

    fn materialize_size(&self) -> Result<usize> {
        checked_add(self.first.materialize_size()?, self.second.materialize_size()?)
    }

    fn materialize_empty(&self) -> Result<bool> {
        Ok(self.first.materialize_empty()? && self.second.materialize_empty()?)
    }

    fn materialize_iterator(self: Arc<Self>) -> BoxIter<E> {
        Box::new(ConcatIter {
            first: Some(Arc::clone(&self.first).materialize_iterator()),
            second: Arc::clone(&self.second).materialize_iterator(),
        })
    }
}

pub(crate) struct ConcatIter<E> {
    first: Option<BoxIter<E>>,
    second: BoxIter<E>,
}

impl<E> IteratorMaterializer<E> for ConcatIter<E> {
    fn known_size(&self) -> Option<usize> {
        let first = match &self.first {
            Some(iter) => iter.known_size()?,
            None => 0,
        };
        first.checked_add(self.second.known_size()?)
    }

    fn materialize_has_next(&mut self) -> Result<bool> {
        if let Some(first) = self.first.as_mut() {
            if first.materialize_has_next()? {
                return Ok(true);
            }
            self.first = None;
        }
        self.second.materialize_has_next()
    }

    fn materialize_next(&mut self) -> Result<E> {
        if let Some(first) = self.first.as_mut() {
            if first.materialize_has_next()? {
                return first.materialize_next();
            }
            self.first = None;
        }
        self.second.materialize_next()
    }

    fn materialize_skip(&mut self, count: usize) -> Result<usize> {
        let mut skipped = 0;
        if let Some(first) = self.first.as_mut() {
            skipped = first.materialize_skip(count)?;
            if skipped == count {
                return Ok(skipped);
            }
            self.first = None;
        }
        Ok(skipped + self.second.materialize_skip(count - skipped)?)
    }
}

fn concat_list<E: SeqBound>(first: ArcList<E>, second: ArcList<E>) -> ListSequence<E> {
    ListSequence::from_materializer(ConcatList { first, second })
}

fn concat_iter<E: SeqBound>(first: BoxIter<E>, second: BoxIter<E>) -> IteratorSequence<E> {
    IteratorSequence::from_materializer(ConcatIter {
        first: Some(first),
        second,
    })
}

impl<E: SeqBound> ListSequence<E> {
    /// This sequence followed by `elements`.
    ///
    /// # Example
    /// ```
    /// use ironseq::ListSequence;
    ///
    /// let both = ListSequence::from_vec(vec![1, 2]).append(vec![3]).prepend_element(0);
    /// assert_eq!(both.to_vec()?, vec![0, 1, 2, 3]);
    /// assert_eq!(both.known_size(), Some(4));
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn append(&self, elements: impl Into<ListSequence<E>>) -> Self {
        concat_list(Arc::clone(&self.list), list_of(elements))
    }

    /// This sequence followed by `element`.
    #[must_use]
    pub fn append_element(&self, element: E) -> Self {
        concat_list(Arc::clone(&self.list), singleton(element))
    }

    /// `elements` followed by this sequence.
    #[must_use]
    pub fn prepend(&self, elements: impl Into<ListSequence<E>>) -> Self {
        concat_list(list_of(elements), Arc::clone(&self.list))
    }

    #[must_use]
    pub fn prepend_element(&self, element: E) -> Self {
        concat_list(singleton(element), Arc::clone(&self.list))
    }
}

impl<E: SeqBound> IteratorSequence<E> {
    /// The remaining elements followed by `elements`.
    ///
    /// `elements` is not pulled until this sequence is exhausted.
    ///
    /// # Example
    /// ```
    /// use ironseq::IteratorSequence;
    ///
    /// let joined = IteratorSequence::from_iterator(1..3).append(vec![9]).prepend_element(0);
    /// assert_eq!(joined.to_vec()?, vec![0, 1, 2, 9]);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn append(self, elements: impl Into<IteratorSequence<E>>) -> Self {
        concat_iter(self.iter, iter_of(elements))
    }

    #[must_use]
    pub fn append_element(self, element: E) -> Self {
        concat_iter(self.iter, IteratorSequence::of(element).iter)
    }

    /// `elements` followed by the remaining elements.
    #[must_use]
    pub fn prepend(self, elements: impl Into<IteratorSequence<E>>) -> Self {
        concat_iter(iter_of(elements), self.iter)
    }

    #[must_use]
    pub fn prepend_element(self, element: E) -> Self {
        concat_iter(IteratorSequence::of(element).iter, self.iter)
    }
}
