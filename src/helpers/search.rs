//! Sub-sequence searches.
//!
//! # Overview
//! - [`ListSequence::index_of_slice`] / [`ListSequence::last_index_of_slice`] - Position of a
//!   contiguous match
//! - [`ListSequence::includes_slice`] - Whether a contiguous match exists
//! - [`ListSequence::starts_with`] / [`ListSequence::ends_with`] - Prefix and suffix tests
//!
//! The needle is materialized when the search first runs, not when the
//! operator is built. Matching keeps a queue of upstream elements that agree
//! with a prefix of the needle; on a mismatch the front of the queue is
//! dropped and the rest is re-checked from the start of the needle. Worst case
//! is `O(n * m)`, with no requirement on the element type beyond equality.

use crate::helpers::once::Scan;
use crate::node::IteratorMaterializer;
use crate::scratch::Ring;
use crate::sequence::{IteratorSequence, ListSequence, SeqBound};
use std::collections::VecDeque;
use std::sync::Arc;

fn matches_prefix<E: PartialEq>(queue: &VecDeque<E>, needle: &[E]) -> bool {
    queue.iter().zip(needle).all(|(a, b)| a == b)
}

fn slice_matching<E: SeqBound + PartialEq>(needle: ListSequence<E>, last: bool) -> Scan<E, usize> {
    Arc::new(move |iter: &mut dyn IteratorMaterializer<E>| {
        let needle = needle.to_vec()?;
        if needle.is_empty() {
            // The empty needle matches at the start, and last at the end.
            return if last {
                Ok(Some(iter.materialize_skip(usize::MAX)?))
            } else {
                Ok(Some(0))
            };
        }
        let mut queue = VecDeque::with_capacity(needle.len());
        let mut start = 0;
        let mut found = None;
        while iter.materialize_has_next()? {
            queue.push_back(iter.materialize_next()?);
            while !matches_prefix(&queue, &needle) {
                queue.pop_front();
                start += 1;
            }
            if queue.len() == needle.len() {
                found = Some(start);
                if !last {
                    break;
                }
                queue.pop_front();
                start += 1;
                while !matches_prefix(&queue, &needle) {
                    queue.pop_front();
                    start += 1;
                }
            }
        }
        Ok(found)
    })
}

fn starting_with<E: SeqBound + PartialEq>(needle: ListSequence<E>) -> Scan<E, bool> {
    Arc::new(move |iter: &mut dyn IteratorMaterializer<E>| {
        let mut expected = needle.iter();
        while expected.has_next()? {
            if !iter.materialize_has_next()?
                || iter.materialize_next()? != expected.next_element()?
            {
                return Ok(Some(false));
            }
        }
        Ok(Some(true))
    })
}

fn ending_with<E: SeqBound + PartialEq>(needle: ListSequence<E>) -> Scan<E, bool> {
    Arc::new(move |iter: &mut dyn IteratorMaterializer<E>| {
        let needle = needle.to_vec()?;
        if needle.is_empty() {
            return Ok(Some(true));
        }
        let mut tail = Ring::new(needle.len());
        while iter.materialize_has_next()? {
            tail.push(iter.materialize_next()?);
        }
        Ok(Some(tail.is_full() && tail.iter().eq(needle.iter())))
    })
}

impl<E: SeqBound + PartialEq> ListSequence<E> {
    /// Position of the first contiguous occurrence of `needle`, or an empty
    /// sequence. An empty needle is found at 0.
    ///
    /// # Example
    /// ```
    /// use ironseq::ListSequence;
    ///
    /// let numbers = ListSequence::from_vec(vec![1, 2, 3, 2, 3, 4]);
    /// assert_eq!(numbers.index_of_slice(vec![2, 3, 4]).to_vec()?, vec![3]);
    /// assert!(numbers.index_of_slice(vec![4, 1]).is_empty()?);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn index_of_slice(&self, needle: impl Into<ListSequence<E>>) -> ListSequence<usize> {
        self.aggregate(false, slice_matching(needle.into(), false))
    }

    /// Position of the last contiguous occurrence of `needle`, or an empty
    /// sequence. An empty needle is found at the element count.
    #[must_use]
    pub fn last_index_of_slice(&self, needle: impl Into<ListSequence<E>>) -> ListSequence<usize> {
        self.aggregate(false, slice_matching(needle.into(), true))
    }

    /// Whether `needle` occurs contiguously somewhere in the sequence.
    #[must_use]
    pub fn includes_slice(&self, needle: impl Into<ListSequence<E>>) -> ListSequence<bool> {
        self.index_of_slice(needle).count().map(|found: &usize| *found > 0)
    }

    /// Whether the sequence begins with the elements of `prefix`.
    #[must_use]
    pub fn starts_with(&self, prefix: impl Into<ListSequence<E>>) -> ListSequence<bool> {
        self.aggregate(true, starting_with(prefix.into()))
    }

    /// Whether the sequence ends with the elements of `suffix`.
    ///
    /// Pulls the whole upstream, holding back only the last `suffix.len()`
    /// elements.
    #[must_use]
    pub fn ends_with(&self, suffix: impl Into<ListSequence<E>>) -> ListSequence<bool> {
        self.aggregate(true, ending_with(suffix.into()))
    }
}

impl<E: SeqBound + PartialEq> IteratorSequence<E> {
    /// Position of the first contiguous occurrence of `needle`; see
    /// [`ListSequence::index_of_slice`].
    #[must_use]
    pub fn index_of_slice(self, needle: impl Into<ListSequence<E>>) -> IteratorSequence<usize> {
        self.aggregate(false, slice_matching(needle.into(), false))
    }

    /// Position of the last contiguous occurrence of `needle`. Pulls the whole upstream.
    #[must_use]
    pub fn last_index_of_slice(
        self,
        needle: impl Into<ListSequence<E>>,
    ) -> IteratorSequence<usize> {
        self.aggregate(false, slice_matching(needle.into(), true))
    }

    #[must_use]
    pub fn includes_slice(self, needle: impl Into<ListSequence<E>>) -> IteratorSequence<bool> {
        self.index_of_slice(needle).count().map(|found: &usize| *found > 0)
    }

    /// Whether the remaining elements begin with `prefix`.
    ///
    /// # Example
    /// ```
    /// use ironseq::IteratorSequence;
    ///
    /// let answer = IteratorSequence::from_iterator(1..).starts_with(vec![1, 2, 3]);
    /// assert_eq!(answer.to_vec()?, vec![true]);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn starts_with(self, prefix: impl Into<ListSequence<E>>) -> IteratorSequence<bool> {
        self.aggregate(true, starting_with(prefix.into()))
    }

    /// Whether the remaining elements end with `suffix`.
    #[must_use]
    pub fn ends_with(self, suffix: impl Into<ListSequence<E>>) -> IteratorSequence<bool> {
        self.aggregate(true, ending_with(suffix.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_matches_are_found() -> anyhow::Result<()> {
        let source = ListSequence::from_vec(vec![1, 1, 1, 2]);
        assert_eq!(source.index_of_slice(vec![1, 1, 2]).to_vec()?, vec![1]);
        assert_eq!(source.last_index_of_slice(vec![1, 1]).to_vec()?, vec![1]);
        Ok(())
    }

    #[test]
    fn empty_needles() -> anyhow::Result<()> {
        let source = ListSequence::from_vec(vec![1, 2, 3]);
        assert_eq!(source.index_of_slice(Vec::new()).to_vec()?, vec![0]);
        assert_eq!(source.last_index_of_slice(Vec::new()).to_vec()?, vec![3]);
        assert!(source.ends_with(Vec::new()).get(0)?);
        Ok(())
    }
}
