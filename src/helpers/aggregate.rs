//! Predicate aggregates and element searches.
//!
//! # Overview
//! - [`ListSequence::all`] / [`ListSequence::exists`] - Quantifiers, exiting early
//! - [`ListSequence::count`], [`ListSequence::count_where`], [`ListSequence::count_not`] - Counting
//! - [`ListSequence::find_first`] / [`ListSequence::find_last`] - First / last matching element
//! - [`ListSequence::index_of`], [`ListSequence::index_where`] - Position of the first match
//! - [`ListSequence::last_index_of`], [`ListSequence::last_index_where`] - Position of the last
//!   match
//! - [`ListSequence::includes`] / [`ListSequence::includes_all`] - Containment
//!
//! Quantifiers and counts always produce exactly one element. Searches that
//! can miss produce an empty sequence when nothing matches.

use crate::error::Result;
use crate::helpers::once::Scan;
use crate::node::{equal_to, negate, predicate, IteratorMaterializer, Predicate};
use crate::sequence::{IteratorSequence, ListSequence, SeqBound};
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

fn quantifying<E: SeqBound>(p: Predicate<E>, wanted: bool) -> Scan<E, bool> {
    // `all` stops at the first mismatch, `exists` at the first match.
    Arc::new(move |iter: &mut dyn IteratorMaterializer<E>| {
        while iter.materialize_has_next()? {
            if p(&iter.materialize_next()?)? != wanted {
                return Ok(Some(!wanted));
            }
        }
        Ok(Some(wanted))
    })
}

fn counting<E: SeqBound>(p: Predicate<E>) -> Scan<E, usize> {
    Arc::new(move |iter: &mut dyn IteratorMaterializer<E>| {
        let mut count = 0;
        while iter.materialize_has_next()? {
            if p(&iter.materialize_next()?)? {
                count += 1;
            }
        }
        Ok(Some(count))
    })
}

fn finding<E: SeqBound>(p: Predicate<E>, last: bool) -> Scan<E, (usize, E)> {
    Arc::new(move |iter: &mut dyn IteratorMaterializer<E>| {
        let mut found = None;
        let mut index = 0;
        while iter.materialize_has_next()? {
            let element = iter.materialize_next()?;
            if p(&element)? {
                found = Some((index, element));
                if !last {
                    break;
                }
            }
            index += 1;
        }
        Ok(found)
    })
}

fn including_all<E: SeqBound + Eq + Hash>(needle: Vec<E>) -> Scan<E, bool> {
    Arc::new(move |iter: &mut dyn IteratorMaterializer<E>| {
        let mut missing: HashSet<E> = needle.iter().cloned().collect();
        while !missing.is_empty() && iter.materialize_has_next()? {
            missing.remove(&iter.materialize_next()?);
        }
        Ok(Some(missing.is_empty()))
    })
}

fn element_count<E>(iter: &mut dyn IteratorMaterializer<E>) -> Result<Option<usize>> {
    Ok(Some(iter.materialize_skip(usize::MAX)?))
}

impl<E: SeqBound> ListSequence<E> {
    fn find_indexed(&self, p: Predicate<E>, last: bool) -> ListSequence<(usize, E)> {
        self.aggregate(false, finding(p, last))
    }

    /// Whether every element matches `p` (true for an empty sequence).
    ///
    /// # Example
    /// ```
    /// use ironseq::ListSequence;
    ///
    /// let numbers = ListSequence::from_vec(vec![2, 4, 5]);
    /// assert!(!numbers.all(|n: &i32| n % 2 == 0).get(0)?);
    /// assert!(numbers.exists(|n: &i32| *n > 4).get(0)?);
    /// assert_eq!(numbers.count_where(|n: &i32| n % 2 == 0).get(0)?, 2);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn all<P>(&self, p: P) -> ListSequence<bool>
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.aggregate(true, quantifying(predicate(p), true))
    }

    /// Whether any element matches `p`.
    #[must_use]
    pub fn exists<P>(&self, p: P) -> ListSequence<bool>
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.aggregate(true, quantifying(predicate(p), false))
    }

    /// The number of elements. Answered from the size when the list knows it.
    #[must_use]
    pub fn count(&self) -> ListSequence<usize> {
        let list = Arc::clone(&self.list);
        self.aggregate(
            true,
            Arc::new(move |iter: &mut dyn IteratorMaterializer<E>| match list.known_size() {
                Some(size) => Ok(Some(size)),
                None => element_count(iter),
            }),
        )
    }

    /// The number of elements matching `p`.
    #[must_use]
    pub fn count_where<P>(&self, p: P) -> ListSequence<usize>
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.aggregate(true, counting(predicate(p)))
    }

    /// The number of elements not matching `p`.
    #[must_use]
    pub fn count_not<P>(&self, p: P) -> ListSequence<usize>
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.aggregate(true, counting(negate(predicate(p))))
    }

    /// The first element matching `p`, or an empty sequence.
    #[must_use]
    pub fn find_first<P>(&self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.find_indexed(predicate(p), false).map(|(_, e): &(usize, E)| e.clone())
    }

    /// The last element matching `p`, or an empty sequence.
    #[must_use]
    pub fn find_last<P>(&self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.find_indexed(predicate(p), true).map(|(_, e): &(usize, E)| e.clone())
    }

    /// Position of the first element matching `p`, or an empty sequence.
    #[must_use]
    pub fn index_where<P>(&self, p: P) -> ListSequence<usize>
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.find_indexed(predicate(p), false).map(|(i, _): &(usize, E)| *i)
    }

    /// Position of the last element matching `p`, or an empty sequence.
    #[must_use]
    pub fn last_index_where<P>(&self, p: P) -> ListSequence<usize>
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.find_indexed(predicate(p), true).map(|(i, _): &(usize, E)| *i)
    }
}

impl<E: SeqBound + PartialEq> ListSequence<E> {
    /// Position of the first element equal to `value`, or an empty sequence.
    #[must_use]
    pub fn index_of(&self, value: E) -> ListSequence<usize> {
        self.find_indexed(equal_to(value), false).map(|(i, _): &(usize, E)| *i)
    }

    /// Position of the last element equal to `value`, or an empty sequence.
    #[must_use]
    pub fn last_index_of(&self, value: E) -> ListSequence<usize> {
        self.find_indexed(equal_to(value), true).map(|(i, _): &(usize, E)| *i)
    }

    /// Whether some element equals `value`.
    #[must_use]
    pub fn includes(&self, value: E) -> ListSequence<bool> {
        self.aggregate(true, quantifying(equal_to(value), false))
    }
}

impl<E: SeqBound + Eq + Hash> ListSequence<E> {
    /// Whether every element of `values` occurs somewhere in this sequence.
    ///
    /// Stops pulling as soon as the last missing value has been seen.
    #[must_use]
    pub fn includes_all(&self, values: impl IntoIterator<Item = E>) -> ListSequence<bool> {
        self.aggregate(true, including_all(values.into_iter().collect()))
    }
}

impl<E: SeqBound> IteratorSequence<E> {
    fn find_indexed(self, p: Predicate<E>, last: bool) -> IteratorSequence<(usize, E)> {
        self.aggregate(false, finding(p, last))
    }

    /// Whether every remaining element matches `p`.
    ///
    /// Stops at the first element that does not; an empty sequence answers `true`.
    ///
    /// # Example
    /// ```
    /// use ironseq::IteratorSequence;
    ///
    /// let small = IteratorSequence::from_iterator(1..=4).all(|n: &i32| *n < 5);
    /// assert_eq!(small.to_vec()?, vec![true]);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn all<P>(self, p: P) -> IteratorSequence<bool>
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.aggregate(true, quantifying(predicate(p), true))
    }

    /// Whether any remaining element matches `p`. Stops at the first match.
    #[must_use]
    pub fn exists<P>(self, p: P) -> IteratorSequence<bool>
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.aggregate(true, quantifying(predicate(p), false))
    }

    /// The number of remaining elements. Consumes the upstream.
    #[must_use]
    pub fn count(self) -> IteratorSequence<usize> {
        self.aggregate(
            true,
            Arc::new(|iter: &mut dyn IteratorMaterializer<E>| element_count(iter)),
        )
    }

    /// The number of remaining elements matching `p`.
    #[must_use]
    pub fn count_where<P>(self, p: P) -> IteratorSequence<usize>
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.aggregate(true, counting(predicate(p)))
    }

    /// The number of remaining elements not matching `p`.
    #[must_use]
    pub fn count_not<P>(self, p: P) -> IteratorSequence<usize>
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.aggregate(true, counting(negate(predicate(p))))
    }

    /// The first element matching `p`, or an empty sequence.
    #[must_use]
    pub fn find_first<P>(self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.find_indexed(predicate(p), false).map(|(_, e): &(usize, E)| e.clone())
    }

    /// The last element matching `p`, or an empty sequence. Pulls the whole upstream.
    #[must_use]
    pub fn find_last<P>(self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.find_indexed(predicate(p), true).map(|(_, e): &(usize, E)| e.clone())
    }

    /// Position of the first element matching `p`, counted from the current
    /// position, or an empty sequence.
    #[must_use]
    pub fn index_where<P>(self, p: P) -> IteratorSequence<usize>
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.find_indexed(predicate(p), false).map(|(i, _): &(usize, E)| *i)
    }

    /// Position of the last element matching `p`, or an empty sequence.
    #[must_use]
    pub fn last_index_where<P>(self, p: P) -> IteratorSequence<usize>
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.find_indexed(predicate(p), true).map(|(i, _): &(usize, E)| *i)
    }
}

impl<E: SeqBound + PartialEq> IteratorSequence<E> {
    /// Position of the first element equal to `value`, or an empty sequence.
    #[must_use]
    pub fn index_of(self, value: E) -> IteratorSequence<usize> {
        self.find_indexed(equal_to(value), false).map(|(i, _): &(usize, E)| *i)
    }

    #[must_use]
    pub fn last_index_of(self, value: E) -> IteratorSequence<usize> {
        self.find_indexed(equal_to(value), true).map(|(i, _): &(usize, E)| *i)
    }

    /// Whether some remaining element equals `value`.
    #[must_use]
    pub fn includes(self, value: E) -> IteratorSequence<bool> {
        self.aggregate(true, quantifying(equal_to(value), false))
    }
}

impl<E: SeqBound + Eq + Hash> IteratorSequence<E> {
    /// Whether every element of `values` occurs among the remaining elements.
    ///
    /// # Arguments
    /// - `values`: the elements to look for; duplicates count once.
    ///
    /// # Returns
    /// A single-element sequence holding the answer. Pulling stops once the
    /// last missing value has been seen.
    #[must_use]
    pub fn includes_all(self, values: impl IntoIterator<Item = E>) -> IteratorSequence<bool> {
        self.aggregate(true, including_all(values.into_iter().collect()))
    }
}
