//! Predicate-driven selection: filtering and the `*_while` family.
//!
//! # Overview
//! - [`ListSequence::filter`] / [`ListSequence::try_filter`] - Keep matching elements
//! - [`ListSequence::remove_where`] / [`ListSequence::remove_all`] - Drop matching elements
//! - [`ListSequence::take_while`] / [`ListSequence::drop_while`] - Leading run of matches /
//!   everything after it
//! - [`ListSequence::take_right_while`] / [`ListSequence::drop_right_while`] - Trailing run /
//!   everything before it
//!
//! Output positions of `filter` and `take_while` depend on how many upstream
//! elements matched, so their list forms are iterator pipelines memoized by a
//! [`CachedIteratorList`]. `drop_while` locates its offset once. The right-hand
//! variants evaluate the predicate from the tail backward, so they materialize
//! the upstream size (lists) or buffer the whole upstream (iterators).

use crate::cached::CachedIteratorList;
use crate::error::{Result, SequenceError};
use crate::node::{
    equal_to, indexed_iterator, negate, predicate, try_predicate, ArcList, BoxIter,
    IteratorMaterializer, ListMaterializer, Predicate,
};
use crate::scratch::BufferedIter;
use crate::sequence::{IteratorSequence, ListSequence, SeqBound};
use crate::state::StateCell;
use std::sync::Arc;

/// Sequential filter, holding the next matching element once found.
pub(crate) struct FilterIter<E> {
    upstream: BoxIter<E>,
    predicate: Predicate<E>,
    peeked: Option<E>,
}

impl<E> FilterIter<E> {
    pub(crate) fn new(upstream: BoxIter<E>, predicate: Predicate<E>) -> Self {
        Self {
            upstream,
            predicate,
            peeked: None,
        }
    }
}

impl<E: Send> IteratorMaterializer<E> for FilterIter<E> {
    fn materialize_has_next(&mut self) -> Result<bool> {
        while self.peeked.is_none() && self.upstream.materialize_has_next()? {
            let element = self.upstream.materialize_next()?;
            if (self.predicate)(&element)? {
                self.peeked = Some(element);
            }
        }
        Ok(self.peeked.is_some())
    }

    fn materialize_next(&mut self) -> Result<E> {
        self.materialize_has_next()?;
        self.peeked.take().ok_or(SequenceError::NoSuchElement)
    }
}

/// Yields elements until the first one failing the predicate.
struct TakeWhileIter<E> {
    upstream: BoxIter<E>,
    predicate: Predicate<E>,
    peeked: Option<E>,
    done: bool,
}

impl<E: Send> IteratorMaterializer<E> for TakeWhileIter<E> {
    fn known_size(&self) -> Option<usize> {
        self.done.then_some(usize::from(self.peeked.is_some()))
    }

    fn materialize_has_next(&mut self) -> Result<bool> {
        if self.peeked.is_some() {
            return Ok(true);
        }
        if self.done || !self.upstream.materialize_has_next()? {
            self.done = true;
            return Ok(false);
        }
        let element = self.upstream.materialize_next()?;
        if (self.predicate)(&element)? {
            self.peeked = Some(element);
            Ok(true)
        } else {
            self.done = true;
            Ok(false)
        }
    }

    fn materialize_next(&mut self) -> Result<E> {
        self.materialize_has_next()?;
        self.peeked.take().ok_or(SequenceError::NoSuchElement)
    }
}

/// Skips the leading run of matching elements on first pull.
struct DropWhileIter<E> {
    upstream: BoxIter<E>,
    predicate: Option<Predicate<E>>,
    peeked: Option<E>,
}

impl<E: Send> IteratorMaterializer<E> for DropWhileIter<E> {
    fn known_size(&self) -> Option<usize> {
        if self.predicate.is_some() {
            return None;
        }
        let size = self.upstream.known_size()?;
        Some(size.saturating_add(usize::from(self.peeked.is_some())))
    }

    fn materialize_has_next(&mut self) -> Result<bool> {
        if let Some(predicate) = &self.predicate {
            while self.upstream.materialize_has_next()? {
                let element = self.upstream.materialize_next()?;
                if !predicate(&element)? {
                    self.peeked = Some(element);
                    break;
                }
            }
            self.predicate = None;
        }
        Ok(self.peeked.is_some() || self.upstream.materialize_has_next()?)
    }

    fn materialize_next(&mut self) -> Result<E> {
        if !self.materialize_has_next()? {
            return Err(SequenceError::NoSuchElement);
        }
        match self.peeked.take() {
            Some(element) => Ok(element),
            None => self.upstream.materialize_next(),
        }
    }
}

/// List view starting at the first element failing the predicate.
struct DropWhileList<E> {
    upstream: ArcList<E>,
    offset: StateCell<Predicate<E>, usize>,
}

impl<E: SeqBound> DropWhileList<E> {
    fn offset(&self) -> Result<usize> {
        self.offset.resolve(|predicate| {
            let mut index = 0;
            while self.upstream.can_materialize_element(index)?
                && predicate(&self.upstream.materialize_element(index)?)?
            {
                index += 1;
            }
            Ok(index)
        })
    }
}

impl<E: SeqBound> ListMaterializer<E> for DropWhileList<E> {
    fn known_size(&self) -> Option<usize> {
        let offset = self.offset.material()?;
        Some(self.upstream.known_size()?.saturating_sub(offset))
    }

    fn can_materialize_element(&self, index: usize) -> Result<bool> {
        match self.offset()?.checked_add(index) {
            Some(shifted) => self.upstream.can_materialize_element(shifted),
            None => Ok(false),
        }
    }

    fn materialize_element(&self, index: usize) -> Result<E> {
        match self.offset()?.checked_add(index) {
            Some(shifted) if self.upstream.can_materialize_element(shifted)? => {
                self.upstream.materialize_element(shifted)
            }
            _ => Err(SequenceError::IndexOutOfBounds { index }),
        }
    }

    fn materialize_size(&self) -> Result<usize> {
        let offset = self.offset()?;
        Ok(self.upstream.materialize_size()?.saturating_sub(offset))
    }

    fn materialize_iterator(self: Arc<Self>) -> BoxIter<E> {
        indexed_iterator(self)
    }
}

/// Keeps (`keep_tail`) or drops the trailing run of matching elements.
///
/// Resolves `(start, len)` of the kept range with one backward scan.
struct TailRunList<E> {
    upstream: ArcList<E>,
    keep_tail: bool,
    range: StateCell<Predicate<E>, (usize, usize)>,
}

impl<E: SeqBound> TailRunList<E> {
    fn new(upstream: ArcList<E>, predicate: Predicate<E>, keep_tail: bool) -> Self {
        Self {
            upstream,
            keep_tail,
            range: StateCell::new("right_while", predicate),
        }
    }

    fn range(&self) -> Result<(usize, usize)> {
        self.range.resolve(|predicate| {
            let size = self.upstream.materialize_size()?;
            let mut cut = size;
            while cut > 0 && predicate(&self.upstream.materialize_element(cut - 1)?)? {
                cut -= 1;
            }
            Ok(if self.keep_tail {
                (cut, size - cut)
            } else {
                (0, cut)
            })
        })
    }
}

impl<E: SeqBound> ListMaterializer<E> for TailRunList<E> {
    fn known_size(&self) -> Option<usize> {
        self.range.material().map(|(_, len)| len)
    }

    fn can_materialize_element(&self, index: usize) -> Result<bool> {
        Ok(index < self.range()?.1)
    }

    fn materialize_element(&self, index: usize) -> Result<E> {
        let (start, len) = self.range()?;
        if index >= len {
            return Err(SequenceError::IndexOutOfBounds { index });
        }
        self.upstream.materialize_element(start + index)
    }

    fn materialize_size(&self) -> Result<usize> {
        Ok(self.range()?.1)
    }

    fn materialize_iterator(self: Arc<Self>) -> BoxIter<E> {
        indexed_iterator(self)
    }
}

fn filter_list<E: SeqBound>(
    upstream: &ArcList<E>,
    node: &'static str,
    predicate: Predicate<E>,
) -> ArcList<E> {
    let upstream = Arc::clone(upstream);
    Arc::new(CachedIteratorList::new(node, None, move || {
        Box::new(FilterIter::new(upstream.materialize_iterator(), predicate)) as BoxIter<E>
    }))
}

fn tail_run_iter<E: SeqBound>(
    upstream: BoxIter<E>,
    predicate: Predicate<E>,
    keep_tail: bool,
) -> BoxIter<E> {
    Box::new(BufferedIter::new(upstream, None, move |list: ArcList<E>| {
        Arc::new(TailRunList::new(list, predicate, keep_tail)).materialize_iterator()
    }))
}

impl<E: SeqBound> ListSequence<E> {
    /// Keep only the elements matching `predicate`.
    ///
    /// The predicate runs at most once per upstream element; matches are
    /// memoized as they are found, so indexing a filtered list never
    /// re-evaluates earlier positions.
    ///
    /// # Example
    /// ```
    /// use ironseq::ListSequence;
    ///
    /// let odd = ListSequence::from_vec(vec![1, 2, 3, 4, 5]).filter(|n: &i32| n % 2 == 1);
    /// assert_eq!(odd.to_vec()?, vec![1, 3, 5]);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn filter<P>(&self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        ListSequence::from_shared(filter_list(&self.list, "filter", predicate(p)))
    }

    /// Fallible [`filter`](Self::filter); a predicate error surfaces as
    /// [`SequenceError::Callback`] from the pulling call.
    #[must_use]
    pub fn try_filter<P>(&self, p: P) -> Self
    where
        P: Fn(&E) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        ListSequence::from_shared(filter_list(&self.list, "filter", try_predicate(p)))
    }

    /// Drop every element matching `predicate`.
    #[must_use]
    pub fn remove_where<P>(&self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        ListSequence::from_shared(filter_list(&self.list, "remove_where", negate(predicate(p))))
    }

    /// The leading run of elements matching `predicate`.
    #[must_use]
    pub fn take_while<P>(&self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        let upstream = Arc::clone(&self.list);
        let predicate = predicate(p);
        ListSequence::from_materializer(CachedIteratorList::new("take_while", None, move || {
            Box::new(TakeWhileIter {
                upstream: upstream.materialize_iterator(),
                predicate,
                peeked: None,
                done: false,
            }) as BoxIter<E>
        }))
    }

    /// Everything from the first element failing `predicate` on.
    #[must_use]
    pub fn drop_while<P>(&self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        ListSequence::from_materializer(DropWhileList {
            upstream: Arc::clone(&self.list),
            offset: StateCell::new("drop_while", predicate(p)),
        })
    }

    /// The trailing run of elements matching `predicate`.
    ///
    /// Materializes the upstream size before evaluating the predicate from
    /// the last element backward.
    #[must_use]
    pub fn take_right_while<P>(&self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        let upstream = Arc::clone(&self.list);
        ListSequence::from_materializer(TailRunList::new(upstream, predicate(p), true))
    }

    /// Everything before the trailing run of elements matching `predicate`.
    #[must_use]
    pub fn drop_right_while<P>(&self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        let upstream = Arc::clone(&self.list);
        ListSequence::from_materializer(TailRunList::new(upstream, predicate(p), false))
    }
}

impl<E: SeqBound + PartialEq> ListSequence<E> {
    /// Drop every element equal to `value`.
    #[must_use]
    pub fn remove_all(&self, value: E) -> Self {
        ListSequence::from_shared(filter_list(&self.list, "remove_all", negate(equal_to(value))))
    }
}

impl<E: SeqBound> IteratorSequence<E> {
    /// Keep only the elements matching `p`.
    ///
    /// # Arguments
    /// - `p`: evaluated once per pulled element.
    ///
    /// # Returns
    /// A sequence of unknown size; `has_next` pulls upstream until a match or the
    /// end.
    ///
    /// # Example
    /// ```
    /// use ironseq::IteratorSequence;
    ///
    /// let odd = IteratorSequence::from_iterator(1..=6).filter(|n: &i32| n % 2 == 1);
    /// assert_eq!(odd.to_vec()?, vec![1, 3, 5]);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn filter<P>(self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        IteratorSequence::from_materializer(FilterIter::new(self.iter, predicate(p)))
    }

    /// Fallible [`filter`](Self::filter).
    #[must_use]
    pub fn try_filter<P>(self, p: P) -> Self
    where
        P: Fn(&E) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        IteratorSequence::from_materializer(FilterIter::new(self.iter, try_predicate(p)))
    }

    /// Drop the elements matching `p`.
    #[must_use]
    pub fn remove_where<P>(self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        IteratorSequence::from_materializer(FilterIter::new(self.iter, negate(predicate(p))))
    }

    /// The leading run of elements matching `p`.
    ///
    /// Works over unbounded upstreams.
    ///
    /// # Example
    /// ```
    /// use ironseq::IteratorSequence;
    ///
    /// let head = IteratorSequence::from_iterator(1..).take_while(|n: &i32| *n < 4);
    /// assert_eq!(head.to_vec()?, vec![1, 2, 3]);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn take_while<P>(self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        IteratorSequence::from_materializer(TakeWhileIter {
            upstream: self.iter,
            predicate: predicate(p),
            peeked: None,
            done: false,
        })
    }

    /// Everything from the first element failing `p` on.
    #[must_use]
    pub fn drop_while<P>(self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        IteratorSequence::from_materializer(DropWhileIter {
            upstream: self.iter,
            predicate: Some(predicate(p)),
            peeked: None,
        })
    }

    /// The trailing run of matching elements. Buffers the whole upstream.
    #[must_use]
    pub fn take_right_while<P>(self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        IteratorSequence::from_boxed(tail_run_iter(self.iter, predicate(p), true))
    }

    /// Everything before the trailing run of matching elements. Buffers the whole upstream.
    #[must_use]
    pub fn drop_right_while<P>(self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        IteratorSequence::from_boxed(tail_run_iter(self.iter, predicate(p), false))
    }
}

impl<E: SeqBound + PartialEq> IteratorSequence<E> {
    /// Drop every element equal to `value`.
    #[must_use]
    pub fn remove_all(self, value: E) -> Self {
        IteratorSequence::from_materializer(FilterIter::new(self.iter, negate(equal_to(value))))
    }
}
