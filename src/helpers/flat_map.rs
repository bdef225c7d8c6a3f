//! Full flat-maps: `flat_map`, `try_flat_map`, `flat_map_where`.
//!
//! Every upstream element is expanded into a sub-sequence and the
//! sub-sequences are concatenated. Output index `i` depends on the lengths of
//! all earlier expansions, so the list form pulls a [`FlatMapIter`] through a
//! [`CachedIteratorList`]: each expansion is computed once, in order, and only
//! as far as the highest index asked for so far.
//!
//! Position-scoped variants (after `n`, first/last matching) live with the
//! splice operators, since they expand a single element.

use crate::cached::CachedIteratorList;
use crate::error::{Result, SequenceError};
use crate::node::{mapper, predicate, try_mapper, ArcList, BoxIter, IteratorMaterializer, Mapper};
use crate::sequence::{list_of, singleton, IteratorSequence, ListSequence, SeqBound};
use std::sync::Arc;

pub(crate) struct FlatMapIter<E, O> {
    upstream: BoxIter<E>,
    expand: Mapper<E, ArcList<O>>,
    current: Option<BoxIter<O>>,
}

impl<E, O> FlatMapIter<E, O> {
    pub(crate) fn new(upstream: BoxIter<E>, expand: Mapper<E, ArcList<O>>) -> Self {
        Self {
            upstream,
            expand,
            current: None,
        }
    }
}

impl<E, O: 'static> IteratorMaterializer<O> for FlatMapIter<E, O> {
    fn materialize_has_next(&mut self) -> Result<bool> {
        loop {
            if let Some(current) = self.current.as_mut() {
                if current.materialize_has_next()? {
                    return Ok(true);
                }
                self.current = None;
            }
            if !self.upstream.materialize_has_next()? {
                return Ok(false);
            }
            let element = self.upstream.materialize_next()?;
            self.current = Some((self.expand)(&element)?.materialize_iterator());
        }
    }

    fn materialize_next(&mut self) -> Result<O> {
        self.materialize_has_next()?;
        match self.current.as_mut() {
            Some(current) => current.materialize_next(),
            None => Err(SequenceError::NoSuchElement),
        }
    }
}

fn flat_map_list<E: SeqBound, O: SeqBound>(
    upstream: &ArcList<E>,
    expand: Mapper<E, ArcList<O>>,
) -> ListSequence<O> {
    let upstream = Arc::clone(upstream);
    ListSequence::from_materializer(CachedIteratorList::new("flat_map", None, move || {
        Box::new(FlatMapIter::new(upstream.materialize_iterator(), expand)) as BoxIter<O>
    }))
}

fn expanding<E, O, I, F>(f: F) -> Mapper<E, ArcList<O>>
where
    E: SeqBound,
    O: SeqBound,
    I: Into<ListSequence<O>>,
    F: Fn(&E) -> I + Send + Sync + 'static,
{
    mapper(move |e: &E| list_of(f(e)))
}

fn try_expanding<E, O, I, F>(f: F) -> Mapper<E, ArcList<O>>
where
    E: SeqBound,
    O: SeqBound,
    I: Into<ListSequence<O>>,
    F: Fn(&E) -> anyhow::Result<I> + Send + Sync + 'static,
{
    try_mapper(move |e: &E| f(e).map(list_of))
}

fn expanding_where<E, P, I, F>(p: P, f: F) -> Mapper<E, ArcList<E>>
where
    E: SeqBound,
    P: Fn(&E) -> bool + Send + Sync + 'static,
    I: Into<ListSequence<E>>,
    F: Fn(&E) -> I + Send + Sync + 'static,
{
    let p = predicate(p);
    Arc::new(move |e: &E| {
        if p(e)? {
            Ok(list_of(f(e)))
        } else {
            Ok(singleton(e.clone()))
        }
    })
}

impl<E: SeqBound> ListSequence<E> {
    /// Expand every element into a sub-sequence and concatenate the results.
    ///
    /// # Example
    /// ```
    /// use ironseq::ListSequence;
    ///
    /// let words = ListSequence::from_vec(vec!["ab", "", "c"])
    ///     .flat_map(|w: &&str| w.chars().collect::<Vec<_>>());
    /// assert_eq!(words.to_vec()?, vec!['a', 'b', 'c']);
    /// assert_eq!(words.get(2)?, 'c');
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn flat_map<O, I, F>(&self, f: F) -> ListSequence<O>
    where
        O: SeqBound,
        I: Into<ListSequence<O>>,
        F: Fn(&E) -> I + Send + Sync + 'static,
    {
        flat_map_list(&self.list, expanding(f))
    }

    /// Fallible [`flat_map`](Self::flat_map); an error from `f` surfaces as
    /// [`SequenceError::Callback`](crate::SequenceError::Callback).
    #[must_use]
    pub fn try_flat_map<O, I, F>(&self, f: F) -> ListSequence<O>
    where
        O: SeqBound,
        I: Into<ListSequence<O>>,
        F: Fn(&E) -> anyhow::Result<I> + Send + Sync + 'static,
    {
        flat_map_list(&self.list, try_expanding(f))
    }

    /// Expand the elements matching `p`, keeping the others as they are.
    #[must_use]
    pub fn flat_map_where<P, I, F>(&self, p: P, f: F) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
        I: Into<ListSequence<E>>,
        F: Fn(&E) -> I + Send + Sync + 'static,
    {
        flat_map_list(&self.list, expanding_where(p, f))
    }
}

impl<E: SeqBound> IteratorSequence<E> {
    /// Expand every pulled element into a sub-sequence and yield its elements in turn.
    ///
    /// # Arguments
    /// - `f`: maps one element to anything convertible into a [`ListSequence`].
    ///
    /// # Returns
    /// An `IteratorSequence<O>` that calls `f` once per upstream element, only
    /// when the previous expansion has been drained.
    ///
    /// # Example
    /// ```
    /// use ironseq::IteratorSequence;
    ///
    /// let spread = IteratorSequence::from_vec(vec![1, 2, 3])
    ///     .flat_map(|n: &i32| vec![*n; *n as usize]);
    /// assert_eq!(spread.to_vec()?, vec![1, 2, 2, 3, 3, 3]);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn flat_map<O, I, F>(self, f: F) -> IteratorSequence<O>
    where
        O: SeqBound,
        I: Into<ListSequence<O>>,
        F: Fn(&E) -> I + Send + Sync + 'static,
    {
        IteratorSequence::from_materializer(FlatMapIter::new(self.iter, expanding(f)))
    }

    /// Fallible [`flat_map`](Self::flat_map).
    #[must_use]
    pub fn try_flat_map<O, I, F>(self, f: F) -> IteratorSequence<O>
    where
        O: SeqBound,
        I: Into<ListSequence<O>>,
        F: Fn(&E) -> anyhow::Result<I> + Send + Sync + 'static,
    {
        IteratorSequence::from_materializer(FlatMapIter::new(self.iter, try_expanding(f)))
    }

    /// Expand the elements matching `p`, passing the others through.
    #[must_use]
    pub fn flat_map_where<P, I, F>(self, p: P, f: F) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
        I: Into<ListSequence<E>>,
        F: Fn(&E) -> I + Send + Sync + 'static,
    {
        IteratorSequence::from_materializer(FlatMapIter::new(self.iter, expanding_where(p, f)))
    }
}
