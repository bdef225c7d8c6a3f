//! Element-wise transforms: `map`, `try_map`, `map_where`, `peek`, `try_peek`.
//!
//! The list form keeps a per-index slot cache so the mapper runs at most once
//! per position, however often or in whatever order the position is read.
//! The cache is array-backed when the upstream size is known and no larger
//! than [`Config::map_array_threshold`](crate::config::Config::map_array_threshold),
//! hash-backed otherwise, and is promoted to an array once every slot of a
//! known size has been resolved.
//!
//! `peek` is a map that hands each element to a consumer and returns it
//! unchanged, so the consumer observes each position once per node.

use crate::error::{from_callback, Result, SequenceError};
use crate::node::{
    indexed_iterator, mapper, predicate, try_mapper, ArcList, BoxIter, Consumer,
    IteratorMaterializer, ListMaterializer, Mapper,
};
use crate::sequence::{IteratorSequence, ListSequence, SeqBound};
use crate::state::SlotCache;
use std::sync::Arc;

pub(crate) struct MapList<E, O> {
    upstream: ArcList<E>,
    mapper: Mapper<E, O>,
    slots: SlotCache<O>,
}

impl<E: SeqBound, O: SeqBound> MapList<E, O> {
    pub(crate) fn new(upstream: ArcList<E>, mapper: Mapper<E, O>) -> Self {
        let slots = SlotCache::new("map", upstream.known_size());
        Self {
            upstream,
            mapper,
            slots,
        }
    }
}

impl<E: SeqBound, O: SeqBound> ListMaterializer<O> for MapList<E, O> {
    fn known_size(&self) -> Option<usize> {
        self.upstream.known_size()
    }

    fn can_materialize_element(&self, index: usize) -> Result<bool> {
        self.upstream.can_materialize_element(index)
    }

    fn materialize_element(&self, index: usize) -> Result<O> {
        if !self.upstream.can_materialize_element(index)? {
            return Err(SequenceError::IndexOutOfBounds { index });
        }
        self.slots.get_or_compute(index, self.upstream.known_size(), || {
            (self.mapper)(&self.upstream.materialize_element(index)?)
        })
    }

    fn materialize_size(&self) -> Result<usize> {
        self.upstream.materialize_size()
    }

    fn materialize_empty(&self) -> Result<bool> {
        self.upstream.materialize_empty()
    }

    fn materialize_iterator(self: Arc<Self>) -> BoxIter<O> {
        indexed_iterator(self)
    }
}

pub(crate) struct MapIter<E, O> {
    upstream: BoxIter<E>,
    mapper: Mapper<E, O>,
}

impl<E, O> MapIter<E, O> {
    pub(crate) fn new(upstream: BoxIter<E>, mapper: Mapper<E, O>) -> Self {
        Self { upstream, mapper }
    }
}

impl<E, O> IteratorMaterializer<O> for MapIter<E, O> {
    fn known_size(&self) -> Option<usize> {
        self.upstream.known_size()
    }

    fn materialize_has_next(&mut self) -> Result<bool> {
        self.upstream.materialize_has_next()
    }

    fn materialize_next(&mut self) -> Result<O> {
        (self.mapper)(&self.upstream.materialize_next()?)
    }

    fn materialize_skip(&mut self, count: usize) -> Result<usize> {
        self.upstream.materialize_skip(count)
    }
}

fn peeking<E: SeqBound>(consumer: Consumer<E>) -> Mapper<E, E> {
    Arc::new(move |e: &E| {
        consumer(e)?;
        Ok(e.clone())
    })
}

fn mapping_where<E, P, F>(p: P, f: F) -> Mapper<E, E>
where
    E: SeqBound,
    P: Fn(&E) -> bool + Send + Sync + 'static,
    F: Fn(&E) -> E + Send + Sync + 'static,
{
    let p = predicate(p);
    Arc::new(move |e: &E| if p(e)? { Ok(f(e)) } else { Ok(e.clone()) })
}

impl<E: SeqBound> ListSequence<E> {
    fn mapped<O: SeqBound>(&self, mapper: Mapper<E, O>) -> ListSequence<O> {
        ListSequence::from_materializer(MapList::new(Arc::clone(&self.list), mapper))
    }

    /// Transform every element with `f`.
    ///
    /// # Example
    /// ```
    /// use ironseq::ListSequence;
    ///
    /// let lengths = ListSequence::from_vec(vec!["a".to_string(), "bcd".to_string()])
    ///     .map(|s: &String| s.len());
    /// assert_eq!(lengths.to_vec()?, vec![1, 3]);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn map<O, F>(&self, f: F) -> ListSequence<O>
    where
        O: SeqBound,
        F: Fn(&E) -> O + Send + Sync + 'static,
    {
        self.mapped(mapper(f))
    }

    /// Fallible [`map`](Self::map); errors surface from the pulling call as
    /// [`SequenceError::Callback`].
    #[must_use]
    pub fn try_map<O, F>(&self, f: F) -> ListSequence<O>
    where
        O: SeqBound,
        F: Fn(&E) -> anyhow::Result<O> + Send + Sync + 'static,
    {
        self.mapped(try_mapper(f))
    }

    /// Transform the elements matching `p`, keeping the others as they are.
    #[must_use]
    pub fn map_where<P, F>(&self, p: P, f: F) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
        F: Fn(&E) -> E + Send + Sync + 'static,
    {
        self.mapped(mapping_where(p, f))
    }

    /// Hand every element to `consumer` as it is materialized.
    #[must_use]
    pub fn peek<C>(&self, consumer: C) -> Self
    where
        C: Fn(&E) + Send + Sync + 'static,
    {
        self.mapped(peeking(Arc::new(move |e: &E| {
            consumer(e);
            Ok(())
        })))
    }

    /// Fallible [`peek`](Self::peek); a consumer error fails the pulling call.
    #[must_use]
    pub fn try_peek<C>(&self, consumer: C) -> Self
    where
        C: Fn(&E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.mapped(peeking(Arc::new(move |e: &E| consumer(e).map_err(from_callback))))
    }
}

impl<E: SeqBound> IteratorSequence<E> {
    fn mapped<O: SeqBound>(self, mapper: Mapper<E, O>) -> IteratorSequence<O> {
        IteratorSequence::from_materializer(MapIter::new(self.iter, mapper))
    }

    /// Transform every pulled element with `f`.
    ///
    /// Skipping passes straight through to the upstream without calling `f`.
    ///
    /// # Example
    /// ```
    /// use ironseq::IteratorSequence;
    ///
    /// let mut squares = IteratorSequence::from_iterator(1..).map(|n: &i32| n * n);
    /// assert_eq!(squares.skip_elements(2)?, 2);
    /// assert_eq!(squares.next_element()?, 9);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn map<O, F>(self, f: F) -> IteratorSequence<O>
    where
        O: SeqBound,
        F: Fn(&E) -> O + Send + Sync + 'static,
    {
        self.mapped(mapper(f))
    }

    /// Fallible [`map`](Self::map); errors surface from the pulling call as
    /// [`SequenceError::Callback`](crate::SequenceError::Callback).
    #[must_use]
    pub fn try_map<O, F>(self, f: F) -> IteratorSequence<O>
    where
        O: SeqBound,
        F: Fn(&E) -> anyhow::Result<O> + Send + Sync + 'static,
    {
        self.mapped(try_mapper(f))
    }

    #[must_use]
    pub fn map_where<P, F>(self, p: P, f: F) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
        F: Fn(&E) -> E + Send + Sync + 'static,
    {
        self.mapped(mapping_where(p, f))
    }

    /// Hand every pulled element to `consumer`. Skipped elements are not observed.
    #[must_use]
    pub fn peek<C>(self, consumer: C) -> Self
    where
        C: Fn(&E) + Send + Sync + 'static,
    {
        self.mapped(peeking(Arc::new(move |e: &E| {
            consumer(e);
            Ok(())
        })))
    }

    #[must_use]
    pub fn try_peek<C>(self, consumer: C) -> Self
    where
        C: Fn(&E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.mapped(peeking(Arc::new(move |e: &E| consumer(e).map_err(from_callback))))
    }
}
