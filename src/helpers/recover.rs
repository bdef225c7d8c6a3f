//! Exceptionally-recovering transforms: `map_exceptionally` and
//! `flat_map_exceptionally`.
//!
//! When pulling from the upstream fails with a callback error
//! ([`SequenceError::Callback`]), the recovery callback receives the
//! underlying [`anyhow::Error`] and its result takes the place of the failed
//! element; pulling then resumes after it. Structural errors (out of bounds,
//! exhausted, concurrent materialization, overflow) are never intercepted, and
//! a failing recovery callback propagates as a callback error of its own.
//!
//! Callers can `downcast_ref` the error to recover only from their own failure
//! type and return the error otherwise.

use crate::cached::CachedIteratorList;
use crate::error::{from_callback, Result, SequenceError};
use crate::node::{ArcList, BoxIter, IteratorMaterializer};
use crate::sequence::{list_of, singleton, IteratorSequence, ListSequence, SeqBound};
use std::sync::Arc;

type Recovery<E> = Arc<dyn Fn(&anyhow::Error) -> Result<ArcList<E>> + Send + Sync>;

pub(crate) struct RecoverIter<E> {
    upstream: BoxIter<E>,
    recover: Recovery<E>,
    ready: Option<E>,
    current: Option<BoxIter<E>>,
}

impl<E> RecoverIter<E> {
    pub(crate) fn new(upstream: BoxIter<E>, recover: Recovery<E>) -> Self {
        Self {
            upstream,
            recover,
            ready: None,
            current: None,
        }
    }
}

impl<E: Send + 'static> IteratorMaterializer<E> for RecoverIter<E> {
    /// Pulls one upstream element ahead, so that a failure whose recovery
    /// turns out empty is skipped before anything is promised.
    fn materialize_has_next(&mut self) -> Result<bool> {
        loop {
            if self.ready.is_some() {
                return Ok(true);
            }
            if let Some(current) = self.current.as_mut() {
                if current.materialize_has_next()? {
                    return Ok(true);
                }
                self.current = None;
            }
            let failure = match self.upstream.materialize_has_next() {
                Ok(false) => return Ok(false),
                Ok(true) => match self.upstream.materialize_next() {
                    Ok(element) => {
                        self.ready = Some(element);
                        return Ok(true);
                    }
                    Err(SequenceError::Callback(err)) => err,
                    Err(other) => return Err(other),
                },
                Err(SequenceError::Callback(err)) => err,
                Err(other) => return Err(other),
            };
            self.current = Some((self.recover)(&failure)?.materialize_iterator());
        }
    }

    fn materialize_next(&mut self) -> Result<E> {
        if !self.materialize_has_next()? {
            return Err(SequenceError::NoSuchElement);
        }
        if let Some(element) = self.ready.take() {
            return Ok(element);
        }
        match self.current.as_mut() {
            Some(current) => current.materialize_next(),
            None => Err(SequenceError::NoSuchElement),
        }
    }
}

fn recovering<E, F>(f: F) -> Recovery<E>
where
    E: SeqBound,
    F: Fn(&anyhow::Error) -> anyhow::Result<E> + Send + Sync + 'static,
{
    Arc::new(move |err: &anyhow::Error| f(err).map(singleton).map_err(from_callback))
}

fn expanding<E, I, F>(f: F) -> Recovery<E>
where
    E: SeqBound,
    I: Into<ListSequence<E>>,
    F: Fn(&anyhow::Error) -> anyhow::Result<I> + Send + Sync + 'static,
{
    Arc::new(move |err: &anyhow::Error| f(err).map(list_of).map_err(from_callback))
}

fn recover_list<E: SeqBound>(upstream: &ArcList<E>, recover: Recovery<E>) -> ListSequence<E> {
    let upstream = Arc::clone(upstream);
    let size = upstream.known_size();
    ListSequence::from_materializer(CachedIteratorList::new("recover", size, move || {
        Box::new(RecoverIter::new(upstream.materialize_iterator(), recover)) as BoxIter<E>
    }))
}

impl<E: SeqBound> ListSequence<E> {
    /// Replace elements whose materialization failed in a callback with
    /// `recover(error)`.
    ///
    /// # Example
    /// ```
    /// use ironseq::ListSequence;
    ///
    /// let parsed = ListSequence::from_vec(vec!["1", "x", "3"])
    ///     .try_map(|s: &&str| Ok(s.parse::<i32>()?))
    ///     .map_exceptionally(|_err| Ok(-1));
    /// assert_eq!(parsed.to_vec()?, vec![1, -1, 3]);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn map_exceptionally<F>(&self, recover: F) -> Self
    where
        F: Fn(&anyhow::Error) -> anyhow::Result<E> + Send + Sync + 'static,
    {
        recover_list(&self.list, recovering(recover))
    }

    /// Replace elements whose materialization failed in a callback with the
    /// elements of `recover(error)`, possibly none.
    #[must_use]
    pub fn flat_map_exceptionally<I, F>(&self, recover: F) -> Self
    where
        I: Into<ListSequence<E>>,
        F: Fn(&anyhow::Error) -> anyhow::Result<I> + Send + Sync + 'static,
    {
        let upstream = Arc::clone(&self.list);
        let recover = expanding(recover);
        ListSequence::from_materializer(CachedIteratorList::new("recover", None, move || {
            Box::new(RecoverIter::new(upstream.materialize_iterator(), recover)) as BoxIter<E>
        }))
    }
}

impl<E: SeqBound> IteratorSequence<E> {
    /// Replace each element whose materialization failed in a callback with
    /// `recover(error)`.
    ///
    /// # Arguments
    /// - `recover`: turns the callback error into a substitute element; an error it
    ///   returns propagates unchanged.
    ///
    /// # Returns
    /// The same sequence with failed elements substituted. Structural errors such
    /// as [`SequenceError::ConcurrentModification`](crate::SequenceError::ConcurrentModification)
    /// are never handed to `recover`.
    ///
    /// # Example
    /// ```
    /// use ironseq::IteratorSequence;
    ///
    /// let parsed = IteratorSequence::from_vec(vec!["1", "x", "3"])
    ///     .try_map(|s: &&str| Ok(s.parse::<i32>()?))
    ///     .map_exceptionally(|_err| Ok(-1));
    /// assert_eq!(parsed.to_vec()?, vec![1, -1, 3]);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn map_exceptionally<F>(self, recover: F) -> Self
    where
        F: Fn(&anyhow::Error) -> anyhow::Result<E> + Send + Sync + 'static,
    {
        IteratorSequence::from_materializer(RecoverIter::new(self.iter, recovering(recover)))
    }

    /// Replace each failed element with the elements of `recover(error)`.
    ///
    /// An empty recovery drops the element; `has_next` only answers `true` once a
    /// real element is ready.
    #[must_use]
    pub fn flat_map_exceptionally<I, F>(self, recover: F) -> Self
    where
        I: Into<ListSequence<E>>,
        F: Fn(&anyhow::Error) -> anyhow::Result<I> + Send + Sync + 'static,
    {
        IteratorSequence::from_materializer(RecoverIter::new(self.iter, expanding(recover)))
    }
}
