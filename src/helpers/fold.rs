//! Folds and reductions, left and right.
//!
//! # Overview
//! - [`ListSequence::fold_left`] / [`ListSequence::try_fold_left`] - Accumulate front to back
//! - [`ListSequence::reduce_left`] - Fold front to back seeded with the first element
//! - [`ListSequence::fold_right`] / [`ListSequence::reduce_right`] - Accumulate back to front
//!
//! Each produces a one-element sequence computed on first demand and
//! memoized. A reduction over an empty upstream produces an empty sequence.
//! Right folds buffer the whole upstream before combining, since the last
//! element is needed first.

use crate::config;
use crate::error::{from_callback, Result};
use crate::helpers::once::Scan;
use crate::node::IteratorMaterializer;
use crate::sequence::{IteratorSequence, ListSequence, SeqBound};
use std::sync::Arc;

fn drain<E>(iter: &mut dyn IteratorMaterializer<E>) -> Result<Vec<E>> {
    let mut buffer = Vec::with_capacity(config::current().buffer_capacity);
    while iter.materialize_has_next()? {
        buffer.push(iter.materialize_next()?);
    }
    Ok(buffer)
}

fn folding_left<E, R, F>(init: R, f: F) -> Scan<E, R>
where
    E: SeqBound,
    R: SeqBound,
    F: Fn(R, &E) -> anyhow::Result<R> + Send + Sync + 'static,
{
    Arc::new(move |iter: &mut dyn IteratorMaterializer<E>| {
        let mut acc = init.clone();
        while iter.materialize_has_next()? {
            acc = f(acc, &iter.materialize_next()?).map_err(from_callback)?;
        }
        Ok(Some(acc))
    })
}

fn reducing_left<E, F>(f: F) -> Scan<E, E>
where
    E: SeqBound,
    F: Fn(E, &E) -> E + Send + Sync + 'static,
{
    Arc::new(move |iter: &mut dyn IteratorMaterializer<E>| {
        if !iter.materialize_has_next()? {
            return Ok(None);
        }
        let mut acc = iter.materialize_next()?;
        while iter.materialize_has_next()? {
            acc = f(acc, &iter.materialize_next()?);
        }
        Ok(Some(acc))
    })
}

fn folding_right<E, R, F>(init: R, f: F) -> Scan<E, R>
where
    E: SeqBound,
    R: SeqBound,
    F: Fn(&E, R) -> R + Send + Sync + 'static,
{
    Arc::new(move |iter: &mut dyn IteratorMaterializer<E>| {
        let buffer = drain(iter)?;
        Ok(Some(buffer.iter().rev().fold(init.clone(), |acc, e| f(e, acc))))
    })
}

fn reducing_right<E, F>(f: F) -> Scan<E, E>
where
    E: SeqBound,
    F: Fn(&E, E) -> E + Send + Sync + 'static,
{
    Arc::new(move |iter: &mut dyn IteratorMaterializer<E>| {
        let mut buffer = drain(iter)?;
        let Some(last) = buffer.pop() else {
            return Ok(None);
        };
        Ok(Some(buffer.iter().rev().fold(last, |acc, e| f(e, acc))))
    })
}

impl<E: SeqBound> ListSequence<E> {
    /// Combine the elements front to back, starting from `init`.
    ///
    /// # Example
    /// ```
    /// use ironseq::ListSequence;
    ///
    /// let sum = ListSequence::from_vec(vec![1, 2, 3, 4]).fold_left(0, |acc, n: &i32| acc + n);
    /// assert_eq!(sum.get(0)?, 10);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn fold_left<R, F>(&self, init: R, f: F) -> ListSequence<R>
    where
        R: SeqBound,
        F: Fn(R, &E) -> R + Send + Sync + 'static,
    {
        self.aggregate(true, folding_left(init, move |acc, e: &E| Ok(f(acc, e))))
    }

    /// Fallible [`fold_left`](Self::fold_left).
    #[must_use]
    pub fn try_fold_left<R, F>(&self, init: R, f: F) -> ListSequence<R>
    where
        R: SeqBound,
        F: Fn(R, &E) -> anyhow::Result<R> + Send + Sync + 'static,
    {
        self.aggregate(true, folding_left(init, f))
    }

    /// Fold front to back seeded with the first element; empty when the upstream is.
    #[must_use]
    pub fn reduce_left<F>(&self, f: F) -> Self
    where
        F: Fn(E, &E) -> E + Send + Sync + 'static,
    {
        self.aggregate(false, reducing_left(f))
    }

    /// Combine the elements back to front, starting from `init`.
    ///
    /// # Example
    /// ```
    /// use ironseq::ListSequence;
    ///
    /// let joined = ListSequence::from_vec(vec!['a', 'b', 'c'])
    ///     .fold_right(String::new(), |c: &char, acc| format!("{c}{acc}"));
    /// assert_eq!(joined.get(0)?, "abc");
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn fold_right<R, F>(&self, init: R, f: F) -> ListSequence<R>
    where
        R: SeqBound,
        F: Fn(&E, R) -> R + Send + Sync + 'static,
    {
        self.aggregate(true, folding_right(init, f))
    }

    /// Fold back to front seeded with the last element; empty when the upstream is.
    #[must_use]
    pub fn reduce_right<F>(&self, f: F) -> Self
    where
        F: Fn(&E, E) -> E + Send + Sync + 'static,
    {
        self.aggregate(false, reducing_right(f))
    }
}

impl<E: SeqBound> IteratorSequence<E> {
    /// Combine the remaining elements front to back, starting from `init`.
    ///
    /// The fold runs on the first pull of the result and consumes the upstream.
    ///
    /// # Example
    /// ```
    /// use ironseq::IteratorSequence;
    ///
    /// let total = IteratorSequence::from_iterator(1..=4).fold_left(0, |acc, n: &i32| acc + n);
    /// assert_eq!(total.to_vec()?, vec![10]);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn fold_left<R, F>(self, init: R, f: F) -> IteratorSequence<R>
    where
        R: SeqBound,
        F: Fn(R, &E) -> R + Send + Sync + 'static,
    {
        self.aggregate(true, folding_left(init, move |acc, e: &E| Ok(f(acc, e))))
    }

    /// Fallible [`fold_left`](Self::fold_left).
    #[must_use]
    pub fn try_fold_left<R, F>(self, init: R, f: F) -> IteratorSequence<R>
    where
        R: SeqBound,
        F: Fn(R, &E) -> anyhow::Result<R> + Send + Sync + 'static,
    {
        self.aggregate(true, folding_left(init, f))
    }

    /// Fold front to back seeded with the first element; empty when the upstream is.
    #[must_use]
    pub fn reduce_left<F>(self, f: F) -> Self
    where
        F: Fn(E, &E) -> E + Send + Sync + 'static,
    {
        self.aggregate(false, reducing_left(f))
    }

    /// Combine the elements back to front. Buffers the whole upstream.
    #[must_use]
    pub fn fold_right<R, F>(self, init: R, f: F) -> IteratorSequence<R>
    where
        R: SeqBound,
        F: Fn(&E, R) -> R + Send + Sync + 'static,
    {
        self.aggregate(true, folding_right(init, f))
    }

    #[must_use]
    pub fn reduce_right<F>(self, f: F) -> Self
    where
        F: Fn(&E, E) -> E + Send + Sync + 'static,
    {
        self.aggregate(false, reducing_right(f))
    }
}
