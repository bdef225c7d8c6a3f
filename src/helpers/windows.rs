//! Fixed-size grouping and sliding windows.
//!
//! # Overview
//! - [`ListSequence::group`] / [`ListSequence::group_padded`] - Consecutive chunks of `size`
//! - [`ListSequence::window`] / [`ListSequence::window_padded`] - Windows of `size` every `step`
//!   elements
//!
//! Window `i` covers the upstream range `[i * step, i * step + size)`. The
//! sequence ends with the first window that reaches the end of the upstream,
//! and no window starts at or past the end. Without a filler the trailing
//! window may be short; with one it is padded to `size`. A group is a window
//! whose step equals its size.
//!
//! Every window is an owned snapshot. The list form builds each window once
//! per index; the sequential form slides a bounded buffer over the upstream
//! and copies it out on every step.

use crate::error::{require_positive, Result, SequenceError};
use crate::node::{
    check_element, indexed_iterator, ArcList, BoxIter, IteratorMaterializer, ListMaterializer,
};
use crate::sequence::{IteratorSequence, ListSequence, SeqBound};
use crate::state::SlotCache;
use crate::utils::{checked_add, checked_mul, window_count};
use std::collections::VecDeque;
use std::sync::Arc;

fn pad<E: Clone>(window: &mut Vec<E>, size: usize, filler: Option<&E>) {
    if let Some(filler) = filler {
        window.resize(size, filler.clone());
    }
}

pub(crate) struct WindowList<E> {
    upstream: ArcList<E>,
    size: usize,
    step: usize,
    filler: Option<E>,
    slots: SlotCache<Vec<E>>,
}

impl<E: SeqBound> WindowList<E> {
    fn new(upstream: ArcList<E>, size: usize, step: usize, filler: Option<E>) -> Self {
        let slots = SlotCache::new(
            "window",
            upstream.known_size().map(|len| window_count(len, size, step)),
        );
        Self {
            upstream,
            size,
            step,
            filler,
            slots,
        }
    }

    fn build(&self, index: usize) -> Result<Vec<E>> {
        let start = checked_mul(index, self.step)?;
        let mut window = Vec::with_capacity(self.size);
        let mut position = start;
        while window.len() < self.size && self.upstream.can_materialize_element(position)? {
            window.push(self.upstream.materialize_element(position)?);
            position = checked_add(position, 1)?;
        }
        pad(&mut window, self.size, self.filler.as_ref());
        Ok(window)
    }
}

impl<E: SeqBound> ListMaterializer<Vec<E>> for WindowList<E> {
    fn known_size(&self) -> Option<usize> {
        self.upstream
            .known_size()
            .map(|len| window_count(len, self.size, self.step))
    }

    fn can_materialize_element(&self, index: usize) -> Result<bool> {
        let Some(start) = index.checked_mul(self.step) else {
            return Ok(false);
        };
        if !self.upstream.can_materialize_element(start)? {
            return Ok(false);
        }
        if index == 0 {
            return Ok(true);
        }
        // The previous window must stop short of the end; one ending past
        // `usize::MAX` never does.
        match (start - self.step).checked_add(self.size) {
            Some(previous_end) => self.upstream.can_materialize_element(previous_end),
            None => Ok(false),
        }
    }

    fn materialize_element(&self, index: usize) -> Result<Vec<E>> {
        check_element(self, index)?;
        self.slots
            .get_or_compute(index, self.known_size(), || self.build(index))
    }

    fn materialize_size(&self) -> Result<usize> {
        Ok(window_count(
            self.upstream.materialize_size()?,
            self.size,
            self.step,
        ))
    }

    fn materialize_empty(&self) -> Result<bool> {
        self.upstream.materialize_empty()
    }

    fn materialize_iterator(self: Arc<Self>) -> BoxIter<Vec<E>> {
        indexed_iterator(self)
    }
}

pub(crate) struct WindowIter<E> {
    upstream: BoxIter<E>,
    size: usize,
    step: usize,
    filler: Option<E>,
    window: VecDeque<E>,
    ready: Option<Vec<E>>,
    started: bool,
    done: bool,
}

impl<E: SeqBound> WindowIter<E> {
    fn new(upstream: BoxIter<E>, size: usize, step: usize, filler: Option<E>) -> Self {
        Self {
            upstream,
            size,
            step,
            filler,
            window: VecDeque::with_capacity(size.min(1024)),
            ready: None,
            started: false,
            done: false,
        }
    }

    fn advance(&mut self) -> Result<()> {
        if self.ready.is_some() || self.done {
            return Ok(());
        }
        if self.started {
            if self.step <= self.window.len() {
                self.window.drain(..self.step);
            } else {
                let gap = self.step - self.window.len();
                self.window.clear();
                self.upstream.materialize_skip(gap)?;
            }
        }
        self.started = true;
        while self.window.len() < self.size && self.upstream.materialize_has_next()? {
            self.window.push_back(self.upstream.materialize_next()?);
        }
        if self.window.is_empty() {
            self.done = true;
            return Ok(());
        }
        if !self.upstream.materialize_has_next()? {
            self.done = true;
        }
        let mut snapshot: Vec<E> = self.window.iter().cloned().collect();
        pad(&mut snapshot, self.size, self.filler.as_ref());
        self.ready = Some(snapshot);
        Ok(())
    }
}

impl<E: SeqBound> IteratorMaterializer<Vec<E>> for WindowIter<E> {
    fn known_size(&self) -> Option<usize> {
        if self.started {
            return (self.done && self.ready.is_none()).then_some(0);
        }
        self.upstream
            .known_size()
            .map(|len| window_count(len, self.size, self.step))
    }

    fn materialize_has_next(&mut self) -> Result<bool> {
        self.advance()?;
        Ok(self.ready.is_some())
    }

    fn materialize_next(&mut self) -> Result<Vec<E>> {
        self.advance()?;
        self.ready.take().ok_or(SequenceError::NoSuchElement)
    }
}

impl<E: SeqBound> ListSequence<E> {
    fn windowed(
        &self,
        size: usize,
        step: usize,
        filler: Option<E>,
    ) -> Result<ListSequence<Vec<E>>> {
        let size = require_positive("size", size)?;
        let step = require_positive("step", step)?;
        Ok(ListSequence::from_materializer(WindowList::new(
            Arc::clone(&self.list),
            size,
            step,
            filler,
        )))
    }

    /// Split into consecutive groups of `size`; the last group may be short.
    ///
    /// Fails with [`SequenceError::InvalidArgument`] when `size` is zero.
    pub fn group(&self, size: usize) -> Result<ListSequence<Vec<E>>> {
        self.windowed(size, size, None)
    }

    /// Split into consecutive groups of `size`, padding the last with `filler`.
    ///
    /// # Example
    /// ```
    /// use ironseq::ListSequence;
    ///
    /// let groups = ListSequence::from_vec(vec![1, 2, 3, 4]).group_padded(3, 0)?;
    /// assert_eq!(groups.to_vec()?, vec![vec![1, 2, 3], vec![4, 0, 0]]);
    /// assert_eq!(groups.known_size(), Some(2));
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    pub fn group_padded(&self, size: usize, filler: E) -> Result<ListSequence<Vec<E>>> {
        self.windowed(size, size, Some(filler))
    }

    /// Windows of `size` elements starting every `step` elements.
    ///
    /// # Example
    /// ```
    /// use ironseq::ListSequence;
    ///
    /// let windows = ListSequence::from_vec(vec![1, 2, 3, 4, 5]).window(3, 1)?;
    /// assert_eq!(windows.to_vec()?, vec![vec![1, 2, 3], vec![2, 3, 4], vec![3, 4, 5]]);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    pub fn window(&self, size: usize, step: usize) -> Result<ListSequence<Vec<E>>> {
        self.windowed(size, step, None)
    }

    /// Windows of `size` starting every `step` elements, the last one padded with
    /// `filler`.
    pub fn window_padded(
        &self,
        size: usize,
        step: usize,
        filler: E,
    ) -> Result<ListSequence<Vec<E>>> {
        self.windowed(size, step, Some(filler))
    }
}

impl<E: SeqBound> IteratorSequence<E> {
    fn windowed(
        self,
        size: usize,
        step: usize,
        filler: Option<E>,
    ) -> Result<IteratorSequence<Vec<E>>> {
        let size = require_positive("size", size)?;
        let step = require_positive("step", step)?;
        Ok(IteratorSequence::from_materializer(WindowIter::new(
            self.iter, size, step, filler,
        )))
    }

    /// Split into consecutive groups of `size`; the last group may be short.
    ///
    /// # Errors
    /// [`SequenceError::InvalidArgument`] when `size` is zero.
    pub fn group(self, size: usize) -> Result<IteratorSequence<Vec<E>>> {
        self.windowed(size, size, None)
    }

    pub fn group_padded(self, size: usize, filler: E) -> Result<IteratorSequence<Vec<E>>> {
        self.windowed(size, size, Some(filler))
    }

    /// Windows of `size` elements starting every `step` elements.
    ///
    /// Overlapping elements are held back in a buffer of `size` elements; a `step`
    /// larger than `size` skips the gap without materializing it.
    ///
    /// # Example
    /// ```
    /// use ironseq::IteratorSequence;
    ///
    /// let pairs = IteratorSequence::from_iterator(1..=4).window(2, 1)?;
    /// assert_eq!(pairs.to_vec()?, vec![vec![1, 2], vec![2, 3], vec![3, 4]]);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    pub fn window(self, size: usize, step: usize) -> Result<IteratorSequence<Vec<E>>> {
        self.windowed(size, step, None)
    }

    pub fn window_padded(
        self,
        size: usize,
        step: usize,
        filler: E,
    ) -> Result<IteratorSequence<Vec<E>>> {
        self.windowed(size, step, Some(filler))
    }
}
