//! Scratch storage private to one operator invocation.
//!
//! - [`Ring`]: a bounded ring holding back the last `n` elements of an
//!   upstream (`drop_right`, `take_right`, `ends_with`). Pushing into a full
//!   ring evicts and returns the oldest element.
//! - [`BufferedIter`]: drains a sequential upstream completely on first pull
//!   and replays it through a list node built over the buffer. Operators that
//!   must see the tail first (`reverse`, `*_right_while`, last-match splices,
//!   negative bounds of unknown size) are expressed this way, so they are not
//!   lazy over unbounded upstreams.

use crate::config;
use crate::error::Result;
use crate::node::{ArcList, BoxIter, IteratorMaterializer};
use crate::sources::VecList;
use std::collections::VecDeque;
use std::mem;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub(crate) struct Ring<E> {
    buf: VecDeque<E>,
    capacity: usize,
}

impl<E> Ring<E> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            buf: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Push `element`, returning the evicted oldest element when full.
    pub(crate) fn push(&mut self, element: E) -> Option<E> {
        if self.capacity == 0 {
            return Some(element);
        }
        let evicted = if self.buf.len() == self.capacity {
            self.buf.pop_front()
        } else {
            None
        };
        self.buf.push_back(element);
        evicted
    }

    pub(crate) fn pop_front(&mut self) -> Option<E> {
        self.buf.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.buf.len() == self.capacity
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &E> {
        self.buf.iter()
    }
}

type Replay<E> = Box<dyn FnOnce(ArcList<E>) -> BoxIter<E> + Send>;

/// Sequential node buffering its whole upstream before producing anything.
pub(crate) struct BufferedIter<E> {
    upstream: Option<BoxIter<E>>,
    buffer: Vec<E>,
    replay: Option<Replay<E>>,
    ready: Option<BoxIter<E>>,
    size_hint: Option<usize>,
}

impl<E: Clone + Send + Sync + 'static> BufferedIter<E> {
    /// Buffer `upstream` and hand the buffer to `replay` as a list.
    ///
    /// `size_hint` is reported as the known size until the buffer is replayed.
    pub(crate) fn new<F>(upstream: BoxIter<E>, size_hint: Option<usize>, replay: F) -> Self
    where
        F: FnOnce(ArcList<E>) -> BoxIter<E> + Send + 'static,
    {
        Self {
            upstream: Some(upstream),
            buffer: Vec::with_capacity(config::current().buffer_capacity),
            replay: Some(Box::new(replay)),
            ready: None,
            size_hint,
        }
    }

    /// Drain the upstream (resuming after a failed pull) and start the replay.
    fn ready(&mut self) -> Result<&mut BoxIter<E>> {
        if let Some(upstream) = self.upstream.as_mut() {
            while upstream.materialize_has_next()? {
                self.buffer.push(upstream.materialize_next()?);
            }
            self.upstream = None;
        }
        let iter = match self.ready.take() {
            Some(iter) => iter,
            None => {
                let list: ArcList<E> = Arc::new(VecList::new(mem::take(&mut self.buffer)));
                match self.replay.take() {
                    Some(replay) => replay(list),
                    None => list.materialize_iterator(),
                }
            }
        };
        Ok(self.ready.insert(iter))
    }
}

impl<E: Clone + Send + Sync + 'static> IteratorMaterializer<E> for BufferedIter<E> {
    fn known_size(&self) -> Option<usize> {
        match &self.ready {
            Some(iter) => iter.known_size(),
            None => self.size_hint,
        }
    }

    fn materialize_has_next(&mut self) -> Result<bool> {
        self.ready()?.materialize_has_next()
    }

    fn materialize_next(&mut self) -> Result<E> {
        self.ready()?.materialize_next()
    }

    fn materialize_skip(&mut self, count: usize) -> Result<usize> {
        self.ready()?.materialize_skip(count)
    }
}
