//! Instrumented source nodes for observing laziness, memoization and races.
//!
//! Each source behaves like the plain array source except for what it
//! measures or injects. They are handed to
//! [`ListSequence::from_materializer`](crate::ListSequence::from_materializer) or
//! [`IteratorSequence::from_materializer`](crate::IteratorSequence::from_materializer).

use crate::error::{Result, SequenceError};
use crate::node::{indexed_iterator, BoxIter, IteratorMaterializer, ListMaterializer};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Shared view of a source's counter; stays readable after the source moves
/// into a sequence.
#[derive(Clone, Debug, Default)]
pub struct PullCounter(Arc<AtomicUsize>);

impl PullCounter {
    /// Number of recorded pulls so far.
    #[must_use]
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Array-backed list counting every `materialize_element` call.
///
/// # Example
///
/// ```
/// use ironseq::ListSequence;
/// use ironseq::testing::CountingList;
///
/// let source = CountingList::new(vec![1, 2, 3]);
/// let pulls = source.counter();
/// let seq = ListSequence::from_materializer(source).reverse();
/// assert_eq!(seq.get(0)?, 3);
/// assert_eq!(pulls.get(), 1);
/// # Ok::<(), ironseq::SequenceError>(())
/// ```
pub struct CountingList<E> {
    elements: Arc<[E]>,
    pulls: PullCounter,
    hide_size: bool,
}

impl<E> CountingList<E> {
    pub fn new(elements: impl Into<Arc<[E]>>) -> Self {
        Self {
            elements: elements.into(),
            pulls: PullCounter::default(),
            hide_size: false,
        }
    }

    /// Report the size as unknown, so operators have to discover it.
    #[must_use]
    pub fn with_unknown_size(mut self) -> Self {
        self.hide_size = true;
        self
    }

    #[must_use]
    pub fn counter(&self) -> PullCounter {
        self.pulls.clone()
    }
}

impl<E: Clone + Send + Sync + 'static> ListMaterializer<E> for CountingList<E> {
    fn known_size(&self) -> Option<usize> {
        (!self.hide_size).then_some(self.elements.len())
    }

    fn can_materialize_element(&self, index: usize) -> Result<bool> {
        Ok(index < self.elements.len())
    }

    fn materialize_element(&self, index: usize) -> Result<E> {
        self.pulls.record();
        self.elements
            .get(index)
            .cloned()
            .ok_or(SequenceError::IndexOutOfBounds { index })
    }

    fn materialize_size(&self) -> Result<usize> {
        Ok(self.elements.len())
    }

    fn materialize_iterator(self: Arc<Self>) -> BoxIter<E> {
        indexed_iterator(self)
    }
}

/// Array-backed iterator counting every `materialize_next` call.
pub struct CountingIter<E> {
    elements: Arc<[E]>,
    pos: usize,
    pulls: PullCounter,
}

impl<E> CountingIter<E> {
    pub fn new(elements: impl Into<Arc<[E]>>) -> Self {
        Self {
            elements: elements.into(),
            pos: 0,
            pulls: PullCounter::default(),
        }
    }

    #[must_use]
    pub fn counter(&self) -> PullCounter {
        self.pulls.clone()
    }
}

impl<E: Clone + Send + Sync> IteratorMaterializer<E> for CountingIter<E> {
    fn materialize_has_next(&mut self) -> Result<bool> {
        Ok(self.pos < self.elements.len())
    }

    fn materialize_next(&mut self) -> Result<E> {
        self.pulls.record();
        let element = self
            .elements
            .get(self.pos)
            .cloned()
            .ok_or(SequenceError::NoSuchElement)?;
        self.pos += 1;
        Ok(element)
    }
}

/// List of unknown size that sleeps in every size and element query.
///
/// Widens the window in which two callers race for the same one-time
/// computation.
pub struct SlowList<E> {
    elements: Arc<[E]>,
    delay: Duration,
}

impl<E> SlowList<E> {
    pub fn new(elements: impl Into<Arc<[E]>>, delay: Duration) -> Self {
        Self {
            elements: elements.into(),
            delay,
        }
    }
}

impl<E: Clone + Send + Sync + 'static> ListMaterializer<E> for SlowList<E> {
    fn known_size(&self) -> Option<usize> {
        None
    }

    fn can_materialize_element(&self, index: usize) -> Result<bool> {
        Ok(index < self.elements.len())
    }

    fn materialize_element(&self, index: usize) -> Result<E> {
        thread::sleep(self.delay);
        self.elements
            .get(index)
            .cloned()
            .ok_or(SequenceError::IndexOutOfBounds { index })
    }

    fn materialize_size(&self) -> Result<usize> {
        thread::sleep(self.delay);
        Ok(self.elements.len())
    }

    fn materialize_iterator(self: Arc<Self>) -> BoxIter<E> {
        indexed_iterator(self)
    }
}

/// Iterator whose pulls at the chosen positions fail with
/// [`SequenceError::Callback`]. A failed pull still consumes its position.
///
/// # Example
///
/// ```
/// use ironseq::IteratorSequence;
/// use ironseq::testing::FailingIter;
///
/// let seq = IteratorSequence::from_materializer(FailingIter::new(vec![1, 2, 3], [1]))
///     .map_exceptionally(|_err| Ok(0));
/// assert_eq!(seq.to_vec()?, vec![1, 0, 3]);
/// # Ok::<(), ironseq::SequenceError>(())
/// ```
pub struct FailingIter<E> {
    elements: Arc<[E]>,
    failing: HashSet<usize>,
    pos: usize,
}

impl<E> FailingIter<E> {
    pub fn new(elements: impl Into<Arc<[E]>>, failing: impl IntoIterator<Item = usize>) -> Self {
        Self {
            elements: elements.into(),
            failing: failing.into_iter().collect(),
            pos: 0,
        }
    }
}

impl<E: Clone + Send + Sync> IteratorMaterializer<E> for FailingIter<E> {
    fn known_size(&self) -> Option<usize> {
        Some(self.elements.len() - self.pos)
    }

    fn materialize_has_next(&mut self) -> Result<bool> {
        Ok(self.pos < self.elements.len())
    }

    fn materialize_next(&mut self) -> Result<E> {
        let index = self.pos;
        let element = self
            .elements
            .get(index)
            .cloned()
            .ok_or(SequenceError::NoSuchElement)?;
        self.pos += 1;
        if self.failing.contains(&index) {
            return Err(SequenceError::Callback(anyhow::anyhow!(
                "injected failure at position {index}"
            )));
        }
        Ok(element)
    }
}
