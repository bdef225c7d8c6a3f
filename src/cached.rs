//! Random-access view over a lazily pulled iterator node.
//!
//! [`CachedIteratorList`] turns a sequential node into a list node: asking
//! for index `i` pulls from the iterator only until `i + 1` elements have
//! been produced, and every produced element is kept, so each one is pulled
//! exactly once no matter how often or in which order it is queried.
//!
//! Operators whose output positions depend on a variable number of
//! upstream elements (filtering, full flat-mapping, recovering flat-maps)
//! are built as an iterator pipeline wrapped in this list. The iterator is
//! created on first demand and dropped as soon as it is exhausted, which
//! releases the upstream it was pulling from.

use crate::error::{Result, SequenceError};
use crate::node::{indexed_iterator, BoxIter, ListMaterializer};
use crate::state::{lock, read, write, Claim};
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::trace;

type IterFactory<E> = Box<dyn FnOnce() -> BoxIter<E> + Send>;

enum Cursor<E> {
    Pending(IterFactory<E>),
    Pulling(BoxIter<E>),
    Done,
}

/// List node memoizing the elements of an iterator node as they are pulled.
pub struct CachedIteratorList<E> {
    elements: RwLock<Vec<E>>,
    cursor: Mutex<Cursor<E>>,
    exhausted: AtomicBool,
    claim: Claim,
    size_hint: Option<usize>,
}

impl<E: Clone + Send + Sync + 'static> CachedIteratorList<E> {
    /// Build over an iterator created by `factory` on first demand.
    pub fn new<F>(node: &'static str, size_hint: Option<usize>, factory: F) -> Self
    where
        F: FnOnce() -> BoxIter<E> + Send + 'static,
    {
        Self {
            elements: RwLock::new(Vec::new()),
            cursor: Mutex::new(Cursor::Pending(Box::new(factory))),
            exhausted: AtomicBool::new(false),
            claim: Claim::new(node),
            size_hint,
        }
    }

    /// Build over an already constructed iterator node.
    pub fn from_iter(node: &'static str, iter: BoxIter<E>) -> Self {
        let size_hint = iter.known_size();
        Self::new(node, size_hint, move || iter)
    }

    /// Pull until `index` is cached (or everything, for `None`).
    /// Returns whether `index` is available.
    fn pull_until(&self, index: Option<usize>) -> Result<bool> {
        let available = |len: usize| index.is_some_and(|i| i < len);
        if available(read(&self.elements).len()) {
            return Ok(true);
        }
        if self.exhausted.load(Ordering::Acquire) {
            return Ok(false);
        }
        let _guard = self.claim.acquire()?;
        let mut cursor = lock(&self.cursor);
        if let Cursor::Pending(_) = &*cursor {
            if let Cursor::Pending(factory) = mem::replace(&mut *cursor, Cursor::Done) {
                *cursor = Cursor::Pulling(factory());
            }
        }
        loop {
            if available(read(&self.elements).len()) {
                return Ok(true);
            }
            let Cursor::Pulling(iter) = &mut *cursor else {
                return Ok(false);
            };
            if !iter.materialize_has_next()? {
                *cursor = Cursor::Done;
                self.exhausted.store(true, Ordering::Release);
                trace!(
                    node = self.claim.node(),
                    len = read(&self.elements).len(),
                    "upstream exhausted, released"
                );
                return Ok(false);
            }
            let element = iter.materialize_next()?;
            write(&self.elements).push(element);
        }
    }
}

impl<E: Clone + Send + Sync + 'static> ListMaterializer<E> for CachedIteratorList<E> {
    fn known_size(&self) -> Option<usize> {
        if self.exhausted.load(Ordering::Acquire) {
            Some(read(&self.elements).len())
        } else {
            self.size_hint
        }
    }

    fn can_materialize_element(&self, index: usize) -> Result<bool> {
        self.pull_until(Some(index))
    }

    fn materialize_element(&self, index: usize) -> Result<E> {
        if !self.pull_until(Some(index))? {
            return Err(SequenceError::IndexOutOfBounds { index });
        }
        read(&self.elements)
            .get(index)
            .cloned()
            .ok_or(SequenceError::IndexOutOfBounds { index })
    }

    fn materialize_size(&self) -> Result<usize> {
        self.pull_until(None)?;
        Ok(read(&self.elements).len())
    }

    fn materialize_iterator(self: Arc<Self>) -> BoxIter<E> {
        indexed_iterator(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::StdIter;

    #[test]
    fn pulls_only_what_is_asked() -> Result<()> {
        let pulled = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = Arc::clone(&pulled);
        let list = CachedIteratorList::new("test", None, move || {
            let iter = (0..10).inspect(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            Box::new(StdIter::new(iter)) as BoxIter<i32>
        });
        assert_eq!(pulled.load(Ordering::SeqCst), 0);
        assert_eq!(list.materialize_element(2)?, 2);
        assert_eq!(pulled.load(Ordering::SeqCst), 3);
        assert_eq!(list.materialize_element(0)?, 0);
        assert_eq!(pulled.load(Ordering::SeqCst), 3);
        assert_eq!(list.known_size(), None);
        assert_eq!(list.materialize_size()?, 10);
        assert_eq!(list.known_size(), Some(10));
        assert!(!list.can_materialize_element(10)?);
        Ok(())
    }
}
