//! Node contracts implemented by every source and operator.
//!
//! There are exactly two families of nodes:
//!
//! - [`IteratorMaterializer`]: sequential, pull-based and forward-only. Nodes
//!   are owned (`&mut self`) and consumed as they are pulled.
//! - [`ListMaterializer`]: random-access and size-queryable. Nodes are shared
//!   behind an [`Arc`] (`&self`) and memoize whatever they had to compute.
//!
//! Construction of a node never touches its upstream; only the
//! `materialize_*` calls do. Sizes that are not known without a scan are
//! reported as `None` by `known_size`.

use crate::error::{from_callback, Result, SequenceError};
use std::sync::Arc;

/// Owned sequential node.
pub type BoxIter<E> = Box<dyn IteratorMaterializer<E>>;

/// Shared random-access node.
pub type ArcList<E> = Arc<dyn ListMaterializer<E>>;

/// Fallible element predicate.
pub type Predicate<E> = Arc<dyn Fn(&E) -> Result<bool> + Send + Sync>;

/// Fallible element mapper.
pub type Mapper<E, O> = Arc<dyn Fn(&E) -> Result<O> + Send + Sync>;

/// Fallible element consumer.
pub type Consumer<E> = Arc<dyn Fn(&E) -> Result<()> + Send + Sync>;

/// Sequential, forward-only node contract.
pub trait IteratorMaterializer<E>: Send {
    /// Number of remaining elements, when known without pulling.
    fn known_size(&self) -> Option<usize> {
        None
    }

    /// Whether another element is available. May force computation.
    fn materialize_has_next(&mut self) -> Result<bool>;

    /// The next element; fails with [`SequenceError::NoSuchElement`] at the end.
    fn materialize_next(&mut self) -> Result<E>;

    /// Advance by up to `count` elements, returning how many were skipped.
    ///
    /// The result is lower than `count` only when the node is exhausted.
    fn materialize_skip(&mut self, count: usize) -> Result<usize> {
        let mut skipped = 0;
        while skipped < count && self.materialize_has_next()? {
            self.materialize_next()?;
            skipped += 1;
        }
        Ok(skipped)
    }
}

impl<E, I> IteratorMaterializer<E> for Box<I>
where
    I: IteratorMaterializer<E> + ?Sized,
{
    fn known_size(&self) -> Option<usize> {
        (**self).known_size()
    }
    fn materialize_has_next(&mut self) -> Result<bool> {
        (**self).materialize_has_next()
    }
    fn materialize_next(&mut self) -> Result<E> {
        (**self).materialize_next()
    }
    fn materialize_skip(&mut self, count: usize) -> Result<usize> {
        (**self).materialize_skip(count)
    }
}

/// Random-access node contract.
pub trait ListMaterializer<E>: Send + Sync {
    /// The size of the list, when known without a scan.
    fn known_size(&self) -> Option<usize>;

    /// Whether an element exists at `index`, without producing it.
    fn can_materialize_element(&self, index: usize) -> Result<bool>;

    /// The element at `index`; fails with [`SequenceError::IndexOutOfBounds`]
    /// when `index` cannot be materialized.
    fn materialize_element(&self, index: usize) -> Result<E>;

    /// The definite size of the list. May require a full upstream scan.
    fn materialize_size(&self) -> Result<usize>;

    /// Whether the list has no elements.
    fn materialize_empty(&self) -> Result<bool> {
        Ok(!self.can_materialize_element(0)?)
    }

    /// A sequential view over the list.
    fn materialize_iterator(self: Arc<Self>) -> BoxIter<E>;
}

/// Sequential view walking a list by index until an index is not materializable.
pub struct ListIterator<E> {
    list: ArcList<E>,
    pos: usize,
}

impl<E> ListIterator<E> {
    pub fn new(list: ArcList<E>) -> Self {
        Self { list, pos: 0 }
    }
}

/// Box an indexed walk over `list`.
pub fn indexed_iterator<E: 'static>(list: ArcList<E>) -> BoxIter<E> {
    Box::new(ListIterator::new(list))
}

impl<E> IteratorMaterializer<E> for ListIterator<E> {
    fn known_size(&self) -> Option<usize> {
        self.list.known_size().map(|n| n.saturating_sub(self.pos))
    }

    fn materialize_has_next(&mut self) -> Result<bool> {
        self.list.can_materialize_element(self.pos)
    }

    fn materialize_next(&mut self) -> Result<E> {
        if !self.list.can_materialize_element(self.pos)? {
            return Err(SequenceError::NoSuchElement);
        }
        // A failing element still consumes its position.
        let index = self.pos;
        self.pos += 1;
        self.list.materialize_element(index)
    }

    fn materialize_skip(&mut self, count: usize) -> Result<usize> {
        if count == 0 {
            return Ok(0);
        }
        let start = self.pos;
        let wanted = start.saturating_add(count);
        self.pos = match self.list.known_size() {
            Some(size) => wanted.min(size.max(start)),
            // `usize::MAX` means "skip everything"; never test that index.
            None if count == usize::MAX || wanted == usize::MAX => {
                self.list.materialize_size()?.max(start)
            }
            None if self.list.can_materialize_element(wanted - 1)? => wanted,
            None => self.list.materialize_size()?.max(start),
        };
        Ok(self.pos - start)
    }
}

/// Scan `list` for an element equal to `element`.
pub fn materialize_contains<E: PartialEq>(
    list: &dyn ListMaterializer<E>,
    element: &E,
) -> Result<bool> {
    let mut index = 0;
    while list.can_materialize_element(index)? {
        if list.materialize_element(index)? == *element {
            return Ok(true);
        }
        index += 1;
    }
    Ok(false)
}

/// Scan an iterator node for an element equal to `element`, consuming it.
pub fn materialize_iterator_contains<E: PartialEq>(
    iter: &mut dyn IteratorMaterializer<E>,
    element: &E,
) -> Result<bool> {
    while iter.materialize_has_next()? {
        if iter.materialize_next()? == *element {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Fail with [`SequenceError::IndexOutOfBounds`] unless `index` is materializable.
pub(crate) fn check_element<E>(list: &dyn ListMaterializer<E>, index: usize) -> Result<()> {
    if list.can_materialize_element(index)? {
        Ok(())
    } else {
        Err(SequenceError::IndexOutOfBounds { index })
    }
}

// ---- callback adapters ----

pub(crate) fn predicate<E, P>(p: P) -> Predicate<E>
where
    E: 'static,
    P: Fn(&E) -> bool + Send + Sync + 'static,
{
    Arc::new(move |e: &E| Ok(p(e)))
}

pub(crate) fn try_predicate<E, P>(p: P) -> Predicate<E>
where
    E: 'static,
    P: Fn(&E) -> anyhow::Result<bool> + Send + Sync + 'static,
{
    Arc::new(move |e: &E| p(e).map_err(from_callback))
}

pub(crate) fn negate<E: 'static>(p: Predicate<E>) -> Predicate<E> {
    Arc::new(move |e: &E| p(e).map(|matched| !matched))
}

pub(crate) fn equal_to<E>(value: E) -> Predicate<E>
where
    E: PartialEq + Send + Sync + 'static,
{
    Arc::new(move |e: &E| Ok(*e == value))
}

pub(crate) fn mapper<E, O, F>(f: F) -> Mapper<E, O>
where
    E: 'static,
    O: 'static,
    F: Fn(&E) -> O + Send + Sync + 'static,
{
    Arc::new(move |e: &E| Ok(f(e)))
}

pub(crate) fn try_mapper<E, O, F>(f: F) -> Mapper<E, O>
where
    E: 'static,
    O: 'static,
    F: Fn(&E) -> anyhow::Result<O> + Send + Sync + 'static,
{
    Arc::new(move |e: &E| f(e).map_err(from_callback))
}
