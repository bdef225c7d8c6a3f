//! Sequence handles: the consumer-facing face of a node.
//!
//! [`ListSequence`] wraps a shared random-access node and is cheap to clone;
//! every operator borrows the handle and returns a new one, so one list can
//! feed several pipelines. [`IteratorSequence`] owns a sequential node and is
//! consumed by its operators, the way a standard iterator adapter is.
//!
//! Handles only translate calls into node queries (`get` is
//! `materialize_element`, `is_empty` is `materialize_empty`, ...). They carry
//! no mutating methods: a sequence is an immutable recipe.

use crate::cached::CachedIteratorList;
use crate::error::Result;
use crate::node::{
    materialize_contains, materialize_iterator_contains, ArcList, BoxIter, IteratorMaterializer,
    ListMaterializer,
};
use crate::sources::{CharsIter, RepeatIter, RepeatList, StdIter, VecIter, VecList};
use std::fmt;
use std::sync::Arc;

/// Trait alias for element types that can flow through a sequence.
///
/// Elements are cloned out of memoized state and nodes may be shared across
/// threads, so elements must be `Clone + Send + Sync + 'static`.
pub trait SeqBound: 'static + Send + Sync + Clone {}
impl<T> SeqBound for T where T: 'static + Send + Sync + Clone {}

/// A lazily materialized random-access sequence.
///
/// # Example
/// ```
/// use ironseq::ListSequence;
///
/// let evens = ListSequence::from_vec((0..10).collect())
///     .filter(|n: &i32| n % 2 == 0)
///     .map(|n: &i32| n * 10);
/// assert_eq!(evens.get(2)?, 40);
/// assert_eq!(evens.len()?, 5);
/// # Ok::<(), ironseq::SequenceError>(())
/// ```
pub struct ListSequence<E> {
    pub(crate) list: ArcList<E>,
}

impl<E> Clone for ListSequence<E> {
    fn clone(&self) -> Self {
        Self {
            list: Arc::clone(&self.list),
        }
    }
}

impl<E> fmt::Debug for ListSequence<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListSequence")
            .field("known_size", &self.list.known_size())
            .finish()
    }
}

impl<E: SeqBound> ListSequence<E> {
    /// Wrap a shared node.
    pub fn from_shared(list: ArcList<E>) -> Self {
        Self { list }
    }

    /// Wrap a node implementation.
    pub fn from_materializer(list: impl ListMaterializer<E> + 'static) -> Self {
        Self::from_shared(Arc::new(list))
    }

    /// A sequence over the elements of `elements`.
    pub fn from_vec(elements: Vec<E>) -> Self {
        Self::from_materializer(VecList::new(elements))
    }

    /// A sequence over a copy of `elements`.
    pub fn from_slice(elements: &[E]) -> Self {
        Self::from_materializer(VecList::new(elements))
    }

    /// A single-element sequence.
    pub fn of(element: E) -> Self {
        Self::from_vec(vec![element])
    }

    /// The empty sequence.
    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    /// `value` repeated `times` times.
    pub fn repeat(value: E, times: usize) -> Self {
        Self::from_materializer(RepeatList::new(value, times))
    }

    /// The underlying node.
    pub fn materializer(&self) -> ArcList<E> {
        Arc::clone(&self.list)
    }

    /// The size, when known without a scan.
    pub fn known_size(&self) -> Option<usize> {
        self.list.known_size()
    }

    /// The element at `index`.
    ///
    /// # Errors
    /// [`crate::SequenceError::IndexOutOfBounds`] when `index` cannot be materialized.
    pub fn get(&self, index: usize) -> Result<E> {
        self.list.materialize_element(index)
    }

    /// Whether an element exists at `index`.
    pub fn has_index(&self, index: usize) -> Result<bool> {
        self.list.can_materialize_element(index)
    }

    /// The definite size. May scan the upstream.
    pub fn len(&self) -> Result<usize> {
        self.list.materialize_size()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.list.materialize_empty()
    }

    /// The first element, if any.
    pub fn first(&self) -> Result<Option<E>> {
        if self.list.can_materialize_element(0)? {
            self.list.materialize_element(0).map(Some)
        } else {
            Ok(None)
        }
    }

    /// A sequential view over this list.
    pub fn iter(&self) -> IteratorSequence<E> {
        IteratorSequence::from_boxed(Arc::clone(&self.list).materialize_iterator())
    }

    /// Materialize every element into a `Vec`.
    pub fn to_vec(&self) -> Result<Vec<E>> {
        self.iter().to_vec()
    }
}

impl<E: SeqBound + PartialEq> ListSequence<E> {
    /// Whether any element equals `element`.
    pub fn contains(&self, element: &E) -> Result<bool> {
        materialize_contains(&*self.list, element)
    }
}

impl ListSequence<char> {
    /// The characters of `text`, decoded on demand and memoized.
    pub fn chars(text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        Self::from_materializer(CachedIteratorList::new("chars", None, move || {
            Box::new(CharsIter::new(text)) as BoxIter<char>
        }))
    }
}

impl<E: SeqBound> From<Vec<E>> for ListSequence<E> {
    fn from(elements: Vec<E>) -> Self {
        Self::from_vec(elements)
    }
}

impl<E: SeqBound> From<IteratorSequence<E>> for ListSequence<E> {
    fn from(iter: IteratorSequence<E>) -> Self {
        iter.into_list()
    }
}

/// A lazily materialized, single-pass sequence.
///
/// Besides the node-level `has_next` / `next_element` calls, the handle is a
/// standard [`Iterator`] over `Result<E>`, so it composes with `collect`:
///
/// ```
/// use ironseq::IteratorSequence;
///
/// let squares: Vec<u64> = IteratorSequence::from_iterator(1..=4u64)
///     .map(|n: &u64| n * n)
///     .collect::<ironseq::Result<_>>()?;
/// assert_eq!(squares, vec![1, 4, 9, 16]);
/// # Ok::<(), ironseq::SequenceError>(())
/// ```
pub struct IteratorSequence<E> {
    pub(crate) iter: BoxIter<E>,
}

impl<E> fmt::Debug for IteratorSequence<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IteratorSequence")
            .field("known_size", &self.iter.known_size())
            .finish()
    }
}

impl<E: SeqBound> IteratorSequence<E> {
    pub(crate) fn from_boxed(iter: BoxIter<E>) -> Self {
        Self { iter }
    }

    /// Wrap a node implementation.
    pub fn from_materializer(iter: impl IteratorMaterializer<E> + 'static) -> Self {
        Self::from_boxed(Box::new(iter))
    }

    /// Pull lazily from a standard iterator.
    pub fn from_iterator<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = E>,
        I::IntoIter: Send + 'static,
    {
        Self::from_materializer(StdIter::new(iter.into_iter()))
    }

    pub fn from_vec(elements: Vec<E>) -> Self {
        Self::from_materializer(VecIter::new(elements))
    }

    pub fn of(element: E) -> Self {
        Self::from_vec(vec![element])
    }

    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    /// `value` repeated `times` times.
    pub fn repeat(value: E, times: usize) -> Self {
        Self::from_materializer(RepeatIter::new(value, Some(times)))
    }

    /// `value` repeated without end.
    pub fn repeat_forever(value: E) -> Self {
        Self::from_materializer(RepeatIter::new(value, None))
    }

    /// The underlying node.
    pub fn into_materializer(self) -> BoxIter<E> {
        self.iter
    }

    /// Remaining size, when known without pulling.
    pub fn known_size(&self) -> Option<usize> {
        self.iter.known_size()
    }

    /// Whether another element is available.
    pub fn has_next(&mut self) -> Result<bool> {
        self.iter.materialize_has_next()
    }

    /// The next element.
    ///
    /// # Errors
    /// [`crate::SequenceError::NoSuchElement`] when the sequence is exhausted.
    pub fn next_element(&mut self) -> Result<E> {
        self.iter.materialize_next()
    }

    /// Advance by up to `count` elements, returning how many were skipped.
    pub fn skip_elements(&mut self, count: usize) -> Result<usize> {
        self.iter.materialize_skip(count)
    }

    /// Pull every remaining element into a `Vec`.
    pub fn to_vec(mut self) -> Result<Vec<E>> {
        let mut out = Vec::with_capacity(self.iter.known_size().unwrap_or(0).min(1 << 16));
        while self.iter.materialize_has_next()? {
            out.push(self.iter.materialize_next()?);
        }
        Ok(out)
    }

    /// A random-access view that pulls this sequence on demand and keeps
    /// every produced element.
    pub fn into_list(self) -> ListSequence<E> {
        ListSequence::from_materializer(CachedIteratorList::from_iter("into_list", self.iter))
    }
}

impl<E: SeqBound + PartialEq> IteratorSequence<E> {
    /// Whether any remaining element equals `element`. Consumes the sequence.
    pub fn contains(mut self, element: &E) -> Result<bool> {
        materialize_iterator_contains(&mut *self.iter, element)
    }
}

impl IteratorSequence<char> {
    /// The characters of `text`, decoded as they are pulled.
    pub fn chars(text: impl Into<Arc<str>>) -> Self {
        Self::from_materializer(CharsIter::new(text))
    }
}

impl<E: SeqBound> Iterator for IteratorSequence<E> {
    type Item = Result<E>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.iter.materialize_has_next() {
            Ok(true) => Some(self.iter.materialize_next()),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.iter.known_size() {
            Some(n) => (n, Some(n)),
            None => (0, None),
        }
    }
}

impl<E: SeqBound> From<Vec<E>> for IteratorSequence<E> {
    fn from(elements: Vec<E>) -> Self {
        Self::from_vec(elements)
    }
}

impl<E: SeqBound> From<ListSequence<E>> for IteratorSequence<E> {
    fn from(list: ListSequence<E>) -> Self {
        list.iter()
    }
}

/// Singleton node, shared by the operators that insert one element.
pub(crate) fn singleton<E: SeqBound>(element: E) -> ArcList<E> {
    Arc::new(VecList::new(vec![element]))
}

/// The node behind anything convertible into a list handle.
pub(crate) fn list_of<E: SeqBound>(elements: impl Into<ListSequence<E>>) -> ArcList<E> {
    let sequence: ListSequence<E> = elements.into();
    sequence.list
}

/// The node behind anything convertible into an iterator handle.
pub(crate) fn iter_of<E: SeqBound>(elements: impl Into<IteratorSequence<E>>) -> BoxIter<E> {
    let sequence: IteratorSequence<E> = elements.into();
    sequence.iter
}
