//! One-shot result nodes backing every aggregate and search operator.
//!
//! The result of a fold, a count or a search is presented as a sequence of
//! zero or one element. [`OnceList`] keeps its computation in a
//! [`StateCell`]: the first query runs it under the claim guard, later
//! queries answer from the Material value, and the recipe (which holds the
//! upstream) is dropped after the swap. [`OnceIter`] is its single-owner
//! counterpart.

use crate::error::{Result, SequenceError};
use crate::node::{indexed_iterator, BoxIter, IteratorMaterializer, ListMaterializer};
use crate::sequence::{IteratorSequence, ListSequence, SeqBound};
use crate::state::StateCell;
use std::sync::Arc;

/// A scan over a sequential view producing zero or one result.
pub(crate) type Scan<E, R> =
    Arc<dyn Fn(&mut dyn IteratorMaterializer<E>) -> Result<Option<R>> + Send + Sync>;

type Compute<R> = Arc<dyn Fn() -> Result<Option<R>> + Send + Sync>;

pub(crate) struct OnceList<R> {
    cell: StateCell<Compute<R>, Option<R>>,
    always: bool,
}

impl<R: SeqBound> OnceList<R> {
    fn resolve(&self) -> Result<Option<R>> {
        self.cell.resolve(|compute| compute())
    }
}

impl<R: SeqBound> ListMaterializer<R> for OnceList<R> {
    fn known_size(&self) -> Option<usize> {
        match self.cell.material() {
            Some(result) => Some(usize::from(result.is_some())),
            None if self.always => Some(1),
            None => None,
        }
    }

    fn can_materialize_element(&self, index: usize) -> Result<bool> {
        Ok(index == 0 && self.resolve()?.is_some())
    }

    fn materialize_element(&self, index: usize) -> Result<R> {
        if index != 0 {
            return Err(SequenceError::IndexOutOfBounds { index });
        }
        self.resolve()?.ok_or(SequenceError::IndexOutOfBounds { index })
    }

    fn materialize_size(&self) -> Result<usize> {
        Ok(usize::from(self.resolve()?.is_some()))
    }

    fn materialize_iterator(self: Arc<Self>) -> BoxIter<R> {
        indexed_iterator(self)
    }
}

enum Pending<R> {
    Compute(Box<dyn FnMut() -> Result<Option<R>> + Send>),
    Ready(Option<R>),
}

pub(crate) struct OnceIter<R> {
    state: Pending<R>,
    always: bool,
}

impl<R> OnceIter<R> {
    fn resolve(&mut self) -> Result<&mut Option<R>> {
        if let Pending::Compute(compute) = &mut self.state {
            self.state = Pending::Ready(compute()?);
        }
        match &mut self.state {
            Pending::Ready(result) => Ok(result),
            Pending::Compute(_) => Err(SequenceError::NoSuchElement),
        }
    }
}

impl<R: Send> IteratorMaterializer<R> for OnceIter<R> {
    fn known_size(&self) -> Option<usize> {
        match &self.state {
            Pending::Ready(result) => Some(usize::from(result.is_some())),
            Pending::Compute(_) if self.always => Some(1),
            Pending::Compute(_) => None,
        }
    }

    fn materialize_has_next(&mut self) -> Result<bool> {
        Ok(self.resolve()?.is_some())
    }

    fn materialize_next(&mut self) -> Result<R> {
        self.resolve()?.take().ok_or(SequenceError::NoSuchElement)
    }
}

impl<E: SeqBound> ListSequence<E> {
    /// Run `scan` over this list once, on first demand.
    ///
    /// `always` declares that the scan produces a result on success, which
    /// lets the node report a known size of one before running it.
    pub(crate) fn aggregate<R: SeqBound>(&self, always: bool, scan: Scan<E, R>) -> ListSequence<R> {
        let list = Arc::clone(&self.list);
        let compute: Compute<R> = Arc::new(move || {
            let mut iter = Arc::clone(&list).materialize_iterator();
            scan(&mut *iter)
        });
        ListSequence::from_materializer(OnceList {
            cell: StateCell::new("aggregate", compute),
            always,
        })
    }
}

impl<E: SeqBound> IteratorSequence<E> {
    /// Run `scan` over the rest of this sequence once, on first pull.
    pub(crate) fn aggregate<R: SeqBound>(
        self,
        always: bool,
        scan: Scan<E, R>,
    ) -> IteratorSequence<R> {
        let mut iter = self.iter;
        IteratorSequence::from_materializer(OnceIter {
            state: Pending::Compute(Box::new(move || scan(&mut *iter))),
            always,
        })
    }
}
