//! Source adapters: plain data wrapped as nodes.
//!
//! - [`VecList`] / [`VecIter`]: an array or fixed collection (also used for
//!   singletons and the empty sequence).
//! - [`RepeatList`] / [`RepeatIter`]: one value repeated a fixed number of
//!   times (or forever, for the iterator form).
//! - [`StdIter`]: any standard [`Iterator`], pulled one element at a time.
//! - [`CharsIter`]: the characters of a string, decoded as they are pulled.
//!
//! Sources are the only nodes whose `known_size` is exact from the start.

use crate::error::{Result, SequenceError};
use crate::node::{BoxIter, IteratorMaterializer, ListMaterializer};
use std::sync::Arc;

/// Random-access node over an immutable array.
pub struct VecList<E> {
    elements: Arc<[E]>,
}

impl<E> VecList<E> {
    pub fn new(elements: impl Into<Arc<[E]>>) -> Self {
        Self {
            elements: elements.into(),
        }
    }
}

impl<E: Clone + Send + Sync + 'static> ListMaterializer<E> for VecList<E> {
    fn known_size(&self) -> Option<usize> {
        Some(self.elements.len())
    }

    fn can_materialize_element(&self, index: usize) -> Result<bool> {
        Ok(index < self.elements.len())
    }

    fn materialize_element(&self, index: usize) -> Result<E> {
        self.elements
            .get(index)
            .cloned()
            .ok_or(SequenceError::IndexOutOfBounds { index })
    }

    fn materialize_size(&self) -> Result<usize> {
        Ok(self.elements.len())
    }

    fn materialize_empty(&self) -> Result<bool> {
        Ok(self.elements.is_empty())
    }

    fn materialize_iterator(self: Arc<Self>) -> BoxIter<E> {
        Box::new(VecIter::new(Arc::clone(&self.elements)))
    }
}

/// Sequential node over an immutable array.
pub struct VecIter<E> {
    elements: Arc<[E]>,
    pos: usize,
}

impl<E> VecIter<E> {
    pub fn new(elements: impl Into<Arc<[E]>>) -> Self {
        Self {
            elements: elements.into(),
            pos: 0,
        }
    }
}

impl<E: Clone + Send + Sync> IteratorMaterializer<E> for VecIter<E> {
    fn known_size(&self) -> Option<usize> {
        Some(self.elements.len() - self.pos)
    }

    fn materialize_has_next(&mut self) -> Result<bool> {
        Ok(self.pos < self.elements.len())
    }

    fn materialize_next(&mut self) -> Result<E> {
        let element = self
            .elements
            .get(self.pos)
            .cloned()
            .ok_or(SequenceError::NoSuchElement)?;
        self.pos += 1;
        Ok(element)
    }

    fn materialize_skip(&mut self, count: usize) -> Result<usize> {
        let skipped = count.min(self.elements.len() - self.pos);
        self.pos += skipped;
        Ok(skipped)
    }
}

/// A single value repeated `times` times.
pub struct RepeatList<E> {
    value: E,
    times: usize,
}

impl<E> RepeatList<E> {
    pub fn new(value: E, times: usize) -> Self {
        Self { value, times }
    }
}

impl<E: Clone + Send + Sync + 'static> ListMaterializer<E> for RepeatList<E> {
    fn known_size(&self) -> Option<usize> {
        Some(self.times)
    }

    fn can_materialize_element(&self, index: usize) -> Result<bool> {
        Ok(index < self.times)
    }

    fn materialize_element(&self, index: usize) -> Result<E> {
        if index < self.times {
            Ok(self.value.clone())
        } else {
            Err(SequenceError::IndexOutOfBounds { index })
        }
    }

    fn materialize_size(&self) -> Result<usize> {
        Ok(self.times)
    }

    fn materialize_iterator(self: Arc<Self>) -> BoxIter<E> {
        Box::new(RepeatIter::new(self.value.clone(), Some(self.times)))
    }
}

/// A single value repeated a fixed number of times, or forever when
/// `remaining` is `None`.
pub struct RepeatIter<E> {
    value: E,
    remaining: Option<usize>,
}

impl<E> RepeatIter<E> {
    pub fn new(value: E, remaining: Option<usize>) -> Self {
        Self { value, remaining }
    }
}

impl<E: Clone + Send> IteratorMaterializer<E> for RepeatIter<E> {
    fn known_size(&self) -> Option<usize> {
        self.remaining
    }

    fn materialize_has_next(&mut self) -> Result<bool> {
        Ok(self.remaining != Some(0))
    }

    fn materialize_next(&mut self) -> Result<E> {
        match &mut self.remaining {
            Some(0) => Err(SequenceError::NoSuchElement),
            Some(n) => {
                *n -= 1;
                Ok(self.value.clone())
            }
            None => Ok(self.value.clone()),
        }
    }

    fn materialize_skip(&mut self, count: usize) -> Result<usize> {
        match &mut self.remaining {
            Some(n) => {
                let skipped = count.min(*n);
                *n -= skipped;
                Ok(skipped)
            }
            None => Ok(count),
        }
    }
}

/// Sequential node pulling from a standard iterator.
pub struct StdIter<I: Iterator> {
    iter: I,
    peeked: Option<I::Item>,
}

impl<I: Iterator> StdIter<I> {
    pub fn new(iter: I) -> Self {
        Self { iter, peeked: None }
    }
}

impl<I> IteratorMaterializer<I::Item> for StdIter<I>
where
    I: Iterator + Send,
    I::Item: Send,
{
    fn known_size(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => {
                Some(lower + usize::from(self.peeked.is_some()))
            }
            _ => None,
        }
    }

    fn materialize_has_next(&mut self) -> Result<bool> {
        if self.peeked.is_none() {
            self.peeked = self.iter.next();
        }
        Ok(self.peeked.is_some())
    }

    fn materialize_next(&mut self) -> Result<I::Item> {
        self.peeked
            .take()
            .or_else(|| self.iter.next())
            .ok_or(SequenceError::NoSuchElement)
    }
}

/// Sequential node over the characters of a string.
pub struct CharsIter {
    text: Arc<str>,
    offset: usize,
}

impl CharsIter {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self {
            text: text.into(),
            offset: 0,
        }
    }
}

impl IteratorMaterializer<char> for CharsIter {
    fn materialize_has_next(&mut self) -> Result<bool> {
        Ok(self.offset < self.text.len())
    }

    fn materialize_next(&mut self) -> Result<char> {
        let c = self.text[self.offset..]
            .chars()
            .next()
            .ok_or(SequenceError::NoSuchElement)?;
        self.offset += c.len_utf8();
        Ok(c)
    }
}
