//! Splices: every operator that removes a range and/or inserts a sub-sequence
//! at one point of the upstream.
//!
//! # Overview
//! - [`ListSequence::insert_at`] - Insert elements before an index
//! - [`ListSequence::remove_at`] / [`ListSequence::remove_slice`] - Remove by position
//! - [`ListSequence::remove_first_where`] / [`ListSequence::remove_last_where`] - Remove one
//!   matching element
//! - [`ListSequence::remove_first`] / [`ListSequence::remove_last`] - Remove one element by value
//! - [`ListSequence::replace_at`] / [`ListSequence::replace_slice`] - Replace by position
//! - [`ListSequence::replace_first_where`] / [`ListSequence::replace_last_where`] - Replace one
//!   matching element
//! - [`ListSequence::map_after`], [`ListSequence::map_first_where`],
//!   [`ListSequence::map_last_where`] - Map one element
//! - [`ListSequence::flat_map_after`], [`ListSequence::flat_map_first_where`],
//!   [`ListSequence::flat_map_last_where`] - Expand one element
//!
//! A splice is described by a [`SplicePoint`] (where) and an [`Insertion`]
//! (what replaces it). The list node locates the point once, memoizes
//! `(start, removed, inserted)` and then maps indices arithmetically:
//! indices below `start` go straight to the upstream, the next ones go into
//! the inserted sub-sequence, and the rest continue in the upstream shifted by
//! `removed - inserted_len`. The iterator node streams through the point when
//! it can be recognized going forward, and buffers the upstream otherwise
//! (last-match points, negative positions over an unknown size).

use crate::cached::CachedIteratorList;
use crate::error::{Result, SequenceError};
use crate::node::{
    equal_to, indexed_iterator, mapper, predicate, ArcList, BoxIter, IteratorMaterializer,
    ListMaterializer, Mapper, Predicate,
};
use crate::scratch::BufferedIter;
use crate::sequence::{iter_of, list_of, singleton, IteratorSequence, ListSequence, SeqBound};
use crate::state::StateCell;
use crate::utils::{checked_add, count_bound, resolve_bound};
use std::mem;
use std::sync::Arc;

/// Where a splice takes effect.
#[derive(Clone)]
pub(crate) enum SplicePoint<E> {
    /// Before the element at this position; nothing is removed. A position
    /// past the end is never reached.
    Before(isize),
    /// The single element at this position.
    At(isize),
    /// The elements in `[start, end)`.
    Range(isize, isize),
    FirstWhere(Predicate<E>),
    LastWhere(Predicate<E>),
}

/// What takes the place of the removed elements.
#[derive(Clone)]
pub(crate) enum Insertion<E> {
    Nothing,
    Fixed(ArcList<E>),
    /// Derived from the single element at the splice point.
    Expand(Mapper<E, ArcList<E>>),
}

#[derive(Clone)]
struct Splice<E> {
    start: usize,
    removed: usize,
    inserted: Option<ArcList<E>>,
}

enum Source<E> {
    Upstream(usize),
    Inserted(ArcList<E>, usize),
}

pub(crate) struct SpliceList<E> {
    upstream: ArcList<E>,
    point: SplicePoint<E>,
    insertion: Insertion<E>,
    size_preserving: bool,
    splice: StateCell<(), Option<Splice<E>>>,
}

impl<E: SeqBound> SpliceList<E> {
    pub(crate) fn new(
        upstream: ArcList<E>,
        point: SplicePoint<E>,
        insertion: Insertion<E>,
        size_preserving: bool,
    ) -> Self {
        Self {
            upstream,
            point,
            insertion,
            size_preserving,
            splice: StateCell::new("splice", ()),
        }
    }

    fn resolve(&self) -> Result<Option<Splice<E>>> {
        self.splice.resolve(|()| self.locate())
    }

    /// Position of the single element at `index`, if it exists.
    fn element_position(&self, index: isize) -> Result<Option<usize>> {
        if index >= 0 {
            let index = index.unsigned_abs();
            Ok(self.upstream.can_materialize_element(index)?.then_some(index))
        } else {
            let size = self.upstream.materialize_size()?;
            Ok(size.checked_sub(index.unsigned_abs()))
        }
    }

    /// A non-negative bound as is; a negative one counted from the end.
    fn bound(&self, bound: isize) -> Result<usize> {
        if bound >= 0 {
            Ok(bound.unsigned_abs())
        } else {
            Ok(resolve_bound(bound, self.upstream.materialize_size()?))
        }
    }

    /// Whether `start` is a valid splice position, i.e. `start <= size`.
    fn reaches(&self, start: usize) -> Result<bool> {
        Ok(start == 0 || self.upstream.can_materialize_element(start - 1)?)
    }

    fn locate(&self) -> Result<Option<Splice<E>>> {
        let upstream = &*self.upstream;
        let located = match &self.point {
            SplicePoint::Before(index) => {
                let start = self.bound(*index)?;
                self.reaches(start)?.then_some((start, 0))
            }
            SplicePoint::At(index) => self.element_position(*index)?.map(|start| (start, 1)),
            SplicePoint::Range(start, end) => {
                let (start, end) = (self.bound(*start)?, self.bound(*end)?);
                if self.reaches(start)? {
                    let end = end.max(start);
                    let removed = if end == start || upstream.can_materialize_element(end - 1)? {
                        end - start
                    } else {
                        upstream.materialize_size()?.saturating_sub(start)
                    };
                    Some((start, removed))
                } else {
                    None
                }
            }
            SplicePoint::FirstWhere(p) => {
                let mut index = 0;
                loop {
                    if !upstream.can_materialize_element(index)? {
                        break None;
                    }
                    if p(&upstream.materialize_element(index)?)? {
                        break Some((index, 1));
                    }
                    index += 1;
                }
            }
            SplicePoint::LastWhere(p) => {
                let mut index = upstream.materialize_size()?;
                loop {
                    if index == 0 {
                        break None;
                    }
                    index -= 1;
                    if p(&upstream.materialize_element(index)?)? {
                        break Some((index, 1));
                    }
                }
            }
        };
        let Some((start, removed)) = located else {
            return Ok(None);
        };
        let inserted = match &self.insertion {
            Insertion::Nothing => None,
            Insertion::Fixed(list) => Some(Arc::clone(list)),
            Insertion::Expand(expand) => Some(expand(&upstream.materialize_element(start)?)?),
        };
        Ok(Some(Splice {
            start,
            removed,
            inserted,
        }))
    }

    fn source(&self, index: usize) -> Result<Option<Source<E>>> {
        let Some(splice) = self.resolve()? else {
            let found = self.upstream.can_materialize_element(index)?;
            return Ok(found.then_some(Source::Upstream(index)));
        };
        if index < splice.start {
            return Ok(Some(Source::Upstream(index)));
        }
        let offset = index - splice.start;
        let inserted_len = match &splice.inserted {
            None => 0,
            Some(list) => {
                if list.can_materialize_element(offset)? {
                    return Ok(Some(Source::Inserted(Arc::clone(list), offset)));
                }
                list.materialize_size()?
            }
        };
        let past_insertion = splice.start + offset.saturating_sub(inserted_len);
        let Some(shifted) = past_insertion.checked_add(splice.removed) else {
            return Ok(None);
        };
        let found = self.upstream.can_materialize_element(shifted)?;
        Ok(found.then_some(Source::Upstream(shifted)))
    }
}

impl<E: SeqBound> ListMaterializer<E> for SpliceList<E> {
    fn known_size(&self) -> Option<usize> {
        match self.splice.material() {
            Some(Some(splice)) => {
                let inserted = match &splice.inserted {
                    Some(list) => list.known_size()?,
                    None => 0,
                };
                self.upstream
                    .known_size()?
                    .saturating_sub(splice.removed)
                    .checked_add(inserted)
            }
            Some(None) => self.upstream.known_size(),
            None if self.size_preserving => self.upstream.known_size(),
            None => None,
        }
    }

    fn can_materialize_element(&self, index: usize) -> Result<bool> {
        Ok(self.source(index)?.is_some())
    }

    fn materialize_element(&self, index: usize) -> Result<E> {
        match self.source(index)? {
            Some(Source::Upstream(index)) => self.upstream.materialize_element(index),
            Some(Source::Inserted(list, offset)) => list.materialize_element(offset),
            None => Err(SequenceError::IndexOutOfBounds { index }),
        }
    }

    fn materialize_size(&self) -> Result<usize> {
        let size = self.upstream.materialize_size()?;
        match self.resolve()? {
            None => Ok(size),
            Some(splice) => {
                let inserted = match &splice.inserted {
                    Some(list) => list.materialize_size()?,
                    None => 0,
                };
                checked_add(size.saturating_sub(splice.removed), inserted)
            }
        }
    }

    fn materialize_iterator(self: Arc<Self>) -> BoxIter<E> {
        indexed_iterator(self)
    }
}

/// What the iterator form inserts.
pub(crate) enum IterInsertion<E> {
    Nothing,
    Fixed(BoxIter<E>),
    Expand(Mapper<E, ArcList<E>>),
}

/// A splice point recognizable while streaming forward.
enum StreamPoint<E> {
    Before(usize),
    At(usize),
    Range(usize, usize),
    FirstWhere(Predicate<E>),
}

enum Phase<E> {
    Head,
    Inserting(BoxIter<E>),
    Tail,
}

struct SpliceIter<E> {
    upstream: BoxIter<E>,
    point: StreamPoint<E>,
    insertion: IterInsertion<E>,
    size_preserving: bool,
    pos: usize,
    peeked: Option<E>,
    phase: Phase<E>,
}

impl<E: SeqBound> SpliceIter<E> {
    /// Switch to the inserted sub-sequence, given the element at the point (if any).
    fn enter(&mut self, element: Option<E>) -> Result<()> {
        self.phase = match &self.insertion {
            IterInsertion::Nothing => Phase::Tail,
            IterInsertion::Expand(expand) => {
                let element = element.ok_or(SequenceError::NoSuchElement)?;
                Phase::Inserting(expand(&element)?.materialize_iterator())
            }
            IterInsertion::Fixed(_) => {
                match mem::replace(&mut self.insertion, IterInsertion::Nothing) {
                    IterInsertion::Fixed(iter) => Phase::Inserting(iter),
                    _ => Phase::Tail,
                }
            }
        };
        Ok(())
    }

    /// Whether the head has another element, entering the insertion at the point.
    fn head_has_next(&mut self) -> Result<bool> {
        if self.peeked.is_some() {
            return Ok(true);
        }
        match &self.point {
            StreamPoint::Before(start) if self.pos == *start => {
                self.enter(None)?;
                Ok(false)
            }
            StreamPoint::At(start) if self.pos == *start => {
                if self.upstream.materialize_has_next()? {
                    let element = self.upstream.materialize_next()?;
                    self.enter(Some(element))?;
                } else {
                    self.phase = Phase::Tail;
                }
                Ok(false)
            }
            StreamPoint::Range(start, end) if self.pos == *start => {
                self.upstream.materialize_skip(end.saturating_sub(*start))?;
                self.enter(None)?;
                Ok(false)
            }
            StreamPoint::FirstWhere(p) => {
                if !self.upstream.materialize_has_next()? {
                    return Ok(false);
                }
                let element = self.upstream.materialize_next()?;
                if p(&element)? {
                    self.enter(Some(element))?;
                    Ok(false)
                } else {
                    self.peeked = Some(element);
                    Ok(true)
                }
            }
            _ => self.upstream.materialize_has_next(),
        }
    }
}

impl<E: SeqBound> IteratorMaterializer<E> for SpliceIter<E> {
    fn known_size(&self) -> Option<usize> {
        let upstream = self.upstream.known_size()?;
        match &self.phase {
            Phase::Tail => Some(upstream),
            Phase::Inserting(iter) => upstream.checked_add(iter.known_size()?),
            Phase::Head if self.size_preserving => {
                upstream.checked_add(usize::from(self.peeked.is_some()))
            }
            Phase::Head => None,
        }
    }

    fn materialize_has_next(&mut self) -> Result<bool> {
        loop {
            match &mut self.phase {
                Phase::Head => {
                    if self.head_has_next()? {
                        return Ok(true);
                    }
                    if matches!(self.phase, Phase::Head) {
                        return Ok(false);
                    }
                }
                Phase::Inserting(iter) => {
                    if iter.materialize_has_next()? {
                        return Ok(true);
                    }
                    self.phase = Phase::Tail;
                }
                Phase::Tail => return self.upstream.materialize_has_next(),
            }
        }
    }

    fn materialize_next(&mut self) -> Result<E> {
        if !self.materialize_has_next()? {
            return Err(SequenceError::NoSuchElement);
        }
        match &mut self.phase {
            Phase::Inserting(iter) => iter.materialize_next(),
            Phase::Tail => self.upstream.materialize_next(),
            Phase::Head => {
                self.pos += 1;
                match self.peeked.take() {
                    Some(element) => Ok(element),
                    None => self.upstream.materialize_next(),
                }
            }
        }
    }
}

/// Build the iterator form of a splice: streaming when the point can be
/// recognized going forward, buffered otherwise.
pub(crate) fn splice_iter<E: SeqBound>(
    upstream: BoxIter<E>,
    point: SplicePoint<E>,
    insertion: IterInsertion<E>,
    size_preserving: bool,
) -> BoxIter<E> {
    let known = upstream.known_size();
    let resolve = |bound: isize| {
        if bound >= 0 {
            Some(bound.unsigned_abs())
        } else {
            known.map(|size| resolve_bound(bound, size))
        }
    };
    let stream = match &point {
        SplicePoint::Before(index) => resolve(*index).map(StreamPoint::Before),
        SplicePoint::At(index) if *index >= 0 => Some(StreamPoint::At(index.unsigned_abs())),
        SplicePoint::At(index) => known.map(|size| {
            // An index before the start is never reached.
            StreamPoint::At(size.checked_sub(index.unsigned_abs()).unwrap_or(usize::MAX))
        }),
        SplicePoint::Range(start, end) => match (resolve(*start), resolve(*end)) {
            (Some(start), Some(end)) => Some(StreamPoint::Range(start, end.max(start))),
            _ => None,
        },
        SplicePoint::FirstWhere(p) => Some(StreamPoint::FirstWhere(Arc::clone(p))),
        SplicePoint::LastWhere(_) => None,
    };
    match stream {
        Some(point) => Box::new(SpliceIter {
            upstream,
            point,
            insertion,
            size_preserving,
            pos: 0,
            peeked: None,
            phase: Phase::Head,
        }),
        None => {
            let size_hint = if size_preserving { known } else { None };
            Box::new(BufferedIter::new(upstream, size_hint, move |list: ArcList<E>| {
                let insertion = match insertion {
                    IterInsertion::Nothing => Insertion::Nothing,
                    IterInsertion::Fixed(iter) => {
                        Insertion::Fixed(Arc::new(CachedIteratorList::from_iter("splice", iter)))
                    }
                    IterInsertion::Expand(expand) => Insertion::Expand(expand),
                };
                let list = SpliceList::new(list, point, insertion, size_preserving);
                Arc::new(list).materialize_iterator()
            }))
        }
    }
}

/// Expansion producing the single mapped element.
fn map_one<E, F>(f: F) -> Mapper<E, ArcList<E>>
where
    E: SeqBound,
    F: Fn(&E) -> E + Send + Sync + 'static,
{
    mapper(move |e: &E| singleton(f(e)))
}

/// Expansion producing the sub-sequence returned by `f`.
fn expand_with<E, I, F>(f: F) -> Mapper<E, ArcList<E>>
where
    E: SeqBound,
    I: Into<ListSequence<E>>,
    F: Fn(&E) -> I + Send + Sync + 'static,
{
    mapper(move |e: &E| list_of(f(e)))
}

impl<E: SeqBound> ListSequence<E> {
    fn splice(
        &self,
        point: SplicePoint<E>,
        insertion: Insertion<E>,
        size_preserving: bool,
    ) -> Self {
        ListSequence::from_materializer(SpliceList::new(
            Arc::clone(&self.list),
            point,
            insertion,
            size_preserving,
        ))
    }

    /// Insert `elements` before position `index` (negative counts from the end).
    ///
    /// Inserting at the size appends; a position past the end leaves the
    /// sequence unchanged.
    ///
    /// # Example
    /// ```
    /// use ironseq::ListSequence;
    ///
    /// let letters = ListSequence::from_vec(vec!['a', 'd']);
    /// assert_eq!(letters.insert_at(1, vec!['b', 'c']).to_vec()?, vec!['a', 'b', 'c', 'd']);
    /// assert_eq!(letters.insert_at(5, vec!['z']).to_vec()?, vec!['a', 'd']);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn insert_at(&self, index: isize, elements: impl Into<ListSequence<E>>) -> Self {
        self.splice(SplicePoint::Before(index), Insertion::Fixed(list_of(elements)), false)
    }

    /// Remove the element at `index` (negative counts from the end).
    #[must_use]
    pub fn remove_at(&self, index: isize) -> Self {
        self.splice(SplicePoint::At(index), Insertion::Nothing, false)
    }

    /// Remove the elements in `[start, end)`.
    #[must_use]
    pub fn remove_slice(&self, start: isize, end: isize) -> Self {
        self.splice(SplicePoint::Range(start, end), Insertion::Nothing, false)
    }

    /// Remove the first element matching `p`.
    #[must_use]
    pub fn remove_first_where<P>(&self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.splice(SplicePoint::FirstWhere(predicate(p)), Insertion::Nothing, false)
    }

    /// Remove the last element matching `p`. Materializes the upstream size.
    #[must_use]
    pub fn remove_last_where<P>(&self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.splice(SplicePoint::LastWhere(predicate(p)), Insertion::Nothing, false)
    }

    /// Replace the element at `index` with `value`.
    #[must_use]
    pub fn replace_at(&self, index: isize, value: E) -> Self {
        self.splice(SplicePoint::At(index), Insertion::Fixed(singleton(value)), true)
    }

    /// Replace the elements in `[start, end)` with `elements`.
    #[must_use]
    pub fn replace_slice(
        &self,
        start: isize,
        end: isize,
        elements: impl Into<ListSequence<E>>,
    ) -> Self {
        self.splice(SplicePoint::Range(start, end), Insertion::Fixed(list_of(elements)), false)
    }

    /// Replace the first element matching `p` with `elements`.
    #[must_use]
    pub fn replace_first_where<P>(&self, p: P, elements: impl Into<ListSequence<E>>) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        let insertion = Insertion::Fixed(list_of(elements));
        self.splice(SplicePoint::FirstWhere(predicate(p)), insertion, false)
    }

    /// Replace the last element matching `p` with `elements`.
    #[must_use]
    pub fn replace_last_where<P>(&self, p: P, elements: impl Into<ListSequence<E>>) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        let insertion = Insertion::Fixed(list_of(elements));
        self.splice(SplicePoint::LastWhere(predicate(p)), insertion, false)
    }

    /// Map only the element at position `n`.
    #[must_use]
    pub fn map_after<F>(&self, n: usize, f: F) -> Self
    where
        F: Fn(&E) -> E + Send + Sync + 'static,
    {
        self.splice(SplicePoint::At(count_bound(n)), Insertion::Expand(map_one(f)), true)
    }

    /// Map only the first element matching `p`.
    #[must_use]
    pub fn map_first_where<P, F>(&self, p: P, f: F) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
        F: Fn(&E) -> E + Send + Sync + 'static,
    {
        self.splice(SplicePoint::FirstWhere(predicate(p)), Insertion::Expand(map_one(f)), true)
    }

    /// Map only the last element matching `p`.
    #[must_use]
    pub fn map_last_where<P, F>(&self, p: P, f: F) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
        F: Fn(&E) -> E + Send + Sync + 'static,
    {
        self.splice(SplicePoint::LastWhere(predicate(p)), Insertion::Expand(map_one(f)), true)
    }

    /// Replace the element at position `n` with its expansion.
    #[must_use]
    pub fn flat_map_after<I, F>(&self, n: usize, f: F) -> Self
    where
        I: Into<ListSequence<E>>,
        F: Fn(&E) -> I + Send + Sync + 'static,
    {
        self.splice(SplicePoint::At(count_bound(n)), Insertion::Expand(expand_with(f)), false)
    }

    /// Replace the first element matching `p` with its expansion.
    #[must_use]
    pub fn flat_map_first_where<P, I, F>(&self, p: P, f: F) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
        I: Into<ListSequence<E>>,
        F: Fn(&E) -> I + Send + Sync + 'static,
    {
        self.splice(SplicePoint::FirstWhere(predicate(p)), Insertion::Expand(expand_with(f)), false)
    }

    #[must_use]
    pub fn flat_map_last_where<P, I, F>(&self, p: P, f: F) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
        I: Into<ListSequence<E>>,
        F: Fn(&E) -> I + Send + Sync + 'static,
    {
        self.splice(SplicePoint::LastWhere(predicate(p)), Insertion::Expand(expand_with(f)), false)
    }
}

impl<E: SeqBound + PartialEq> ListSequence<E> {
    /// Remove the first element equal to `value`.
    #[must_use]
    pub fn remove_first(&self, value: E) -> Self {
        self.splice(SplicePoint::FirstWhere(equal_to(value)), Insertion::Nothing, false)
    }

    /// Remove the last element equal to `value`.
    #[must_use]
    pub fn remove_last(&self, value: E) -> Self {
        self.splice(SplicePoint::LastWhere(equal_to(value)), Insertion::Nothing, false)
    }
}

impl<E: SeqBound> IteratorSequence<E> {
    fn splice(
        self,
        point: SplicePoint<E>,
        insertion: IterInsertion<E>,
        size_preserving: bool,
    ) -> Self {
        IteratorSequence::from_boxed(splice_iter(self.iter, point, insertion, size_preserving))
    }

    /// Insert `elements` before position `index`; see [`ListSequence::insert_at`].
    #[must_use]
    pub fn insert_at(self, index: isize, elements: impl Into<IteratorSequence<E>>) -> Self {
        self.splice(SplicePoint::Before(index), IterInsertion::Fixed(iter_of(elements)), false)
    }

    /// Remove the element at `index`.
    ///
    /// A negative `index` needs the size: it streams when the upstream knows it and
    /// buffers otherwise.
    #[must_use]
    pub fn remove_at(self, index: isize) -> Self {
        self.splice(SplicePoint::At(index), IterInsertion::Nothing, false)
    }

    /// Remove the elements in `[start, end)`; see [`ListSequence::remove_slice`].
    #[must_use]
    pub fn remove_slice(self, start: isize, end: isize) -> Self {
        self.splice(SplicePoint::Range(start, end), IterInsertion::Nothing, false)
    }

    /// Remove the first element matching `p`.
    #[must_use]
    pub fn remove_first_where<P>(self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.splice(SplicePoint::FirstWhere(predicate(p)), IterInsertion::Nothing, false)
    }

    /// Remove the last element matching `p`. Buffers the whole upstream.
    #[must_use]
    pub fn remove_last_where<P>(self, p: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.splice(SplicePoint::LastWhere(predicate(p)), IterInsertion::Nothing, false)
    }

    /// Replace the element at `index` with `value`; the size is unchanged.
    #[must_use]
    pub fn replace_at(self, index: isize, value: E) -> Self {
        let value = IteratorSequence::of(value).iter;
        self.splice(SplicePoint::At(index), IterInsertion::Fixed(value), true)
    }

    /// Replace the elements in `[start, end)` with `elements`.
    ///
    /// # Arguments
    /// - `start`, `end`: bounds, each counted from the end when negative.
    /// - `elements`: pulled only once the range is reached.
    ///
    /// # Returns
    /// The spliced sequence. A `start` past the end leaves it unchanged and a
    /// `start` equal to the size appends.
    ///
    /// # Example
    /// ```
    /// use ironseq::IteratorSequence;
    ///
    /// let digits = IteratorSequence::from_iterator(0..6).replace_slice(1, -2, vec![9]);
    /// assert_eq!(digits.to_vec()?, vec![0, 9, 4, 5]);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn replace_slice(
        self,
        start: isize,
        end: isize,
        elements: impl Into<IteratorSequence<E>>,
    ) -> Self {
        self.splice(SplicePoint::Range(start, end), IterInsertion::Fixed(iter_of(elements)), false)
    }

    #[must_use]
    pub fn replace_first_where<P>(self, p: P, elements: impl Into<IteratorSequence<E>>) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        let insertion = IterInsertion::Fixed(iter_of(elements));
        self.splice(SplicePoint::FirstWhere(predicate(p)), insertion, false)
    }

    /// Replace the last element matching `p`. Buffers the whole upstream.
    #[must_use]
    pub fn replace_last_where<P>(self, p: P, elements: impl Into<IteratorSequence<E>>) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        let insertion = IterInsertion::Fixed(iter_of(elements));
        self.splice(SplicePoint::LastWhere(predicate(p)), insertion, false)
    }

    /// Map only the element at position `n`.
    ///
    /// # Example
    /// ```
    /// use ironseq::IteratorSequence;
    ///
    /// let bumped = IteratorSequence::from_vec(vec![1, 2, 3]).map_after(1, |n: &i32| n * 10);
    /// assert_eq!(bumped.to_vec()?, vec![1, 20, 3]);
    /// # Ok::<(), ironseq::SequenceError>(())
    /// ```
    #[must_use]
    pub fn map_after<F>(self, n: usize, f: F) -> Self
    where
        F: Fn(&E) -> E + Send + Sync + 'static,
    {
        self.splice(SplicePoint::At(count_bound(n)), IterInsertion::Expand(map_one(f)), true)
    }

    /// Map only the first element matching `p`.
    #[must_use]
    pub fn map_first_where<P, F>(self, p: P, f: F) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
        F: Fn(&E) -> E + Send + Sync + 'static,
    {
        self.splice(SplicePoint::FirstWhere(predicate(p)), IterInsertion::Expand(map_one(f)), true)
    }

    #[must_use]
    pub fn map_last_where<P, F>(self, p: P, f: F) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
        F: Fn(&E) -> E + Send + Sync + 'static,
    {
        self.splice(SplicePoint::LastWhere(predicate(p)), IterInsertion::Expand(map_one(f)), true)
    }

    /// Replace the element at position `n` with its expansion.
    #[must_use]
    pub fn flat_map_after<I, F>(self, n: usize, f: F) -> Self
    where
        I: Into<ListSequence<E>>,
        F: Fn(&E) -> I + Send + Sync + 'static,
    {
        self.splice(SplicePoint::At(count_bound(n)), IterInsertion::Expand(expand_with(f)), false)
    }

    #[must_use]
    pub fn flat_map_first_where<P, I, F>(self, p: P, f: F) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
        I: Into<ListSequence<E>>,
        F: Fn(&E) -> I + Send + Sync + 'static,
    {
        let insertion = IterInsertion::Expand(expand_with(f));
        self.splice(SplicePoint::FirstWhere(predicate(p)), insertion, false)
    }

    /// Replace the last element matching `p` with its expansion. Buffers the whole upstream.
    #[must_use]
    pub fn flat_map_last_where<P, I, F>(self, p: P, f: F) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
        I: Into<ListSequence<E>>,
        F: Fn(&E) -> I + Send + Sync + 'static,
    {
        let insertion = IterInsertion::Expand(expand_with(f));
        self.splice(SplicePoint::LastWhere(predicate(p)), insertion, false)
    }
}

impl<E: SeqBound + PartialEq> IteratorSequence<E> {
    /// Remove the first element equal to `value`.
    #[must_use]
    pub fn remove_first(self, value: E) -> Self {
        self.splice(SplicePoint::FirstWhere(equal_to(value)), IterInsertion::Nothing, false)
    }

    /// Remove the last element equal to `value`. Buffers the whole upstream.
    #[must_use]
    pub fn remove_last(self, value: E) -> Self {
        self.splice(SplicePoint::LastWhere(equal_to(value)), IterInsertion::Nothing, false)
    }
}
