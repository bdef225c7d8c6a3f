//! Assertion functions for testing sequence outputs.
//!
//! The sequence assertions pull through the public handles and return the
//! pulling error, so a test can use `?` on them; content mismatches panic
//! with a detailed message the way [`assert_eq!`] does.

use crate::error::{Result, SequenceError};
use crate::sequence::{IteratorSequence, ListSequence, SeqBound};
use std::fmt::Debug;

/// Assert that two collections are equal in order and content.
///
/// # Panics
///
/// Panics if the collections differ in length or content.
///
/// # Example
///
/// ```
/// use ironseq::testing::assert_collections_equal;
///
/// assert_collections_equal(&[1, 2, 3], &[1, 2, 3]);
/// ```
pub fn assert_collections_equal<T: Debug + PartialEq>(actual: &[T], expected: &[T]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Collection length mismatch:\n  Expected length: {}\n  Actual length: {}\n  \
         Expected: {expected:?}\n  Actual: {actual:?}",
        expected.len(),
        actual.len()
    );

    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(
            a, e,
            "Collection mismatch at index {i}:\n  Expected: {e:?}\n  Actual: {a:?}\n  \
             Full expected: {expected:?}\n  Full actual: {actual:?}"
        );
    }
}

/// Assert that a list sequence yields `expected`, both by index and through
/// its sequential view, and that it reports the matching size.
///
/// Index `expected.len()` must not be materializable.
///
/// # Errors
///
/// Returns the first materialization error.
///
/// # Panics
///
/// Panics if the sequence yields anything other than `expected`.
///
/// # Example
///
/// ```
/// use ironseq::ListSequence;
/// use ironseq::testing::assert_sequence_yields;
///
/// let source = ListSequence::from_vec(vec![0, 1, 2, 3, 4, 5, 6]);
/// assert_sequence_yields(&source.slice(2, 5), &[2, 3, 4])?;
/// # Ok::<(), ironseq::SequenceError>(())
/// ```
pub fn assert_sequence_yields<E>(sequence: &ListSequence<E>, expected: &[E]) -> Result<()>
where
    E: SeqBound + Debug + PartialEq,
{
    let mut indexed = Vec::with_capacity(expected.len());
    for index in 0..expected.len() {
        assert!(
            sequence.has_index(index)?,
            "Index {index} is not materializable:\n  Expected: {expected:?}\n  \
             Indexed so far: {indexed:?}"
        );
        indexed.push(sequence.get(index)?);
    }
    assert_collections_equal(&indexed, expected);
    assert!(
        !sequence.has_index(expected.len())?,
        "Sequence has more than {} elements:\n  Expected: {expected:?}",
        expected.len()
    );

    let walked = sequence.iter().to_vec()?;
    assert_collections_equal(&walked, expected);
    assert_eq!(sequence.len()?, expected.len(), "Size mismatch for {expected:?}");
    if let Some(known) = sequence.known_size() {
        assert_eq!(known, expected.len(), "Known size mismatch for {expected:?}");
    }
    Ok(())
}

/// Assert that an iterator sequence yields exactly `expected`, then reports
/// exhaustion with [`SequenceError::NoSuchElement`].
///
/// # Errors
///
/// Returns the first materialization error.
///
/// # Panics
///
/// Panics if the sequence yields anything other than `expected`.
pub fn assert_iterator_yields<E>(mut sequence: IteratorSequence<E>, expected: &[E]) -> Result<()>
where
    E: SeqBound + Debug + PartialEq,
{
    let mut pulled = Vec::with_capacity(expected.len());
    while sequence.has_next()? {
        pulled.push(sequence.next_element()?);
    }
    assert_collections_equal(&pulled, expected);
    assert_error_kind(&sequence.next_element(), "NoSuchElement");
    Ok(())
}

fn kind(err: &SequenceError) -> &'static str {
    match err {
        SequenceError::IndexOutOfBounds { .. } => "IndexOutOfBounds",
        SequenceError::NoSuchElement => "NoSuchElement",
        SequenceError::ConcurrentModification { .. } => "ConcurrentModification",
        SequenceError::Callback(_) => "Callback",
        SequenceError::Overflow => "Overflow",
        SequenceError::InvalidArgument(_) => "InvalidArgument",
    }
}

/// Assert that `result` failed with the [`SequenceError`] variant named `expected`.
///
/// # Panics
///
/// Panics if `result` is `Ok` or failed with another variant.
///
/// # Example
///
/// ```
/// use ironseq::ListSequence;
/// use ironseq::testing::assert_error_kind;
///
/// let source = ListSequence::from_vec(vec![1, 2]);
/// assert_error_kind(&source.get(5), "IndexOutOfBounds");
/// ```
pub fn assert_error_kind<T: Debug>(result: &Result<T>, expected: &str) {
    match result {
        Ok(value) => panic!("Expected a {expected} error, got Ok({value:?})"),
        Err(err) => assert_eq!(
            kind(err),
            expected,
            "Error kind mismatch:\n  Expected: {expected}\n  Actual: {err:?}"
        ),
    }
}
