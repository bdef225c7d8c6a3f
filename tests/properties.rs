//! Property-based checks of the structural operators against a `Vec` model.

use ironseq::{IteratorSequence, ListSequence};
use proptest::prelude::*;

fn model_bound(bound: isize, len: usize) -> usize {
    if bound >= 0 {
        (bound as usize).min(len)
    } else {
        len.saturating_sub(bound.unsigned_abs())
    }
}

fn model_slice(elements: &[i32], start: isize, end: isize) -> Vec<i32> {
    let start = model_bound(start, elements.len());
    let end = model_bound(end, elements.len());
    if start >= end {
        Vec::new()
    } else {
        elements[start..end].to_vec()
    }
}

fn model_windows(elements: &[i32], size: usize, step: usize) -> Vec<Vec<i32>> {
    let mut windows = Vec::new();
    let mut start = 0;
    while start < elements.len() {
        let end = (start + size).min(elements.len());
        windows.push(elements[start..end].to_vec());
        if end == elements.len() {
            break;
        }
        start += step;
    }
    windows
}

fn model_position(index: isize, len: usize) -> Option<usize> {
    if index >= 0 {
        Some(index as usize).filter(|i| *i < len)
    } else {
        len.checked_sub(index.unsigned_abs())
    }
}

/// Replace `[start, end)` with `inserted`; a start past the end leaves the
/// elements unchanged.
fn model_splice(elements: &[i32], start: usize, end: usize, inserted: &[i32]) -> Vec<i32> {
    if start > elements.len() {
        return elements.to_vec();
    }
    let end = end.max(start).min(elements.len());
    let mut spliced = elements[..start].to_vec();
    spliced.extend_from_slice(inserted);
    spliced.extend_from_slice(&elements[end..]);
    spliced
}

/// A splice bound: non-negative as is, negative counted from the end.
fn model_splice_bound(bound: isize, len: usize) -> usize {
    if bound >= 0 {
        bound as usize
    } else {
        len.saturating_sub(bound.unsigned_abs())
    }
}

fn sized_iter(elements: &[i32]) -> IteratorSequence<i32> {
    IteratorSequence::from_vec(elements.to_vec())
}

fn unsized_iter(elements: &[i32]) -> IteratorSequence<i32> {
    IteratorSequence::from_iterator(elements.to_vec().into_iter().filter(|_| true))
}

proptest! {
    /// Slicing agrees with the model for every mix of relative bounds.
    #[test]
    fn slice_matches_model(
        elements in prop::collection::vec(-50i32..50, 0..12),
        start in -15isize..15,
        end in -15isize..15,
    ) {
        let expected = model_slice(&elements, start, end);
        let listed = ListSequence::from_vec(elements.clone()).slice(start, end);
        prop_assert_eq!(listed.to_vec().unwrap(), expected.clone());
        prop_assert_eq!(listed.len().unwrap(), expected.len());
        let pulled = IteratorSequence::from_vec(elements).slice(start, end);
        prop_assert_eq!(pulled.to_vec().unwrap(), expected);
    }

    /// Negative bounds give the same answer whether or not the size is known up front.
    #[test]
    fn hidden_sizes_do_not_change_slices(
        elements in prop::collection::vec(0i32..10, 0..12),
        start in -15isize..15,
        end in -15isize..15,
    ) {
        let expected = model_slice(&elements, start, end);
        let hidden = IteratorSequence::from_iterator(elements.into_iter().filter(|_| true))
            .slice(start, end);
        prop_assert_eq!(hidden.to_vec().unwrap(), expected);
    }

    #[test]
    fn reverse_matches_model(elements in prop::collection::vec(any::<i32>(), 0..20)) {
        let mut expected = elements.clone();
        expected.reverse();
        let listed = ListSequence::from_vec(elements.clone()).reverse();
        prop_assert_eq!(listed.to_vec().unwrap(), expected.clone());
        prop_assert_eq!(IteratorSequence::from_vec(elements).reverse().to_vec().unwrap(), expected);
    }

    /// `take_right` and `drop_right` partition the sequence.
    #[test]
    fn right_end_operators_partition(
        elements in prop::collection::vec(any::<i32>(), 0..20),
        count in 0usize..25,
    ) {
        let split = elements.len().saturating_sub(count);
        let list = ListSequence::from_vec(elements.clone());
        prop_assert_eq!(list.take_right(count).to_vec().unwrap(), elements[split..].to_vec());
        prop_assert_eq!(list.drop_right(count).to_vec().unwrap(), elements[..split].to_vec());
        let iter = || IteratorSequence::from_vec(elements.clone());
        prop_assert_eq!(iter().take_right(count).to_vec().unwrap(), elements[split..].to_vec());
        prop_assert_eq!(iter().drop_right(count).to_vec().unwrap(), elements[..split].to_vec());
    }

    #[test]
    fn windows_match_model(
        elements in prop::collection::vec(any::<i32>(), 0..20),
        size in 1usize..6,
        step in 1usize..6,
    ) {
        let expected = model_windows(&elements, size, step);
        let listed = ListSequence::from_vec(elements.clone()).window(size, step).unwrap();
        prop_assert_eq!(listed.known_size(), Some(expected.len()));
        prop_assert_eq!(listed.to_vec().unwrap(), expected.clone());
        let pulled = IteratorSequence::from_vec(elements).window(size, step).unwrap();
        prop_assert_eq!(pulled.to_vec().unwrap(), expected);
    }

    /// Random access in any order sees the same elements as a front-to-back walk.
    #[test]
    fn access_order_does_not_matter(
        elements in prop::collection::vec(0i32..100, 1..20),
        indices in prop::collection::vec(0usize..40, 1..20),
    ) {
        let evens = ListSequence::from_vec(elements.clone()).filter(|n: &i32| n % 2 == 0);
        let expected: Vec<i32> = elements.into_iter().filter(|n| n % 2 == 0).collect();
        for index in indices {
            match expected.get(index) {
                Some(value) => prop_assert_eq!(evens.get(index).unwrap(), *value),
                None => prop_assert!(!evens.has_index(index).unwrap()),
            }
        }
        prop_assert_eq!(evens.to_vec().unwrap(), expected);
    }

    /// Range splices agree across the list form, the streaming iterator
    /// form and the buffered iterator form.
    #[test]
    fn range_splices_match_model(
        elements in prop::collection::vec(0i32..50, 0..8),
        start in -10isize..10,
        end in -10isize..10,
        inserted in prop::collection::vec(100i32..200, 0..3),
    ) {
        let len = elements.len();
        let (from, to) = (model_splice_bound(start, len), model_splice_bound(end, len));
        let replaced = model_splice(&elements, from, to, &inserted);
        let removed = model_splice(&elements, from, to, &[]);

        let list = ListSequence::from_vec(elements.clone());
        prop_assert_eq!(
            list.replace_slice(start, end, inserted.clone()).to_vec().unwrap(),
            replaced.clone()
        );
        prop_assert_eq!(list.remove_slice(start, end).to_vec().unwrap(), removed.clone());
        prop_assert_eq!(
            IteratorSequence::from_vec(elements.clone())
                .replace_slice(start, end, inserted.clone())
                .to_vec()
                .unwrap(),
            replaced.clone()
        );
        prop_assert_eq!(
            IteratorSequence::from_vec(elements.clone()).remove_slice(start, end).to_vec().unwrap(),
            removed.clone()
        );
        prop_assert_eq!(
            unsized_iter(&elements).replace_slice(start, end, inserted).to_vec().unwrap(),
            replaced
        );
        prop_assert_eq!(
            unsized_iter(&elements).remove_slice(start, end).to_vec().unwrap(),
            removed
        );
    }

    #[test]
    fn point_splices_match_model(
        elements in prop::collection::vec(0i32..50, 0..8),
        index in -10isize..10,
        inserted in prop::collection::vec(100i32..200, 0..3),
    ) {
        let len = elements.len();
        let before = model_splice_bound(index, len);
        let with_insert = model_splice(&elements, before, before, &inserted);
        let (without, replaced) = match model_position(index, len) {
            Some(at) => (
                model_splice(&elements, at, at + 1, &[]),
                model_splice(&elements, at, at + 1, &[-1]),
            ),
            None => (elements.clone(), elements.clone()),
        };

        let list = ListSequence::from_vec(elements.clone());
        prop_assert_eq!(
            list.insert_at(index, inserted.clone()).to_vec().unwrap(),
            with_insert.clone()
        );
        prop_assert_eq!(list.remove_at(index).to_vec().unwrap(), without.clone());
        prop_assert_eq!(list.replace_at(index, -1).to_vec().unwrap(), replaced.clone());
        let makers: [fn(&[i32]) -> IteratorSequence<i32>; 2] = [sized_iter, unsized_iter];
        for make in makers {
            prop_assert_eq!(
                make(&elements).insert_at(index, inserted.clone()).to_vec().unwrap(),
                with_insert.clone()
            );
            prop_assert_eq!(make(&elements).remove_at(index).to_vec().unwrap(), without.clone());
            prop_assert_eq!(
                make(&elements).replace_at(index, -1).to_vec().unwrap(),
                replaced.clone()
            );
        }
    }

    #[test]
    fn map_after_touches_one_element(
        elements in prop::collection::vec(0i32..50, 0..8),
        n in 0usize..10,
    ) {
        let mut expected = elements.clone();
        if let Some(element) = expected.get_mut(n) {
            *element += 1000;
        }
        let list = ListSequence::from_vec(elements.clone());
        prop_assert_eq!(list.map_after(n, |e: &i32| e + 1000).to_vec().unwrap(), expected.clone());
        prop_assert_eq!(
            IteratorSequence::from_vec(elements).map_after(n, |e: &i32| e + 1000).to_vec().unwrap(),
            expected
        );
    }

    /// Counting never scans past what the size already tells, and never overflows.
    #[test]
    fn counts_of_offset_sequences_match_model(
        elements in prop::collection::vec(0i32..50, 0..12),
        n in 0usize..15,
    ) {
        let dropped = elements.len().saturating_sub(n);
        let leading_small = elements.iter().take_while(|e| **e < 25).count();
        let list = ListSequence::from_vec(elements.clone());
        prop_assert_eq!(list.drop(n).count().get(0).unwrap(), dropped);
        prop_assert_eq!(list.filter(|e: &i32| *e >= 0).drop(n).count().get(0).unwrap(), dropped);
        prop_assert_eq!(list.drop(n).iter().count().to_vec().unwrap(), vec![dropped]);
        prop_assert_eq!(
            list.drop_while(|e: &i32| *e < 25).iter().count().to_vec().unwrap(),
            vec![elements.len() - leading_small]
        );
        prop_assert_eq!(unsized_iter(&elements).drop(n).count().to_vec().unwrap(), vec![dropped]);
    }
}
