use ironseq::testing::*;
use ironseq::{IteratorSequence, ListSequence};

fn digits() -> ListSequence<i32> {
    ListSequence::from_vec((0..7).collect())
}

fn digit_iter() -> IteratorSequence<i32> {
    IteratorSequence::from_vec((0..7).collect())
}

#[test]
fn slice_maps_indices_into_the_upstream() -> anyhow::Result<()> {
    let slice = digits().slice(2, 5);
    assert_eq!(slice.get(0)?, 2);
    assert_eq!(slice.get(2)?, 4);
    assert!(!slice.has_index(3)?);
    assert_error_kind(&slice.get(3), "IndexOutOfBounds");
    assert_sequence_yields(&slice, &[2, 3, 4])?;
    Ok(())
}

#[test]
fn negative_bounds_resolve_against_the_size() -> anyhow::Result<()> {
    let relative = digits().slice(-3, -1);
    let absolute = digits().slice(4, 6);
    assert_eq!(relative.to_vec()?, absolute.to_vec()?);
    assert_sequence_yields(&relative, &[4, 5])?;

    // Same resolution when the size has to be discovered.
    let counted = CountingList::new((0..7).collect::<Vec<_>>()).with_unknown_size();
    let hidden = ListSequence::from_materializer(counted);
    assert_eq!(hidden.known_size(), None);
    assert_sequence_yields(&hidden.slice(-3, -1), &[4, 5])?;

    assert_iterator_yields(digit_iter().slice(-3, -1), &[4, 5])?;
    let unsized_iter = IteratorSequence::from_iterator(0..7).filter(|_: &i32| true);
    assert_iterator_yields(unsized_iter.slice(-3, -1), &[4, 5])?;
    Ok(())
}

#[test]
fn empty_and_out_of_range_slices() -> anyhow::Result<()> {
    assert_sequence_yields(&digits().slice(5, 2), &[])?;
    assert_sequence_yields(&digits().slice(5, 100), &[5, 6])?;
    assert_sequence_yields(&digits().slice(-100, 2), &[0, 1])?;
    assert_iterator_yields(digit_iter().slice(10, 20), &[])?;
    Ok(())
}

#[test]
fn take_and_drop_from_both_ends() -> anyhow::Result<()> {
    assert_sequence_yields(&digits().take(3), &[0, 1, 2])?;
    assert_sequence_yields(&digits().drop(5), &[5, 6])?;
    assert_sequence_yields(&digits().take_right(2), &[5, 6])?;
    assert_sequence_yields(&digits().drop_right(5), &[0, 1])?;
    assert_sequence_yields(&digits().take_right(0), &[])?;
    assert_sequence_yields(&digits().drop_right(0), &[0, 1, 2, 3, 4, 5, 6])?;

    assert_iterator_yields(digit_iter().take(3), &[0, 1, 2])?;
    assert_iterator_yields(digit_iter().drop(5), &[5, 6])?;
    assert_iterator_yields(digit_iter().take_right(2), &[5, 6])?;
    assert_iterator_yields(digit_iter().drop_right(5), &[0, 1])?;
    assert_iterator_yields(digit_iter().drop_right(10), &[])?;
    Ok(())
}

#[test]
fn while_operators() -> anyhow::Result<()> {
    let values = ListSequence::from_vec(vec![1, 2, 5, 1, 7, 8]);
    assert_sequence_yields(&values.take_while(|n: &i32| *n < 3), &[1, 2])?;
    assert_sequence_yields(&values.drop_while(|n: &i32| *n < 3), &[5, 1, 7, 8])?;
    assert_sequence_yields(&values.take_right_while(|n: &i32| *n > 3), &[7, 8])?;
    assert_sequence_yields(&values.drop_right_while(|n: &i32| *n > 3), &[1, 2, 5, 1])?;
    assert_sequence_yields(&values.drop_while(|_: &i32| true), &[])?;

    let iter = || IteratorSequence::from_vec(vec![1, 2, 5, 1, 7, 8]);
    assert_iterator_yields(iter().take_while(|n: &i32| *n < 3), &[1, 2])?;
    assert_iterator_yields(iter().drop_while(|n: &i32| *n < 3), &[5, 1, 7, 8])?;
    assert_iterator_yields(iter().take_right_while(|n: &i32| *n > 3), &[7, 8])?;
    assert_iterator_yields(iter().drop_right_while(|n: &i32| *n > 3), &[1, 2, 5, 1])?;
    Ok(())
}

#[test]
fn filtering() -> anyhow::Result<()> {
    let values = ListSequence::from_vec(vec![3, 1, 4, 1, 5, 9, 2, 6]);
    let even = values.filter(|n: &i32| n % 2 == 0);
    assert_eq!(even.get(1)?, 2);
    assert_sequence_yields(&even, &[4, 2, 6])?;
    assert_sequence_yields(&values.remove_where(|n: &i32| *n > 3), &[3, 1, 1, 2])?;
    assert_sequence_yields(&values.remove_all(1), &[3, 4, 5, 9, 2, 6])?;

    let failing = values.try_filter(|n: &i32| {
        anyhow::ensure!(*n != 9, "nine is not allowed");
        Ok(*n > 4)
    });
    assert_eq!(failing.get(0)?, 5);
    assert_error_kind(&failing.get(1), "Callback");

    let iter = IteratorSequence::from_vec(vec![3, 1, 4, 1, 5]);
    assert_iterator_yields(iter.remove_all(1), &[3, 4, 5])?;
    Ok(())
}

#[test]
fn insertion() -> anyhow::Result<()> {
    let letters = ListSequence::from_vec(vec!['a', 'd']);
    assert_sequence_yields(&letters.insert_at(1, vec!['b', 'c']), &['a', 'b', 'c', 'd'])?;
    assert_sequence_yields(&letters.insert_at(0, vec!['z']), &['z', 'a', 'd'])?;
    assert_sequence_yields(&letters.insert_at(2, vec!['e']), &['a', 'd', 'e'])?;
    assert_sequence_yields(&letters.insert_at(-1, vec!['c']), &['a', 'c', 'd'])?;
    assert_sequence_yields(&letters.insert_at(5, vec!['z']), &['a', 'd'])?;

    let iter = || IteratorSequence::from_vec(vec!['a', 'd']);
    assert_iterator_yields(iter().insert_at(1, vec!['b', 'c']), &['a', 'b', 'c', 'd'])?;
    assert_iterator_yields(iter().insert_at(2, vec!['e']), &['a', 'd', 'e'])?;
    assert_iterator_yields(iter().insert_at(5, vec!['z']), &['a', 'd'])?;
    Ok(())
}

#[test]
fn removal_by_position() -> anyhow::Result<()> {
    assert_sequence_yields(&digits().remove_at(0), &[1, 2, 3, 4, 5, 6])?;
    assert_sequence_yields(&digits().remove_at(-1), &[0, 1, 2, 3, 4, 5])?;
    assert_sequence_yields(&digits().remove_at(9), &[0, 1, 2, 3, 4, 5, 6])?;
    assert_sequence_yields(&digits().remove_slice(1, 5), &[0, 5, 6])?;
    assert_sequence_yields(&digits().remove_slice(-2, 100), &[0, 1, 2, 3, 4])?;

    assert_iterator_yields(digit_iter().remove_at(3), &[0, 1, 2, 4, 5, 6])?;
    assert_iterator_yields(digit_iter().remove_at(-1), &[0, 1, 2, 3, 4, 5])?;
    assert_iterator_yields(digit_iter().remove_slice(1, 5), &[0, 5, 6])?;
    Ok(())
}

#[test]
fn removal_by_match() -> anyhow::Result<()> {
    let values = ListSequence::from_vec(vec![1, 2, 1, 2]);
    assert_sequence_yields(&values.remove_first(2), &[1, 1, 2])?;
    assert_sequence_yields(&values.remove_last(1), &[1, 2, 2])?;
    assert_sequence_yields(&values.remove_first_where(|n: &i32| *n > 5), &[1, 2, 1, 2])?;
    assert_sequence_yields(&values.remove_last_where(|n: &i32| *n == 2), &[1, 2, 1])?;

    let iter = || IteratorSequence::from_vec(vec![1, 2, 1, 2]);
    assert_iterator_yields(iter().remove_first(2), &[1, 1, 2])?;
    assert_iterator_yields(iter().remove_last(1), &[1, 2, 2])?;
    Ok(())
}

#[test]
fn append_then_remove_last_restores_the_source() -> anyhow::Result<()> {
    let source = ListSequence::from_vec(vec![4, 5, 6]);
    let appended = source.append_element(9);
    assert_sequence_yields(&appended, &[4, 5, 6, 9])?;
    assert_sequence_yields(&appended.remove_last(9), &[4, 5, 6])?;

    let iter = IteratorSequence::from_vec(vec![4, 5, 6]).append_element(9).remove_last(9);
    assert_iterator_yields(iter, &[4, 5, 6])?;
    Ok(())
}

#[test]
fn replacement() -> anyhow::Result<()> {
    let words = ListSequence::from_vec(vec!["a", "b", "c", "b"]);
    let replaced = words.replace_at(1, "B");
    assert_eq!(replaced.known_size(), Some(4));
    assert_sequence_yields(&replaced, &["a", "B", "c", "b"])?;
    assert_sequence_yields(&words.replace_slice(1, 3, vec!["x"]), &["a", "x", "b"])?;
    assert_sequence_yields(
        &words.replace_first_where(|w: &&str| *w == "b", vec!["y", "z"]),
        &["a", "y", "z", "c", "b"],
    )?;
    assert_sequence_yields(
        &words.replace_last_where(|w: &&str| *w == "b", Vec::new()),
        &["a", "b", "c"],
    )?;

    let iter = || IteratorSequence::from_vec(vec!["a", "b", "c", "b"]);
    assert_iterator_yields(iter().replace_at(-1, "!"), &["a", "b", "c", "!"])?;
    assert_iterator_yields(iter().replace_slice(0, 2, vec!["x"]), &["x", "c", "b"])?;
    assert_iterator_yields(
        iter().replace_last_where(|w: &&str| *w == "b", vec!["q"]),
        &["a", "b", "c", "q"],
    )?;
    Ok(())
}

#[test]
fn concatenation() -> anyhow::Result<()> {
    let both = ListSequence::from_vec(vec![1, 2]).append(vec![3]).prepend_element(0);
    assert_eq!(both.known_size(), Some(4));
    assert_sequence_yields(&both, &[0, 1, 2, 3])?;
    assert_sequence_yields(&ListSequence::from_vec(vec![2]).prepend(vec![0, 1]), &[0, 1, 2])?;

    let iter = IteratorSequence::from_vec(vec![1, 2])
        .append(vec![3])
        .prepend_element(0);
    assert_iterator_yields(iter, &[0, 1, 2, 3])?;
    Ok(())
}

#[test]
fn resize_and_reverse() -> anyhow::Result<()> {
    let short = ListSequence::from_vec(vec![1, 2]);
    assert_sequence_yields(&short.resize(4, 0), &[1, 2, 0, 0])?;
    assert_sequence_yields(&short.resize(1, 0), &[1])?;
    assert_sequence_yields(&digits().reverse(), &[6, 5, 4, 3, 2, 1, 0])?;
    assert_sequence_yields(&ListSequence::<i32>::empty().reverse(), &[])?;

    assert_iterator_yields(IteratorSequence::from_vec(vec![1, 2]).resize(3, 9), &[1, 2, 9])?;
    assert_iterator_yields(digit_iter().reverse().take(2), &[6, 5])?;
    Ok(())
}

#[test]
fn reverse_over_an_unknown_size() -> anyhow::Result<()> {
    let counted = CountingList::new(vec![1, 2, 3]).with_unknown_size();
    let hidden = ListSequence::from_materializer(counted);
    let reversed = hidden.reverse();
    assert_eq!(reversed.known_size(), None);
    assert_eq!(reversed.get(0)?, 3);
    assert_eq!(reversed.known_size(), Some(3));
    assert_sequence_yields(&reversed, &[3, 2, 1])?;
    Ok(())
}

#[test]
fn counting_offset_lists() -> anyhow::Result<()> {
    let numbers = ListSequence::from_vec((0..5).collect::<Vec<i32>>());
    assert_sequence_yields(&numbers.drop(2).count(), &[3])?;
    assert_sequence_yields(&numbers.filter(|n: &i32| *n >= 0).drop(2).count(), &[3])?;
    assert_iterator_yields(numbers.drop(2).iter().count(), &[3])?;
    assert_iterator_yields(numbers.drop_while(|n: &i32| *n < 2).iter().count(), &[3])?;
    assert_sequence_yields(&numbers.drop(2).last_index_of_slice(Vec::<i32>::new()), &[3])?;
    assert_eq!(numbers.drop(2).iter().skip_elements(usize::MAX)?, 3);
    assert!(!numbers.drop(2).has_index(usize::MAX)?);
    assert!(!numbers.drop_while(|n: &i32| *n < 2).has_index(usize::MAX)?);
    assert_error_kind(&numbers.drop(2).get(usize::MAX), "IndexOutOfBounds");

    let counted = CountingList::new(vec![1, 2, 3, 4]).with_unknown_size();
    let hidden = ListSequence::from_materializer(counted);
    assert_eq!(hidden.drop(1).iter().skip_elements(usize::MAX)?, 3);
    assert_eq!(hidden.iter().skip_elements(2)?, 2);
    Ok(())
}

#[test]
fn range_splices_resolve_each_bound_on_its_own() -> anyhow::Result<()> {
    let empty = ListSequence::<i32>::empty();
    assert_sequence_yields(&empty.replace_slice(1, -1, vec![100]), &[])?;
    assert_iterator_yields(IteratorSequence::<i32>::empty().replace_slice(1, -1, vec![100]), &[])?;

    let short = ListSequence::from_vec(vec![0, 1, 2]);
    // A start past the end is never reached, whatever the sign of the end.
    assert_sequence_yields(&short.replace_slice(5, -1, vec![9]), &[0, 1, 2])?;
    assert_sequence_yields(&short.replace_slice(5, 6, vec![9]), &[0, 1, 2])?;
    // A start at the size appends.
    assert_sequence_yields(&short.replace_slice(3, -1, vec![9]), &[0, 1, 2, 9])?;
    assert_sequence_yields(&short.remove_slice(1, -1), &[0, 2])?;

    let streamed = || IteratorSequence::from_vec(vec![0, 1, 2]);
    assert_iterator_yields(streamed().replace_slice(5, -1, vec![9]), &[0, 1, 2])?;
    assert_iterator_yields(streamed().replace_slice(3, -1, vec![9]), &[0, 1, 2, 9])?;

    let buffered = || IteratorSequence::from_iterator(vec![0, 1, 2].into_iter().filter(|_| true));
    assert_iterator_yields(buffered().replace_slice(5, -1, vec![9]), &[0, 1, 2])?;
    assert_iterator_yields(buffered().remove_slice(1, -1), &[0, 2])?;
    Ok(())
}
