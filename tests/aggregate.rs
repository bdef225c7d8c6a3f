use ironseq::testing::*;
use ironseq::{IteratorSequence, ListSequence};

#[test]
fn quantifiers_and_counts() -> anyhow::Result<()> {
    let numbers = ListSequence::from_vec(vec![2, 4, 5, 6]);
    assert!(!numbers.all(|n: &i32| n % 2 == 0).get(0)?);
    assert!(numbers.exists(|n: &i32| *n == 5).get(0)?);
    assert!(ListSequence::<i32>::empty().all(|_: &i32| false).get(0)?);
    assert!(!ListSequence::<i32>::empty().exists(|_: &i32| true).get(0)?);

    assert_sequence_yields(&numbers.count(), &[4])?;
    assert_sequence_yields(&numbers.count_where(|n: &i32| n % 2 == 0), &[3])?;
    assert_sequence_yields(&numbers.count_not(|n: &i32| n % 2 == 0), &[1])?;

    let iter = || IteratorSequence::from_vec(vec![2, 4, 5, 6]);
    assert_iterator_yields(iter().all(|n: &i32| *n > 1), &[true])?;
    assert_iterator_yields(iter().exists(|n: &i32| *n > 10), &[false])?;
    assert_iterator_yields(iter().count(), &[4])?;
    let tens = IteratorSequence::from_iterator(0..100).filter(|n: &i32| n % 10 == 0);
    assert_iterator_yields(tens.count(), &[10])?;
    Ok(())
}

#[test]
fn quantifiers_stop_early() -> anyhow::Result<()> {
    let source = CountingList::new(vec![1, 2, 3, 4, 5]);
    let pulls = source.counter();
    let found = ListSequence::from_materializer(source).exists(|n: &i32| *n == 2);
    assert_eq!(pulls.get(), 0);
    assert!(found.get(0)?);
    assert_eq!(pulls.get(), 2);
    assert!(found.get(0)?);
    assert_eq!(pulls.get(), 2);
    Ok(())
}

#[test]
fn element_searches() -> anyhow::Result<()> {
    let values = ListSequence::from_vec(vec![5, 3, 8, 3, 9]);
    assert_sequence_yields(&values.find_first(|n: &i32| *n > 4), &[5])?;
    assert_sequence_yields(&values.find_last(|n: &i32| *n < 9), &[3])?;
    assert_sequence_yields(&values.find_first(|n: &i32| *n > 100), &[])?;
    assert_sequence_yields(&values.index_of(3), &[1])?;
    assert_sequence_yields(&values.last_index_of(3), &[3])?;
    assert_sequence_yields(&values.index_of(42), &[])?;
    assert_sequence_yields(&values.index_where(|n: &i32| *n > 7), &[2])?;
    assert_sequence_yields(&values.last_index_where(|n: &i32| *n > 7), &[4])?;

    let iter = || IteratorSequence::from_vec(vec![5, 3, 8, 3, 9]);
    assert_iterator_yields(iter().index_of(3), &[1])?;
    assert_iterator_yields(iter().last_index_of(3), &[3])?;
    assert_iterator_yields(iter().find_last(|n: &i32| *n == 7), &[])?;
    Ok(())
}

#[test]
fn containment() -> anyhow::Result<()> {
    let letters = ListSequence::from_vec(vec!['a', 'b', 'c', 'd']);
    assert!(letters.includes('c').get(0)?);
    assert!(!letters.includes('z').get(0)?);
    assert!(letters.includes_all(['d', 'a']).get(0)?);
    assert!(!letters.includes_all(['d', 'z']).get(0)?);
    assert!(letters.includes_all(Vec::<char>::new()).get(0)?);
    assert!(letters.includes_slice(vec!['b', 'c']).get(0)?);
    assert!(!letters.includes_slice(vec!['c', 'b']).get(0)?);

    let iter = || IteratorSequence::from_vec(vec!['a', 'b', 'c', 'd']);
    assert_iterator_yields(iter().includes('b'), &[true])?;
    assert_iterator_yields(iter().includes_all(['c', 'b']), &[true])?;
    assert_iterator_yields(iter().includes_slice(vec!['c', 'd']), &[true])?;
    Ok(())
}

#[test]
fn slice_searches() -> anyhow::Result<()> {
    let numbers = ListSequence::from_vec(vec![1, 2, 3, 2, 3, 4]);
    assert_sequence_yields(&numbers.index_of_slice(vec![2, 3, 4]), &[3])?;
    assert_sequence_yields(&numbers.index_of_slice(vec![2, 3]), &[1])?;
    assert_sequence_yields(&numbers.last_index_of_slice(vec![2, 3]), &[3])?;
    assert_sequence_yields(&numbers.index_of_slice(vec![4, 5]), &[])?;

    let pairs = ListSequence::from_vec(vec![1, 2, 1, 2]);
    assert_sequence_yields(&pairs.last_index_of_slice(vec![1, 2]), &[2])?;

    let iter = IteratorSequence::from_vec(vec![1, 2, 3, 2, 3, 4]);
    assert_iterator_yields(iter.index_of_slice(vec![2, 3, 4]), &[3])?;
    let iter = IteratorSequence::from_vec(vec![1, 2, 1, 2]);
    assert_iterator_yields(iter.last_index_of_slice(vec![1, 2]), &[2])?;
    Ok(())
}

#[test]
fn prefix_and_suffix() -> anyhow::Result<()> {
    let word = ListSequence::chars("sequence");
    assert!(word.starts_with(ListSequence::chars("seq")).get(0)?);
    assert!(!word.starts_with(ListSequence::chars("sequences")).get(0)?);
    assert!(word.ends_with(ListSequence::chars("ence")).get(0)?);
    assert!(!word.ends_with(ListSequence::chars("xsequence")).get(0)?);
    assert!(word.starts_with(Vec::<char>::new()).get(0)?);

    let prefixed = IteratorSequence::chars("sequence").starts_with(vec!['s', 'e']);
    assert_iterator_yields(prefixed, &[true])?;
    assert_iterator_yields(IteratorSequence::chars("sequence").ends_with(vec!['c', 'e']), &[true])?;
    assert_iterator_yields(IteratorSequence::chars("ab").ends_with(vec!['x', 'a', 'b']), &[false])?;
    Ok(())
}

#[test]
fn results_compose_with_other_operators() -> anyhow::Result<()> {
    let numbers = ListSequence::from_vec(vec![3, 1, 2]);
    let shifted = numbers.index_of(2).flat_map(|i: &usize| vec![*i, *i + 1]);
    assert_sequence_yields(&shifted, &[2, 3])?;
    let total = numbers.count().append(numbers.count_where(|n: &i32| *n > 1));
    assert_sequence_yields(&total, &[3, 2])?;
    Ok(())
}
