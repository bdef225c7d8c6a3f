use anyhow::anyhow;
use ironseq::testing::*;
use ironseq::{IteratorSequence, ListSequence, SequenceError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct Rejected(i32);

impl std::fmt::Display for Rejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rejected {}", self.0)
    }
}

impl std::error::Error for Rejected {}

#[test]
fn map_variants() -> anyhow::Result<()> {
    let numbers = ListSequence::from_vec(vec![1, 2, 3, 4]);
    assert_sequence_yields(&numbers.map(|n: &i32| n * 10), &[10, 20, 30, 40])?;
    let negated = numbers.map_where(|n: &i32| n % 2 == 0, |n: &i32| -n);
    assert_sequence_yields(&negated, &[1, -2, 3, -4])?;
    assert_sequence_yields(&numbers.map_after(2, |n: &i32| n + 100), &[1, 2, 103, 4])?;
    assert_sequence_yields(&numbers.map_after(9, |n: &i32| n + 100), &[1, 2, 3, 4])?;
    assert_sequence_yields(&numbers.map_first_where(|n: &i32| *n > 1, |_: &i32| 0), &[1, 0, 3, 4])?;
    assert_sequence_yields(&numbers.map_last_where(|n: &i32| *n < 4, |_: &i32| 0), &[1, 2, 0, 4])?;

    let iter = || IteratorSequence::from_vec(vec![1, 2, 3, 4]);
    let expected = ["1".to_string(), "2".into(), "3".into(), "4".into()];
    assert_iterator_yields(iter().map(|n: &i32| n.to_string()), &expected)?;
    assert_iterator_yields(iter().map_after(0, |n: &i32| n * 7), &[7, 2, 3, 4])?;
    assert_iterator_yields(iter().map_first_where(|n: &i32| *n > 1, |_: &i32| 0), &[1, 0, 3, 4])?;
    assert_iterator_yields(iter().map_last_where(|n: &i32| *n < 4, |_: &i32| 0), &[1, 2, 0, 4])?;
    Ok(())
}

#[test]
fn mapper_runs_once_per_index() -> anyhow::Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);
    let mapped = ListSequence::from_vec(vec![1, 2, 3]).map(move |n: &i32| {
        counted.fetch_add(1, Ordering::SeqCst);
        n * 2
    });
    assert_eq!(mapped.get(2)?, 6);
    assert_eq!(mapped.get(2)?, 6);
    assert_eq!(mapped.to_vec()?, vec![2, 4, 6]);
    assert_eq!(mapped.to_vec()?, vec![2, 4, 6]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    Ok(())
}

#[test]
fn failing_mapper_surfaces_as_callback_error() -> anyhow::Result<()> {
    let parsed =
        ListSequence::from_vec(vec!["1", "x", "3"]).try_map(|s: &&str| Ok(s.parse::<i32>()?));
    assert_eq!(parsed.get(0)?, 1);
    let err = parsed.get(1).expect_err("parsing x must fail");
    assert!(err.is_callback());
    assert_eq!(parsed.get(2)?, 3);
    Ok(())
}

#[test]
fn peek_observes_each_position_once() -> anyhow::Result<()> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let peeked = ListSequence::from_vec(vec!['a', 'b', 'c']).peek(move |c: &char| {
        sink.lock().expect("sink lock").push(*c);
    });
    assert_eq!(peeked.get(1)?, 'b');
    assert_eq!(peeked.to_vec()?, vec!['a', 'b', 'c']);
    assert_eq!(*seen.lock().expect("sink lock"), vec!['b', 'a', 'c']);

    let failing = IteratorSequence::from_vec(vec![1, 2]).try_peek(|n: &i32| {
        anyhow::ensure!(*n < 2, "too big");
        Ok(())
    });
    let pulled: Vec<ironseq::Result<i32>> = failing.collect();
    assert!(matches!(pulled[0], Ok(1)));
    assert!(matches!(pulled[1], Err(SequenceError::Callback(_))));
    Ok(())
}

#[test]
fn flat_map_variants() -> anyhow::Result<()> {
    let words = ListSequence::from_vec(vec!["ab", "", "c"]);
    let letters = words.flat_map(|w: &&str| w.chars().collect::<Vec<_>>());
    assert_eq!(letters.get(2)?, 'c');
    assert_sequence_yields(&letters, &['a', 'b', 'c'])?;

    let numbers = ListSequence::from_vec(vec![1, 2, 3]);
    let tripled = numbers.flat_map_where(|n: &i32| *n == 2, |n: &i32| vec![*n; 3]);
    assert_sequence_yields(&tripled, &[1, 2, 2, 2, 3])?;
    assert_sequence_yields(&numbers.flat_map_after(0, |_: &i32| Vec::new()), &[2, 3])?;
    let doubled = numbers.flat_map_first_where(|n: &i32| *n > 1, |n: &i32| vec![*n, *n]);
    assert_sequence_yields(&doubled, &[1, 2, 2, 3])?;
    let padded = numbers.flat_map_last_where(|n: &i32| *n < 3, |n: &i32| vec![0, *n]);
    assert_sequence_yields(&padded, &[1, 0, 2, 3])?;

    let nested = numbers.flat_map(|n: &i32| ListSequence::repeat(*n, 2));
    assert_sequence_yields(&nested, &[1, 1, 2, 2, 3, 3])?;

    let iter = || IteratorSequence::from_vec(vec![1, 2, 3]);
    assert_iterator_yields(iter().flat_map(|n: &i32| vec![*n; *n as usize]), &[1, 2, 2, 3, 3, 3])?;
    assert_iterator_yields(iter().flat_map_after(1, |_: &i32| vec![7, 8]), &[1, 7, 8, 3])?;
    let dropped = iter().flat_map_last_where(|n: &i32| *n == 1, |_: &i32| Vec::new());
    assert_iterator_yields(dropped, &[2, 3])?;

    let failing = iter().try_flat_map(|n: &i32| {
        if *n == 2 {
            Err(anyhow!("cannot expand 2"))
        } else {
            Ok(vec![*n])
        }
    });
    let pulled: Vec<ironseq::Result<i32>> = failing.collect();
    assert!(matches!(pulled[0], Ok(1)));
    assert!(pulled[1].is_err());
    Ok(())
}

#[test]
fn folds_and_reductions() -> anyhow::Result<()> {
    let numbers = ListSequence::from_vec(vec![1, 2, 3, 4]);
    let sum = numbers.fold_left(0, |acc, n: &i32| acc + n);
    assert_eq!(sum.known_size(), Some(1));
    assert_sequence_yields(&sum, &[10])?;

    let joined = ListSequence::from_vec(vec!['a', 'b', 'c'])
        .fold_right(String::new(), |c: &char, acc| format!("{c}{acc}"));
    assert_eq!(joined.get(0)?, "abc");

    let digits = numbers.fold_left(String::new(), |acc, n: &i32| format!("{acc}{n}"));
    assert_eq!(digits.get(0)?, "1234");
    assert_sequence_yields(&numbers.reduce_left(|acc, n: &i32| acc * n), &[24])?;
    assert_sequence_yields(&numbers.reduce_right(|n: &i32, acc| n - acc), &[-2])?;
    assert_sequence_yields(&ListSequence::<i32>::empty().reduce_left(|acc, n: &i32| acc + n), &[])?;

    let failing = numbers.try_fold_left(0, |acc, n: &i32| {
        anyhow::ensure!(*n < 3, "overflowed budget at {n}");
        Ok(acc + n)
    });
    assert_error_kind(&failing.get(0), "Callback");

    let iter = || IteratorSequence::from_vec(vec![1, 2, 3, 4]);
    assert_iterator_yields(iter().fold_left(0, |acc, n: &i32| acc + n), &[10])?;
    assert_iterator_yields(iter().reduce_left(|acc, n: &i32| acc.max(*n)), &[4])?;
    let nothing = IteratorSequence::<i32>::empty().reduce_right(|n: &i32, acc| n + acc);
    assert_iterator_yields(nothing, &[])?;
    Ok(())
}

#[test]
fn map_exceptionally_replaces_failed_elements() -> anyhow::Result<()> {
    let parsed = ListSequence::from_vec(vec!["1", "x", "3"])
        .try_map(|s: &&str| Ok(s.parse::<i32>()?))
        .map_exceptionally(|_err| Ok(-1));
    assert_sequence_yields(&parsed, &[1, -1, 3])?;

    let recovered = IteratorSequence::from_materializer(FailingIter::new(vec![1, 2, 3, 4], [0, 2]))
        .map_exceptionally(|err| {
            Ok(if err.to_string().contains("position 0") { 100 } else { 200 })
        });
    assert_iterator_yields(recovered, &[100, 2, 200, 4])?;
    Ok(())
}

#[test]
fn flat_map_exceptionally_can_drop_or_expand() -> anyhow::Result<()> {
    let dropped = IteratorSequence::from_materializer(FailingIter::new(vec![1, 2, 3], [1]))
        .flat_map_exceptionally(|_err| Ok(Vec::new()));
    assert_iterator_yields(dropped, &[1, 3])?;

    let expanded = ListSequence::from_vec(vec![1, 2, 3])
        .try_map(|n: &i32| if *n == 2 { Err(Rejected(*n).into()) } else { Ok(*n) })
        .flat_map_exceptionally(|_err| Ok(vec![20, 21]));
    assert_sequence_yields(&expanded, &[1, 20, 21, 3])?;
    Ok(())
}

#[test]
fn recovery_can_filter_by_error_type() -> anyhow::Result<()> {
    let checked = IteratorSequence::from_vec(vec![1, -2, 3, -4])
        .try_map(|n: &i32| {
            if *n == -4 {
                Err(anyhow!("unexpected"))
            } else if *n < 0 {
                Err(Rejected(*n).into())
            } else {
                Ok(*n)
            }
        })
        .map_exceptionally(|err| match err.downcast_ref::<Rejected>() {
            Some(Rejected(n)) => Ok(n.abs()),
            None => Err(anyhow!("cannot recover: {err}")),
        });
    let pulled: Vec<ironseq::Result<i32>> = checked.collect();
    assert_eq!(pulled.len(), 4);
    assert!(matches!(pulled[1], Ok(2)));
    assert!(matches!(pulled[3], Err(SequenceError::Callback(_))));
    Ok(())
}

#[test]
fn structural_errors_are_not_recovered() -> anyhow::Result<()> {
    let list = ListSequence::from_vec(vec![1]).map_exceptionally(|_err| Ok(0));
    assert_error_kind(&list.get(3), "IndexOutOfBounds");
    Ok(())
}

#[test]
fn empty_recovery_of_the_last_element_ends_the_sequence() -> anyhow::Result<()> {
    let parsed = ListSequence::from_vec(vec!["1", "x"])
        .try_map(|s: &&str| Ok(s.parse::<i32>()?))
        .flat_map_exceptionally(|_err| Ok(Vec::<i32>::new()));
    assert_sequence_yields(&parsed, &[1])?;

    let mut pulled = IteratorSequence::from_materializer(FailingIter::new(vec![1, 2], [1]))
        .flat_map_exceptionally(|_err| Ok(Vec::<i32>::new()));
    assert!(pulled.has_next()?);
    assert_eq!(pulled.next_element()?, 1);
    assert!(!pulled.has_next()?);
    assert_error_kind(&pulled.next_element(), "NoSuchElement");

    let all_failed = IteratorSequence::from_materializer(FailingIter::new(vec![1, 2, 3], [0, 1, 2]))
        .flat_map_exceptionally(|_err| Ok(Vec::<i32>::new()));
    assert_iterator_yields(all_failed, &[])?;
    Ok(())
}
