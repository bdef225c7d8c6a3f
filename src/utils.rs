//! Index arithmetic shared by the structural operators.
//!
//! Relative bounds are `isize`: non-negative values count from the start,
//! negative values count from the end of the (possibly lazily discovered)
//! size. Every addition or multiplication that can exceed `usize` goes
//! through [`checked_add`] / [`checked_mul`] and reports
//! [`SequenceError::Overflow`] instead of wrapping.

use crate::error::{Result, SequenceError};

pub(crate) fn checked_add(a: usize, b: usize) -> Result<usize> {
    a.checked_add(b).ok_or(SequenceError::Overflow)
}

pub(crate) fn checked_mul(a: usize, b: usize) -> Result<usize> {
    a.checked_mul(b).ok_or(SequenceError::Overflow)
}

/// Resolve a relative bound against `size`, clamping to `[0, size]`.
///
/// ```
/// use ironseq::utils::resolve_bound;
///
/// assert_eq!(resolve_bound(2, 7), 2);
/// assert_eq!(resolve_bound(-3, 7), 4);
/// assert_eq!(resolve_bound(-10, 7), 0);
/// assert_eq!(resolve_bound(12, 7), 7);
/// ```
pub fn resolve_bound(bound: isize, size: usize) -> usize {
    if bound >= 0 {
        bound.unsigned_abs().min(size)
    } else {
        size.saturating_sub(bound.unsigned_abs())
    }
}

/// Convert an element count into a relative bound, saturating at `isize::MAX`.
pub(crate) fn count_bound(count: usize) -> isize {
    isize::try_from(count).unwrap_or(isize::MAX)
}

/// Negated count as a relative bound, i.e. "`count` elements from the end".
pub(crate) fn tail_bound(count: usize) -> isize {
    if count == 0 {
        isize::MAX
    } else {
        -count_bound(count)
    }
}

/// Number of windows of `size` elements starting every `step` elements over
/// `len` elements, stopping after the first window that reaches the end.
pub(crate) fn window_count(len: usize, size: usize, step: usize) -> usize {
    if len == 0 {
        return 0;
    }
    if len <= size {
        return 1;
    }
    let last_reaching_end = (len - size).div_ceil(step);
    let last_starting_inside = len.div_ceil(step) - 1;
    last_reaching_end.min(last_starting_inside) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_bounds_count_from_the_end() {
        assert_eq!(resolve_bound(-3, 7), 4);
        assert_eq!(resolve_bound(-1, 7), 6);
        assert_eq!(resolve_bound(isize::MIN, 7), 0);
        assert_eq!(resolve_bound(isize::MAX, 7), 7);
    }

    #[test]
    fn overflow_is_reported() {
        assert!(matches!(checked_add(usize::MAX, 1), Err(SequenceError::Overflow)));
        assert!(matches!(checked_mul(usize::MAX, 2), Err(SequenceError::Overflow)));
        assert_eq!(checked_add(2, 3).ok(), Some(5));
    }

    #[test]
    fn window_counts() {
        assert_eq!(window_count(0, 3, 1), 0);
        assert_eq!(window_count(2, 3, 1), 1);
        assert_eq!(window_count(5, 3, 1), 3);
        assert_eq!(window_count(4, 3, 3), 2);
        assert_eq!(window_count(6, 2, 3), 2);
        assert_eq!(window_count(4, 2, 2), 2);
    }

    #[test]
    fn tail_bounds() {
        assert_eq!(tail_bound(3), -3);
        assert_eq!(tail_bound(0), isize::MAX);
    }
}
