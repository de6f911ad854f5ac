//! Combination generator.
//!
//! Enumerates every non-empty subset of a list, largest subsets first. Within
//! a size, subsets come out in lexicographic order of their positions, and
//! each subset keeps the relative order of the original list.

/// Every non-empty subset of `items`, for sizes `items.len()` down to 1.
///
/// Yields exactly `2^n - 1` subsets. Subsets are not deduplicated, so equal
/// items at different positions produce distinct subsets.
///
/// # Example
///
/// ```
/// use prio::combinations;
///
/// let groups = combinations(&['a', 'b', 'c']);
/// assert_eq!(
///     groups,
///     vec![
///         vec!['a', 'b', 'c'],
///         vec!['a', 'b'],
///         vec!['a', 'c'],
///         vec!['b', 'c'],
///         vec!['a'],
///         vec!['b'],
///         vec!['c'],
///     ]
/// );
/// ```
#[must_use]
pub fn combinations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    let mut out = Vec::new();
    for size in (1..=items.len()).rev() {
        out.extend(combinations_of_size(items, size));
    }
    out
}

/// Every subset of `items` with exactly `size` elements, order-preserving.
///
/// Returns nothing when `size` is zero or larger than `items`.
#[must_use]
pub fn combinations_of_size<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    let mut out = Vec::new();
    if size == 0 || size > items.len() {
        return out;
    }
    let mut path = Vec::with_capacity(size);
    walk(items, size, 0, &mut path, &mut out);
    out
}

fn walk<T: Clone>(
    items: &[T],
    size: usize,
    start: usize,
    path: &mut Vec<T>,
    out: &mut Vec<Vec<T>>,
) {
    if path.len() == size {
        out.push(path.clone());
        return;
    }
    // Leave room for the elements still needed after position i.
    let last_start = items.len() - (size - path.len());
    for i in start..=last_start {
        path.push(items[i].clone());
        walk(items, size, i + 1, path, out);
        path.pop();
    }
}
