//! Fixed-size subsets of a sequence.
//!
//! Used by encoders to spell out pairwise "at most one" constraints.

use itertools::Itertools;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot choose subsets of size {size} from {len} items")]
pub struct CombinationError {
    pub size: usize,
    pub len: usize,
}

/// Every `size`-element subset of `items`, in lexicographic order of positions.
///
/// Elements keep their relative order inside each subset. Choosing all items
/// yields the single full subset.
///
/// # Errors
///
/// [`CombinationError`] if `size` is zero or larger than `items.len()`.
pub fn subsets<T: Clone>(items: &[T], size: usize) -> Result<Vec<Vec<T>>, CombinationError> {
    if size == 0 || size > items.len() {
        return Err(CombinationError {
            size,
            len: items.len(),
        });
    }
    if size == items.len() {
        return Ok(vec![items.to_vec()]);
    }
    Ok(items.iter().cloned().combinations(size).collect())
}

/// Every unordered pair of `items`; empty for fewer than two items.
pub fn pairs<T: Clone>(items: &[T]) -> impl Iterator<Item = (T, T)> + '_ {
    items.iter().cloned().tuple_combinations()
}
