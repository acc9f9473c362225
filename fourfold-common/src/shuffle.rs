//! Shuffle utilities
//!
//! Uniform permutations (`rand`'s Fisher-Yates `SliceRandom::shuffle` on the
//! thread-local RNG) over copies of the input. Inputs are never mutated.
//! Tests check length, multiset and cross-array correspondence, not order.

use crate::{Error, Result};
use rand::seq::SliceRandom;

/// Return a uniformly shuffled copy of `items`
pub fn shuffle_array<T: Clone>(items: &[T]) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(&mut rand::thread_rng());
    shuffled
}

/// Uniform random permutation of `0..len`
pub fn random_permutation(len: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(&mut rand::thread_rng());
    indices
}

/// Reorder `items` so that output position `i` holds `items[permutation[i]]`
///
/// Lets callers shuffle parallel arrays of different element types with one
/// shared permutation from [`random_permutation`].
pub fn apply_permutation<T: Clone>(items: &[T], permutation: &[usize]) -> Result<Vec<T>> {
    if items.len() != permutation.len() {
        return Err(Error::InvalidInput(format!(
            "Permutation length {} does not match array length {}",
            permutation.len(),
            items.len()
        )));
    }

    permutation
        .iter()
        .map(|&idx| {
            items.get(idx).cloned().ok_or_else(|| {
                Error::InvalidInput(format!("Permutation index {} out of bounds", idx))
            })
        })
        .collect()
}

/// Shuffle N parallel arrays with one shared permutation
///
/// For every output index `i`, each output array holds the element that was at
/// the same original index in its input array.
///
/// # Errors
/// Returns `Error::InvalidInput` if the arrays have different lengths.
pub fn shuffle_in_sync<T: Clone>(arrays: &[&[T]]) -> Result<Vec<Vec<T>>> {
    let Some(first) = arrays.first() else {
        return Ok(Vec::new());
    };

    let len = first.len();
    if let Some(mismatch) = arrays.iter().find(|a| a.len() != len) {
        return Err(Error::InvalidInput(format!(
            "Cannot shuffle arrays in sync: lengths differ ({} vs {})",
            len,
            mismatch.len()
        )));
    }

    let permutation = random_permutation(len);
    arrays
        .iter()
        .map(|array| apply_permutation(array, &permutation))
        .collect()
}
