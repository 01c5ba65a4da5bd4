//! Weighted selection without replacement
//!
//! Each draw picks an item with probability proportional to its weight
//! among the items not yet picked; the picked item's weight is then removed
//! from the pool.

use crate::{DuelError, Result};
use rand::Rng;

/// Draw `k` distinct items from `items`, weighted by `weights`
///
/// Items are returned in the order they were drawn. Zero-weight items are
/// only drawn once every positive-weight item has been taken, and then
/// uniformly among the remaining ones.
pub fn weighted_select<T: Clone>(
    items: &[T],
    weights: &[u32],
    k: usize,
    rng: &mut (impl Rng + ?Sized),
) -> Result<Vec<T>> {
    if items.len() != weights.len() {
        return Err(DuelError::InvalidArgument(format!(
            "items and weights must have the same length ({} vs {})",
            items.len(),
            weights.len()
        )));
    }
    let indices = weighted_select_indices(weights, k, rng)?;
    Ok(indices.into_iter().map(|i| items[i].clone()).collect())
}

/// Index form of [`weighted_select`]
pub fn weighted_select_indices(
    weights: &[u32],
    k: usize,
    rng: &mut (impl Rng + ?Sized),
) -> Result<Vec<usize>> {
    if k > weights.len() {
        return Err(DuelError::InvalidArgument(format!(
            "cannot select {} items from {} available",
            k,
            weights.len()
        )));
    }

    let mut remaining: Vec<u64> = weights.iter().map(|&w| u64::from(w)).collect();
    let mut taken = vec![false; weights.len()];
    let mut total: u64 = remaining.iter().sum();
    let mut selected = Vec::with_capacity(k);

    while selected.len() < k {
        let pick = if total > 0 {
            let sample = rng.gen_range(0..total);
            let mut cumulative = 0;
            remaining
                .iter()
                .position(|&w| {
                    cumulative += w;
                    w > 0 && sample < cumulative
                })
                .ok_or_else(|| DuelError::InvalidArgument("weight table exhausted".to_string()))?
        } else {
            // Only zero-weight items are left: fall back to a uniform pick
            let open: Vec<usize> = (0..taken.len()).filter(|&i| !taken[i]).collect();
            open[rng.gen_range(0..open.len())]
        };

        total -= remaining[pick];
        remaining[pick] = 0;
        taken[pick] = true;
        selected.push(pick);
    }

    Ok(selected)
}
