//! Cumulative-weight selection shared by archetype and reward picking.

use crate::seed::SeedSource;

/// Picks an index from `weights` by cumulative-weight draw.
///
/// Negative weights count as zero. A non-positive total picks the first
/// candidate. Returns `None` only for an empty slice.
pub fn pick_weighted(weights: &[f32], rng: &mut SeedSource) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }

    let total: f32 = weights.iter().map(|w| w.max(0.0)).sum();
    if total <= 0.0 {
        return Some(0);
    }

    let roll = rng.next_float() * total;
    let mut cumulative = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        cumulative += weight.max(0.0);
        if roll < cumulative {
            return Some(index);
        }
    }

    // Rounding can leave the roll just above the final cumulative sum.
    weights.iter().rposition(|w| *w > 0.0)
}
