//! Neighbor selection heuristic.

use super::neighbor_queue::Neighbor;

/// Pick at most `m` neighbors for a base point from `candidates`.
///
/// `candidates` must be sorted ascending by distance to the base point.
/// A candidate is kept only if it is strictly closer to the base point than
/// to every neighbor kept before it, which spreads the kept links over
/// different directions instead of clustering them on one side.
/// `pair_distance(a, b)` is the distance between two candidate points.
pub fn select_neighbors<F>(candidates: &[Neighbor], m: usize, pair_distance: F) -> Vec<usize>
where
    F: Fn(usize, usize) -> f64,
{
    let mut selected: Vec<usize> = Vec::with_capacity(m.min(candidates.len()));

    for c in candidates {
        if selected.len() >= m {
            break;
        }
        let dominant = selected
            .iter()
            .all(|&r| c.distance < pair_distance(c.id, r));
        if dominant {
            selected.push(c.id);
        }
    }

    selected
}
