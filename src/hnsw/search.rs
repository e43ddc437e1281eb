//! Search primitives over a single layer of the graph.
//!
//! Both functions take `dist_to`, the distance from the query to a point id,
//! so the same code serves insertion (query = the new point) and querying.

use super::graph::GraphStore;
use super::neighbor_queue::{MaxHeap, MinHeap, Neighbor};

/// Greedy hill-climb towards the query on `layer`.
///
/// Moves to any strictly closer neighbor until no neighbor improves on the
/// current point, and returns that local optimum. Used to pick one seed per
/// layer while descending.
pub fn climb<F>(graph: &GraphStore, layer: usize, entry: usize, dist_to: F) -> usize
where
    F: Fn(usize) -> f64,
{
    let mut current = entry;
    let mut best = dist_to(current);

    loop {
        let mut changed = false;
        for &neighbor in graph.neighbors(layer, current) {
            let d = dist_to(neighbor);
            if d < best {
                best = d;
                current = neighbor;
                changed = true;
            }
        }
        if !changed {
            return current;
        }
    }
}

/// SEARCH-LAYER: bounded best-first search on `layer`.
///
/// Returns up to `ef` closest points found from `entries`, sorted ascending
/// by distance.
pub fn search_layer<F>(
    graph: &GraphStore,
    layer: usize,
    entries: &[usize],
    ef: usize,
    dist_to: F,
) -> Vec<Neighbor>
where
    F: Fn(usize) -> f64,
{
    let population = graph.layer_len(layer);
    let mut visited = vec![false; population];
    // ef may exceed the layer; neither heap can outgrow its population
    let capacity = ef.min(population);
    let mut candidates = MinHeap::with_capacity(capacity);
    let mut results = MaxHeap::with_capacity(capacity);

    for &ep in entries {
        let slot = slot_of(graph, layer, ep);
        if visited[slot] {
            continue;
        }
        visited[slot] = true;
        let n = Neighbor::new(ep, dist_to(ep));
        candidates.push(n);
        results.push_bounded(n, ef);
    }

    while let Some(c) = candidates.pop() {
        // Nothing left in the frontier can beat a full result set
        if results.len() >= ef {
            if let Some(worst) = results.peek() {
                if worst.distance < c.distance {
                    break;
                }
            }
        }

        for &neighbor in graph.neighbors(layer, c.id) {
            let slot = slot_of(graph, layer, neighbor);
            if visited[slot] {
                continue;
            }
            visited[slot] = true;

            let d = dist_to(neighbor);
            let improves = match results.peek() {
                Some(worst) => results.len() < ef || d < worst.distance,
                None => true,
            };
            if improves {
                let n = Neighbor::new(neighbor, d);
                candidates.push(n);
                results.push_bounded(n, ef);
            }
        }
    }

    results.into_sorted_vec()
}

fn slot_of(graph: &GraphStore, layer: usize, point: usize) -> usize {
    match graph.slot(layer, point) {
        Some(slot) => slot,
        None => panic!("point {} is not present at layer {}", point, layer),
    }
}
