//! Layered adjacency storage for the HNSW graph.
//!
//! Each layer is an arena: points get a dense slot id the first time they
//! join the layer, and the slot indexes that layer's adjacency lists. Slots
//! are append-only and never reused. Adjacency lists hold point ids.
//!
//! Misuse (double allocation, unknown point, oversized list) is an internal
//! invariant violation and panics.

use serde::{Deserialize, Serialize};

/// One layer of the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Layer {
    /// Point id -> slot id at this layer.
    slots: Vec<Option<usize>>,
    /// Slot id -> point id.
    members: Vec<usize>,
    /// Slot id -> neighbor point ids.
    adjacency: Vec<Vec<usize>>,
}

impl Layer {
    fn slot(&self, point: usize) -> Option<usize> {
        self.slots.get(point).copied().flatten()
    }
}

/// Per-layer adjacency lists with degree bounds `m` (layers > 0) and `2m` (layer 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStore {
    m: usize,
    m_max0: usize,
    layers: Vec<Layer>,
}

impl GraphStore {
    pub fn new(m: usize) -> Self {
        Self {
            m,
            m_max0: m.saturating_mul(2),
            layers: Vec::new(),
        }
    }

    pub fn m(&self) -> usize {
        self.m
    }

    /// Number of layers currently present.
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn max_degree(&self, layer: usize) -> usize {
        if layer == 0 {
            self.m_max0
        } else {
            self.m
        }
    }

    /// Append an empty layer on top and return its number.
    pub fn push_layer(&mut self) -> usize {
        self.layers.push(Layer::default());
        self.layers.len() - 1
    }

    /// Pre-size layer 0 for `points` total points.
    pub fn reserve(&mut self, points: usize) {
        if self.layers.is_empty() {
            self.push_layer();
        }
        let base = &mut self.layers[0];
        let extra = points.saturating_sub(base.members.len());
        base.slots.reserve(points.saturating_sub(base.slots.len()));
        base.members.reserve(extra);
        base.adjacency.reserve(extra);
    }

    /// Give `point` a slot at `layer` with an empty neighbor list.
    pub fn allocate_slot(&mut self, layer: usize, point: usize) -> usize {
        assert!(layer < self.layers.len(), "layer {} does not exist", layer);
        let l = &mut self.layers[layer];
        assert!(
            l.slot(point).is_none(),
            "point {} already has a slot at layer {}",
            point,
            layer
        );

        if point >= l.slots.len() {
            l.slots.resize(point + 1, None);
        }
        let slot = l.members.len();
        l.slots[point] = Some(slot);
        l.members.push(point);
        l.adjacency.push(Vec::new());
        slot
    }

    pub fn contains(&self, layer: usize, point: usize) -> bool {
        self.slot(layer, point).is_some()
    }

    pub fn slot(&self, layer: usize, point: usize) -> Option<usize> {
        self.layers.get(layer).and_then(|l| l.slot(point))
    }

    /// Number of points present at `layer`.
    pub fn layer_len(&self, layer: usize) -> usize {
        self.layers.get(layer).map_or(0, |l| l.members.len())
    }

    /// Points present at `layer`, in slot order.
    pub fn members(&self, layer: usize) -> &[usize] {
        self.layers
            .get(layer)
            .map(|l| l.members.as_slice())
            .unwrap_or(&[])
    }

    pub fn neighbors(&self, layer: usize, point: usize) -> &[usize] {
        let slot = self.expect_slot(layer, point);
        &self.layers[layer].adjacency[slot]
    }

    pub fn set_neighbors(&mut self, layer: usize, point: usize, neighbors: Vec<usize>) {
        let max = self.max_degree(layer);
        assert!(
            neighbors.len() <= max,
            "neighbor list of length {} exceeds max degree {} at layer {}",
            neighbors.len(),
            max,
            layer
        );
        let slot = self.expect_slot(layer, point);
        self.layers[layer].adjacency[slot] = neighbors;
    }

    /// Append `neighbor` to `point`'s list if there is room. Returns false when full.
    pub fn try_push_neighbor(&mut self, layer: usize, point: usize, neighbor: usize) -> bool {
        let max = self.max_degree(layer);
        let slot = self.expect_slot(layer, point);
        let list = &mut self.layers[layer].adjacency[slot];
        if list.len() >= max {
            return false;
        }
        list.push(neighbor);
        true
    }

    /// Highest layer `point` belongs to.
    pub fn level_of(&self, point: usize) -> Option<usize> {
        (0..self.layers.len())
            .rev()
            .find(|&layer| self.contains(layer, point))
    }

    /// Check every structural invariant of the graph.
    ///
    /// `num_points` is the number of points that must be present at layer 0.
    pub fn validate(&self, num_points: usize) -> Result<(), String> {
        for (layer, l) in self.layers.iter().enumerate() {
            if l.members.len() != l.adjacency.len() {
                return Err(format!(
                    "layer {}: {} members but {} adjacency lists",
                    layer,
                    l.members.len(),
                    l.adjacency.len()
                ));
            }
            if l.slots.iter().flatten().count() != l.members.len() {
                return Err(format!("layer {}: slot map and member list disagree", layer));
            }

            let max = self.max_degree(layer);
            for (slot, &point) in l.members.iter().enumerate() {
                if l.slot(point) != Some(slot) {
                    return Err(format!(
                        "layer {}: point {} does not map back to slot {}",
                        layer, point, slot
                    ));
                }
                if point >= num_points {
                    return Err(format!("layer {}: unknown point {}", layer, point));
                }
                if layer > 0 && !self.contains(layer - 1, point) {
                    return Err(format!(
                        "point {} present at layer {} but not at layer {}",
                        point,
                        layer,
                        layer - 1
                    ));
                }

                let list = &l.adjacency[slot];
                if list.len() > max {
                    return Err(format!(
                        "layer {}: point {} has {} neighbors (max {})",
                        layer,
                        point,
                        list.len(),
                        max
                    ));
                }
                if let Some(&bad) = list.iter().find(|&&n| n == point || l.slot(n).is_none()) {
                    return Err(format!(
                        "layer {}: point {} links to invalid neighbor {}",
                        layer, point, bad
                    ));
                }
            }
        }

        if self.layer_len(0) != num_points {
            return Err(format!(
                "layer 0 holds {} points, expected {}",
                self.layer_len(0),
                num_points
            ));
        }
        Ok(())
    }

    fn expect_slot(&self, layer: usize, point: usize) -> usize {
        match self.slot(layer, point) {
            Some(slot) => slot,
            None => panic!("point {} is not present at layer {}", point, layer),
        }
    }
}
