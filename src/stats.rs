//! Graph statistics: layer populations and degree distribution.

use serde::Serialize;

use crate::hnsw::GraphStore;

/// Population and degree figures for one layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerStats {
    pub layer: usize,
    pub points: usize,
    /// Directed edges (sum of adjacency list lengths).
    pub edges: usize,
    pub max_degree: usize,
    pub mean_degree: f64,
    /// Points with an empty neighbor list.
    pub isolated: usize,
}

/// Snapshot of the graph's shape, layer 0 first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    pub points: usize,
    pub layers: Vec<LayerStats>,
}

impl IndexStats {
    pub(crate) fn collect(graph: &GraphStore, num_layers: usize) -> Self {
        let layers: Vec<LayerStats> = (0..num_layers)
            .map(|layer| {
                let members = graph.members(layer);
                let degrees: Vec<usize> = members
                    .iter()
                    .map(|&p| graph.neighbors(layer, p).len())
                    .collect();
                let edges: usize = degrees.iter().sum();
                LayerStats {
                    layer,
                    points: members.len(),
                    edges,
                    max_degree: degrees.iter().copied().max().unwrap_or(0),
                    mean_degree: if members.is_empty() {
                        0.0
                    } else {
                        edges as f64 / members.len() as f64
                    },
                    isolated: degrees.iter().filter(|&&d| d == 0).count(),
                }
            })
            .collect();

        Self {
            points: layers.first().map_or(0, |l| l.points),
            layers,
        }
    }

    /// Number of points whose top layer is exactly `layer`.
    pub fn level_histogram(&self) -> Vec<usize> {
        self.layers
            .iter()
            .enumerate()
            .map(|(i, l)| l.points - self.layers.get(i + 1).map_or(0, |next| next.points))
            .collect()
    }
}
