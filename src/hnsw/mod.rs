//! HNSW (Hierarchical Navigable Small World) index module.
//!
//! Implements the graph from "Efficient and robust approximate nearest
//! neighbor search using Hierarchical Navigable Small World graphs"
//! (Malkov & Yashunin, 2016/2018) with the neighbor-selection heuristic.

pub mod graph;
pub mod level;
pub mod neighbor_queue;
pub mod params;
pub mod prune;
pub mod search;

pub use graph::GraphStore;
pub use level::LayerAssigner;
pub use params::HnswParams;

use std::time::Instant;

use ndarray::ArrayView2;
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::distance::{Distance, DistanceMetric};
use crate::error::{HnswError, Result};
use crate::index::NearestNeighbors;
use crate::stats::IndexStats;
use crate::vector::{row_slice, validate};

use neighbor_queue::Neighbor;
use prune::select_neighbors;
use search::{climb, search_layer};

/// Flat, append-only storage of the indexed vectors.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PointArena {
    pub(crate) dimension: usize,
    pub(crate) data: Vec<f64>,
}

impl PointArena {
    fn new(dimension: usize) -> Self {
        Self {
            dimension,
            data: Vec::new(),
        }
    }

    #[inline]
    fn get(&self, point: usize) -> &[f64] {
        let start = point * self.dimension;
        &self.data[start..start + self.dimension]
    }

    fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    fn push(&mut self, vector: &[f64]) -> usize {
        let id = self.len();
        self.data.extend_from_slice(vector);
        id
    }
}

/// An HNSW approximate nearest neighbor index over `f64` vectors.
///
/// Points are appended with [`insert`](Self::insert) and identified by their
/// 0-based insertion order. Mutation takes `&mut self`; once built, the index
/// can be queried from many threads at once.
#[derive(Debug)]
pub struct HnswIndex<D = DistanceMetric> {
    pub(crate) params: HnswParams,
    pub(crate) distance: D,
    pub(crate) points: PointArena,
    pub(crate) graph: GraphStore,
    pub(crate) entry_point: Option<usize>,
    pub(crate) assigner: LayerAssigner,
}

impl HnswIndex<DistanceMetric> {
    /// Create an empty Euclidean index for `dimension`-dimensional vectors.
    pub fn new(dimension: usize, params: HnswParams) -> Result<Self> {
        Self::with_distance(dimension, params, DistanceMetric::Euclidean)
    }

    /// Build a Euclidean index over every row of `data`, in row order.
    pub fn build(data: ArrayView2<'_, f64>, params: HnswParams) -> Result<Self> {
        Self::build_with_distance(data, params, DistanceMetric::Euclidean)
    }
}

impl<D: Distance> HnswIndex<D> {
    pub fn with_distance(dimension: usize, params: HnswParams, distance: D) -> Result<Self> {
        params.validate()?;
        if dimension == 0 {
            return Err(HnswError::InvalidParameter {
                reason: "dimension must be at least 1".to_string(),
            });
        }
        Ok(Self {
            graph: GraphStore::new(params.m),
            assigner: LayerAssigner::new(params.level_multiplier(), params.seed),
            points: PointArena::new(dimension),
            entry_point: None,
            distance,
            params,
        })
    }

    pub fn build_with_distance(
        data: ArrayView2<'_, f64>,
        params: HnswParams,
        distance: D,
    ) -> Result<Self> {
        let mut index = Self::with_distance(data.ncols(), params, distance)?;
        index.insert_batch(data)?;
        Ok(index)
    }

    /// Insert every row of `data` in order. Returns the id of the first row.
    ///
    /// All rows are validated before any is inserted, so a bad row leaves
    /// the index untouched.
    pub fn insert_batch(&mut self, data: ArrayView2<'_, f64>) -> Result<usize> {
        let start = Instant::now();
        let first = self.len();

        for row in data.outer_iter() {
            validate(&row_slice(&row), self.dimension())?;
        }

        self.graph.reserve(first + data.nrows());
        self.points.data.reserve(data.len());
        for row in data.outer_iter() {
            self.insert(&row_slice(&row))?;
        }

        info!(
            inserted = data.nrows(),
            total = self.len(),
            layers = self.num_layers(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "HNSW batch insert complete"
        );
        Ok(first)
    }

    /// INSERT: Algorithm 1 from the HNSW paper. Returns the new point's id.
    pub fn insert(&mut self, vector: &[f64]) -> Result<usize> {
        validate(vector, self.dimension())?;

        let level = self.assigner.sample_layer();
        let id = self.points.push(vector);
        trace!(id, level, "inserting point");

        let entry_point = match self.entry_point {
            None => {
                self.promote(id, level);
                return Ok(id);
            }
            Some(ep) => ep,
        };

        let points = &self.points;
        let distance = &self.distance;
        let graph = &mut self.graph;
        let top_layer = graph.num_layers() - 1;
        let dist_to = |p: usize| distance.distance(vector, points.get(p));
        let pair_distance = |a: usize, b: usize| distance.distance(points.get(a), points.get(b));

        // Phase 1: greedy descent from the top layer down to level + 1
        let mut ep = entry_point;
        for layer in (level + 1..=top_layer).rev() {
            ep = climb(graph, layer, ep, &dist_to);
        }

        // Phase 2: link at layers min(level, top_layer) down to 0
        let ef = self.params.effective_ef_construction();
        for layer in (0..=level.min(top_layer)).rev() {
            let max_degree = graph.max_degree(layer);
            let candidates = search_layer(graph, layer, &[ep], ef, &dist_to);
            let chosen = select_neighbors(&candidates, max_degree, &pair_distance);

            graph.allocate_slot(layer, id);
            graph.set_neighbors(layer, id, chosen.clone());

            for &c in &chosen {
                if graph.try_push_neighbor(layer, c, id) {
                    continue;
                }
                // Full: re-select c's links from its current neighbors plus the new point
                let base = points.get(c);
                let mut pool: Vec<Neighbor> = graph
                    .neighbors(layer, c)
                    .iter()
                    .chain(std::iter::once(&id))
                    .map(|&n| Neighbor::new(n, distance.distance(base, points.get(n))))
                    .collect();
                pool.sort();
                let pruned = select_neighbors(&pool, max_degree, &pair_distance);
                graph.set_neighbors(layer, c, pruned);
            }

            if let Some(nearest) = candidates.first() {
                ep = nearest.id;
            }
        }

        if level > top_layer {
            self.promote(id, level);
        }

        Ok(id)
    }

    /// Add `id` to every layer up to `level` it is not yet on and make it the entry point.
    fn promote(&mut self, id: usize, level: usize) {
        while self.graph.num_layers() <= level {
            self.graph.push_layer();
        }
        for layer in 0..=level {
            if !self.graph.contains(layer, id) {
                self.graph.allocate_slot(layer, id);
            }
        }
        debug!(entry_point = id, layers = level + 1, "new top layer");
        self.entry_point = Some(id);
    }

    /// SEARCH: Algorithm 5 from the HNSW paper.
    ///
    /// Returns the `min(k, len)` closest `(point id, distance)` pairs found,
    /// ascending by distance. The search window is `max(k, ef)`.
    pub fn k_nearest_neighbors(
        &self,
        query: &[f64],
        k: usize,
        ef: usize,
    ) -> Result<Vec<(usize, f64)>> {
        validate(query, self.dimension())?;
        if k == 0 {
            return Err(HnswError::InvalidParameter {
                reason: "k must be at least 1".to_string(),
            });
        }
        if ef == 0 {
            return Err(HnswError::InvalidParameter {
                reason: "ef must be at least 1".to_string(),
            });
        }

        let entry_point = match self.entry_point {
            Some(ep) => ep,
            None => return Ok(vec![]),
        };

        let dist_to = |p: usize| self.distance.distance(query, self.points.get(p));

        // Phase 1: greedy descent to layer 1
        let mut ep = entry_point;
        for layer in (1..self.graph.num_layers()).rev() {
            ep = climb(&self.graph, layer, ep, &dist_to);
        }

        // Phase 2: beam search at layer 0
        let mut results = search_layer(&self.graph, 0, &[ep], ef.max(k), &dist_to);
        results.truncate(k);
        Ok(results.into_iter().map(|n| (n.id, n.distance)).collect())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_point.is_none()
    }

    pub fn dimension(&self) -> usize {
        self.points.dimension
    }

    pub fn params(&self) -> &HnswParams {
        &self.params
    }

    pub fn entry_point(&self) -> Option<usize> {
        self.entry_point
    }

    /// Number of layers (0 for an empty index).
    pub fn num_layers(&self) -> usize {
        if self.entry_point.is_none() {
            0
        } else {
            self.graph.num_layers()
        }
    }

    /// Highest layer `point` was inserted into.
    pub fn level_of(&self, point: usize) -> Option<usize> {
        self.graph.level_of(point)
    }

    pub fn vector(&self, point: usize) -> Option<&[f64]> {
        (point < self.len()).then(|| self.points.get(point))
    }

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats::collect(&self.graph, self.num_layers())
    }
}

impl<D: Distance + Sync> HnswIndex<D> {
    /// Run one query per row of `queries` in parallel.
    pub fn search_batch(
        &self,
        queries: ArrayView2<'_, f64>,
        k: usize,
        ef: usize,
    ) -> Result<Vec<Vec<(usize, f64)>>> {
        let rows: Vec<_> = queries.outer_iter().collect();
        rows.par_iter()
            .map(|row| self.k_nearest_neighbors(&row_slice(row), k, ef))
            .collect()
    }
}

impl<D: Distance> NearestNeighbors for HnswIndex<D> {
    fn search(&self, query: &[f64], k: usize) -> Result<Vec<(usize, f64)>> {
        self.k_nearest_neighbors(query, k, self.params.ef_search)
    }

    fn dimension(&self) -> usize {
        self.points.dimension
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}
