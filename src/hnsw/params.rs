//! Configuration parameters for the HNSW index.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HnswError, Result};

/// Configuration parameters for the HNSW index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HnswParams {
    /// Max number of connections per node on layers > 0.
    pub m: usize,
    /// Candidate window during construction (floored to `m`).
    pub ef_construction: usize,
    /// Candidate window used by [`NearestNeighbors::search`](crate::index::NearestNeighbors::search).
    pub ef_search: usize,
    /// Seed for level sampling.
    pub seed: u64,
}

impl Default for HnswParams {
    fn default() -> Self {
        Self {
            m: 16,
            ef_construction: 200,
            ef_search: 50,
            seed: 123,
        }
    }
}

impl HnswParams {
    pub fn new(m: usize, ef_construction: usize, ef_search: usize) -> Self {
        Self {
            m,
            ef_construction,
            ef_search,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Max connections at layer 0.
    pub fn m_max0(&self) -> usize {
        self.m.saturating_mul(2)
    }

    /// Max connections for a node at `layer`.
    pub fn max_degree(&self, layer: usize) -> usize {
        if layer == 0 {
            self.m_max0()
        } else {
            self.m
        }
    }

    /// ef used while inserting; never smaller than `m` so pruning has a full pool.
    pub fn effective_ef_construction(&self) -> usize {
        self.ef_construction.max(self.m)
    }

    /// Level generation factor: 1 / ln(m).
    pub fn level_multiplier(&self) -> f64 {
        1.0 / (self.m as f64).ln()
    }

    pub fn validate(&self) -> Result<()> {
        if self.m < 2 {
            return Err(HnswError::InvalidParameter {
                reason: format!("m must be at least 2, got {}", self.m),
            });
        }
        if self.m.checked_mul(2).is_none() {
            return Err(HnswError::InvalidParameter {
                reason: format!("m = {} overflows the layer-0 degree 2 * m", self.m),
            });
        }
        if self.ef_construction == 0 {
            return Err(HnswError::InvalidParameter {
                reason: "ef_construction must be at least 1".to_string(),
            });
        }
        if self.ef_search == 0 {
            return Err(HnswError::InvalidParameter {
                reason: "ef_search must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Parse parameters from JSON. Missing fields take their defaults.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let params: Self = serde_json::from_slice(bytes)
            .map_err(|e| HnswError::SerializationError(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Load parameters from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_json(&bytes)
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| HnswError::SerializationError(e.to_string()))
    }
}
