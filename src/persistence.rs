//! Snapshot: save/load a built index to/from disk.
//!
//! File layout: `[magic: b"HNSW"][version: u32 LE][crc32: u32 LE][payload]`,
//! where the payload is the bincode-encoded [`IndexSnapshot`].

use std::fs;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::distance::DistanceMetric;
use crate::error::{HnswError, Result};
use crate::hnsw::{GraphStore, HnswIndex, HnswParams, LayerAssigner, PointArena};

const MAGIC: &[u8; 4] = b"HNSW";
const FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = 12;

/// Serializable representation of the full index state.
#[derive(Debug, Serialize, Deserialize)]
struct IndexSnapshot {
    params: HnswParams,
    metric: DistanceMetric,
    dimension: usize,
    vectors: Vec<f64>,
    graph: GraphStore,
    entry_point: Option<usize>,
    /// Levels sampled so far; replayed to restore the level generator.
    level_draws: u64,
}

fn corrupt(reason: impl Into<String>) -> HnswError {
    HnswError::CorruptSnapshot {
        reason: reason.into(),
    }
}

impl HnswIndex<DistanceMetric> {
    /// Encode the index into snapshot bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let snapshot = IndexSnapshot {
            params: self.params.clone(),
            metric: self.distance,
            dimension: self.points.dimension,
            vectors: self.points.data.clone(),
            graph: self.graph.clone(),
            entry_point: self.entry_point,
            level_draws: self.assigner.draws(),
        };
        let payload =
            bincode::serialize(&snapshot).map_err(|e| HnswError::SerializationError(e.to_string()))?;

        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Decode and verify an index from snapshot bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(corrupt(format!("file too short ({} bytes)", bytes.len())));
        }
        if &bytes[0..4] != MAGIC {
            return Err(corrupt("bad magic"));
        }
        let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if version != FORMAT_VERSION {
            return Err(corrupt(format!("unsupported format version {}", version)));
        }
        let expected_crc = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let payload = &bytes[HEADER_LEN..];
        let actual_crc = crc32fast::hash(payload);
        if actual_crc != expected_crc {
            return Err(corrupt(format!(
                "checksum mismatch: expected {:08x}, got {:08x}",
                expected_crc, actual_crc
            )));
        }

        let snapshot: IndexSnapshot =
            bincode::deserialize(payload).map_err(|e| HnswError::SerializationError(e.to_string()))?;
        Self::restore(snapshot)
    }

    /// Save the index to `path`, overwriting any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes()?;
        fs::write(path, &bytes)?;
        Ok(())
    }

    /// Load an index previously written by [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let start = Instant::now();
        let bytes = fs::read(path)?;
        let index = Self::from_bytes(&bytes)?;
        info!(
            points = index.len(),
            layers = index.num_layers(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "HNSW snapshot loaded"
        );
        Ok(index)
    }

    fn restore(s: IndexSnapshot) -> Result<Self> {
        s.params
            .validate()
            .map_err(|e| corrupt(format!("invalid parameters: {}", e)))?;
        if s.dimension == 0 || s.vectors.len() % s.dimension != 0 {
            return Err(corrupt(format!(
                "{} values do not divide into dimension {}",
                s.vectors.len(),
                s.dimension
            )));
        }
        if s.vectors.iter().any(|x| !x.is_finite()) {
            return Err(corrupt("non-finite vector component"));
        }
        let num_points = s.vectors.len() / s.dimension;

        if s.graph.m() != s.params.m || s.graph.max_degree(0) != s.params.m_max0() {
            return Err(corrupt("graph degree bounds do not match parameters"));
        }
        s.graph.validate(num_points).map_err(corrupt)?;

        match s.entry_point {
            None if num_points > 0 => return Err(corrupt("missing entry point")),
            Some(ep) => {
                let top = s.graph.num_layers().saturating_sub(1);
                if s.graph.level_of(ep) != Some(top) {
                    return Err(corrupt(format!("entry point {} is not on the top layer", ep)));
                }
            }
            None => {}
        }
        if s.level_draws != num_points as u64 {
            return Err(corrupt(format!(
                "{} level draws recorded for {} points",
                s.level_draws, num_points
            )));
        }

        Ok(Self {
            assigner: LayerAssigner::resume(
                s.params.level_multiplier(),
                s.params.seed,
                s.level_draws,
            ),
            points: PointArena {
                dimension: s.dimension,
                data: s.vectors,
            },
            graph: s.graph,
            entry_point: s.entry_point,
            distance: s.metric,
            params: s.params,
        })
    }
}
