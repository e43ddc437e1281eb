//! # HNSW From Scratch
//!
//! An approximate nearest neighbor index built on a Hierarchical Navigable
//! Small World graph.
//!
//! This library provides:
//! - An append-only HNSW index over dense `f64` vectors
//! - Pluggable distance functions (Euclidean, squared Euclidean, cosine, or any closure)
//! - A brute-force flat index to measure recall against
//! - Snapshot persistence
//!
//! ## Example
//!
//! ```rust
//! use ndarray::array;
//! use hnsw_from_scratch::{HnswIndex, HnswParams};
//!
//! let data = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
//! let index = HnswIndex::build(data.view(), HnswParams::default()).unwrap();
//!
//! let results = index.k_nearest_neighbors(&[0.1, 0.0], 2, 50).unwrap();
//! assert_eq!(results[0].0, 0);
//! ```

pub mod distance;
pub mod error;
pub mod flat_index;
pub mod hnsw;
pub mod index;
pub mod persistence;
pub mod stats;
pub mod vector;

pub use distance::{Distance, DistanceMetric};
pub use error::{HnswError, Result};
pub use flat_index::FlatIndex;
pub use hnsw::{HnswIndex, HnswParams};
pub use index::NearestNeighbors;
pub use stats::{IndexStats, LayerStats};
