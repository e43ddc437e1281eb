//! Index trait shared by the HNSW graph and the brute-force oracle

use crate::error::Result;

/// A k-nearest-neighbor search backend.
///
/// Points are identified by their 0-based row/insertion index.
pub trait NearestNeighbors {
    /// Search for the `k` nearest neighbors of `query`.
    /// Returns up to `k` `(id, distance)` pairs sorted by distance ascending.
    fn search(&self, query: &[f64], k: usize) -> Result<Vec<(usize, f64)>>;

    /// Dimension of the indexed vectors.
    fn dimension(&self) -> usize;

    /// The number of vectors in this index.
    fn len(&self) -> usize;

    /// Whether the index is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
