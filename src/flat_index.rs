//! Brute-force flat index with O(n) exact k-NN, used as a ground-truth oracle

use ndarray::Array2;

use crate::distance::{Distance, DistanceMetric};
use crate::error::{HnswError, Result};
use crate::index::NearestNeighbors;
use crate::vector::{row_slice, validate};

/// A flat index that computes the distance to every row of its dataset.
#[derive(Debug)]
pub struct FlatIndex<D = DistanceMetric> {
    data: Array2<f64>,
    distance: D,
}

impl<D: Distance> FlatIndex<D> {
    pub fn new(data: Array2<f64>, distance: D) -> Self {
        Self { data, distance }
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }
}

impl<D: Distance> NearestNeighbors for FlatIndex<D> {
    fn search(&self, query: &[f64], k: usize) -> Result<Vec<(usize, f64)>> {
        validate(query, self.dimension())?;
        if k == 0 {
            return Err(HnswError::InvalidParameter {
                reason: "k must be at least 1".to_string(),
            });
        }

        let mut results: Vec<(usize, f64)> = self
            .data
            .outer_iter()
            .enumerate()
            .map(|(id, row)| (id, self.distance.distance(query, &row_slice(&row))))
            .collect();

        results.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        results.truncate(k);
        Ok(results)
    }

    fn dimension(&self) -> usize {
        self.data.ncols()
    }

    fn len(&self) -> usize {
        self.data.nrows()
    }
}
