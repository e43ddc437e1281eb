//! Distance functions for vector similarity

use serde::{Deserialize, Serialize};

use crate::vector::norm;

/// A distance between two equal-length vectors.
///
/// Implementations must be symmetric and non-negative, and must not change
/// behavior over the lifetime of an index built with them.
pub trait Distance {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;
}

/// Built-in distance metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Euclidean (L2) distance
    #[default]
    Euclidean,
    /// Squared Euclidean distance (same ordering as L2, no square root)
    SquaredEuclidean,
    /// Cosine distance: 1 - cosine similarity
    Cosine,
}

impl Distance for DistanceMetric {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            DistanceMetric::Euclidean => euclidean_distance(a, b),
            DistanceMetric::SquaredEuclidean => squared_euclidean_distance(a, b),
            DistanceMetric::Cosine => cosine_distance(a, b),
        }
    }
}

impl<F> Distance for F
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        self(a, b)
    }
}

/// Squared Euclidean distance between two vectors
pub fn squared_euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Euclidean (L2) distance between two vectors
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    squared_euclidean_distance(a, b).sqrt()
}

/// Dot product of two vectors
pub fn dot_product(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Cosine distance (1 - cosine similarity).
///
/// A zero vector has no direction; its distance to anything is 1.0.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    // Clamp to [-1, 1] to handle floating point errors
    let similarity = (dot_product(a, b) / (norm_a * norm_b)).clamp(-1.0, 1.0);
    1.0 - similarity
}
