//! Vector validation and row access helpers

use std::borrow::Cow;

use ndarray::ArrayView1;

use crate::error::{HnswError, Result};

/// Check that `vector` has `dimension` components, all of them finite.
pub fn validate(vector: &[f64], dimension: usize) -> Result<()> {
    if vector.len() != dimension {
        return Err(HnswError::DimensionMismatch {
            expected: dimension,
            actual: vector.len(),
        });
    }
    if let Some(pos) = vector.iter().position(|x| !x.is_finite()) {
        return Err(HnswError::InvalidVector {
            reason: format!("component {} is not finite ({})", pos, vector[pos]),
        });
    }
    Ok(())
}

/// L2 norm (magnitude) of a vector
pub fn norm(vector: &[f64]) -> f64 {
    vector.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Borrow a matrix row as a slice, copying only when the row is not contiguous.
pub fn row_slice<'a>(row: &ArrayView1<'a, f64>) -> Cow<'a, [f64]> {
    match row.to_slice() {
        Some(slice) => Cow::Borrowed(slice),
        None => Cow::Owned(row.to_vec()),
    }
}
