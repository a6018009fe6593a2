//! Pairwise cosine similarity across the sentence vectors of a document.

use crate::vector::{cosine_similarity, FeatureVector};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SimilarityError {
    #[error("vector {index} has length {actual}, expected {expected}")]
    LengthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

/// Square, symmetric matrix of cosine similarities.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.size + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.size..(row + 1) * self.size]
    }

    /// Sum of each row, self-similarity included.
    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.size).map(|r| self.row(r).iter().sum()).collect()
    }

    fn set_pair(&mut self, i: usize, j: usize, value: f64) {
        self.values[i * self.size + j] = value;
        self.values[j * self.size + i] = value;
    }
}

/// Compute the cosine similarity of every pair of `vectors`.
///
/// Pairs involving an all-zero vector score 0, including its diagonal entry.
/// All vectors must share one length.
pub fn build_similarity_matrix(
    vectors: &[FeatureVector],
) -> Result<SimilarityMatrix, SimilarityError> {
    let expected = vectors.first().map(FeatureVector::len).unwrap_or(0);
    if let Some((index, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != expected) {
        return Err(SimilarityError::LengthMismatch {
            index,
            expected,
            actual: v.len(),
        });
    }

    let size = vectors.len();
    let mut matrix = SimilarityMatrix {
        size,
        values: vec![0.0; size * size],
    };
    for i in 0..size {
        for j in i..size {
            matrix.set_pair(i, j, cosine_similarity(&vectors[i], &vectors[j]));
        }
    }
    Ok(matrix)
}
