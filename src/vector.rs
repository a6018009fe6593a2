//! Fixed-width positional presence vectors.
//!
//! Position `i` of a vector is 1 when the filtered token list has a token at
//! ordinal `i`. Positions encode token order, not token identity, so two
//! sentences with the same number of kept tokens produce the same vector.

/// Presence vector over token positions.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// All-zero vector of the given length.
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Euclidean norm.
    pub fn magnitude(&self) -> f64 {
        self.0.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// True when every entry is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    pub fn dot(&self, other: &FeatureVector) -> f64 {
        self.0.iter().zip(&other.0).map(|(a, b)| a * b).sum()
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Build the presence vector for an already filtered token list.
///
/// Tokens at positions `>= max_length` are ignored. An empty token list
/// gives the all-zero vector of length `max_length`.
pub fn vectorize<S: AsRef<str>>(tokens: &[S], max_length: usize) -> FeatureVector {
    let mut vector = FeatureVector::zeros(max_length);
    for (slot, _) in vector.0.iter_mut().zip(tokens) {
        *slot = 1.0;
    }
    vector
}

/// Longest filtered token list among `token_sets` (0 when there are none).
pub fn max_token_count<S: AsRef<str>>(token_sets: &[Vec<S>]) -> usize {
    token_sets.iter().map(Vec::len).max().unwrap_or(0)
}

/// Cosine similarity of two vectors; 0 when either has zero magnitude.
pub fn cosine_similarity(a: &FeatureVector, b: &FeatureVector) -> f64 {
    if a.is_zero() || b.is_zero() {
        return 0.0;
    }
    a.dot(b) / (a.magnitude() * b.magnitude())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectorize_marks_positions() {
        let v = vectorize(&["rust", "fast"], 4);
        assert_eq!(v.as_slice(), &[1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_vectorize_truncates_at_max_length() {
        let v = vectorize(&["a", "b", "c"], 2);
        assert_eq!(v.as_slice(), &[1.0, 1.0]);
    }

    #[test]
    fn test_vectorize_empty_tokens() {
        let tokens: Vec<String> = Vec::new();
        let v = vectorize(&tokens, 3);
        assert!(v.is_zero());
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn test_position_not_identity() {
        // different words, same shape
        assert_eq!(vectorize(&["cats"], 3), vectorize(&["sky"], 3));
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let a = vectorize(&["x", "y"], 3);
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let a = vectorize(&["x"], 2);
        let zero = FeatureVector::zeros(2);
        assert_eq!(cosine_similarity(&a, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_cosine_partial_overlap() {
        let a = vectorize(&["x"], 2);
        let b = vectorize(&["x", "y"], 2);
        let expected = 1.0 / 2f64.sqrt();
        assert!((cosine_similarity(&a, &b) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_max_token_count() {
        let sets = vec![vec!["a"], vec!["a", "b", "c"], vec![]];
        assert_eq!(max_token_count(&sets), 3);
        let none: Vec<Vec<String>> = Vec::new();
        assert_eq!(max_token_count(&none), 0);
    }
}
