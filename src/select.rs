//! Representative-sentence selection.
//!
//! Sentences are scored by the row sum of the document's similarity matrix
//! and the top `n` are returned highest score first. The output is in rank
//! order, not document order.

use crate::similarity::{build_similarity_matrix, SimilarityError};
use crate::tokenize::{split_sentences, tokenize_and_filter};
use crate::vector::{max_token_count, vectorize};
use tracing::debug;

/// Pick the `n` most representative sentences.
///
/// When there are no more than `n` sentences they are all returned in their
/// original order. Otherwise ties in score keep ascending sentence index.
pub fn select_representative<'a>(
    sentences: &[&'a str],
    n: usize,
) -> Result<Vec<&'a str>, SimilarityError> {
    if sentences.len() <= n {
        return Ok(sentences.to_vec());
    }

    let scores = sentence_scores(sentences)?;
    let mut ranked: Vec<usize> = (0..sentences.len()).collect();
    // stable sort: equal scores keep document order
    ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    debug!(
        sentences = sentences.len(),
        selected = n,
        "ranked sentences by aggregate similarity"
    );

    Ok(ranked.into_iter().take(n).map(|i| sentences[i]).collect())
}

/// Split `text` into sentences and pick the `n` most representative.
pub fn select_from_document(text: &str, n: usize) -> Result<Vec<&str>, SimilarityError> {
    let sentences = split_sentences(text);
    select_representative(&sentences, n)
}

/// Aggregate similarity score of each sentence (row sums of the matrix).
pub fn sentence_scores(sentences: &[&str]) -> Result<Vec<f64>, SimilarityError> {
    let token_sets: Vec<Vec<String>> = sentences.iter().map(|s| tokenize_and_filter(s)).collect();
    let max_length = max_token_count(&token_sets);
    let vectors: Vec<_> = token_sets
        .iter()
        .map(|tokens| vectorize(tokens, max_length))
        .collect();
    let matrix = build_similarity_matrix(&vectors)?;
    Ok(matrix.row_sums())
}
