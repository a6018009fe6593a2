//! Single-document topic modeling.
//!
//! Fits Latent Dirichlet Allocation by collapsed Gibbs sampling over a corpus
//! made of one document. With one document the topics are not statistically
//! meaningful, but the grouping is deterministic for a given seed.

use crate::summary::{TopicKeyword, TopicSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::debug;

/// Settings for [`extract_topics_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct TopicModelOptions {
    pub num_topics: usize,
    /// Keywords reported per topic
    pub num_words: usize,
    pub seed: u64,
    /// Gibbs sampling sweeps
    pub iterations: usize,
    /// Document-topic prior; `1 / num_topics` when unset
    pub alpha: Option<f64>,
    /// Topic-word prior; `1 / num_topics` when unset
    pub eta: Option<f64>,
}

impl Default for TopicModelOptions {
    fn default() -> Self {
        Self {
            num_topics: 3,
            num_words: 5,
            seed: 100,
            iterations: 100,
            alpha: None,
            eta: None,
        }
    }
}

/// Term dictionary of a single document.
///
/// Ids follow alphabetical token order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    terms: Vec<String>,
    ids: BTreeMap<String, usize>,
}

impl Dictionary {
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut ids: BTreeMap<String, usize> = tokens
            .iter()
            .map(|t| (t.as_ref().to_string(), 0))
            .collect();
        let terms: Vec<String> = ids.keys().cloned().collect();
        for (id, slot) in ids.values_mut().enumerate() {
            *slot = id;
        }
        Self { terms, ids }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn id(&self, term: &str) -> Option<usize> {
        self.ids.get(term).copied()
    }

    pub fn term(&self, id: usize) -> &str {
        &self.terms[id]
    }

    /// Bag-of-words `(id, count)` pairs for `tokens`, ordered by id.
    pub fn doc2bow<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<(usize, usize)> {
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for id in tokens.iter().filter_map(|t| self.id(t.as_ref())) {
            *counts.entry(id).or_default() += 1;
        }
        counts.into_iter().collect()
    }
}

/// Fit `num_topics` topics over `document_tokens` with default settings.
pub fn extract_topics<S: AsRef<str>>(document_tokens: &[S], num_topics: usize) -> TopicSet {
    extract_topics_with(
        document_tokens,
        &TopicModelOptions {
            num_topics,
            ..TopicModelOptions::default()
        },
    )
}

/// Fit a topic model and report up to `num_words` keywords per topic.
///
/// Empty input or zero topics yields an empty set.
pub fn extract_topics_with<S: AsRef<str>>(
    document_tokens: &[S],
    options: &TopicModelOptions,
) -> TopicSet {
    let dictionary = Dictionary::from_tokens(document_tokens);
    if dictionary.is_empty() || options.num_topics == 0 {
        return TopicSet::new();
    }

    let corpus = dictionary.doc2bow(document_tokens);
    let words: Vec<usize> = corpus
        .iter()
        .flat_map(|&(id, count)| std::iter::repeat(id).take(count))
        .collect();
    let model = GibbsLda::fit(&words, dictionary.len(), options);

    debug!(
        tokens = words.len(),
        vocabulary = dictionary.len(),
        topics = options.num_topics,
        "fitted topic model"
    );

    (0..options.num_topics)
        .map(|topic| {
            let keywords = model
                .top_words(topic, options.num_words)
                .into_iter()
                .map(|(id, weight)| TopicKeyword::new(dictionary.term(id), weight))
                .collect();
            (topic, keywords)
        })
        .collect()
}

struct GibbsLda {
    vocabulary: usize,
    eta: f64,
    /// topic x word assignment counts
    topic_word: Vec<Vec<usize>>,
    topic_totals: Vec<usize>,
}

impl GibbsLda {
    fn fit(words: &[usize], vocabulary: usize, options: &TopicModelOptions) -> Self {
        let k = options.num_topics;
        let alpha = options.alpha.unwrap_or(1.0 / k as f64);
        let eta = options.eta.unwrap_or(1.0 / k as f64);
        let mut rng = StdRng::seed_from_u64(options.seed);

        let mut topic_word = vec![vec![0usize; vocabulary]; k];
        let mut topic_totals = vec![0usize; k];
        let mut doc_topic = vec![0usize; k];
        let mut assignments = Vec::with_capacity(words.len());

        for &w in words {
            let z = rng.gen_range(0..k);
            assignments.push(z);
            topic_word[z][w] += 1;
            topic_totals[z] += 1;
            doc_topic[z] += 1;
        }

        let v_eta = vocabulary as f64 * eta;
        let mut weights = vec![0.0f64; k];
        for _ in 0..options.iterations {
            for (i, &w) in words.iter().enumerate() {
                let old = assignments[i];
                topic_word[old][w] -= 1;
                topic_totals[old] -= 1;
                doc_topic[old] -= 1;

                let mut total = 0.0;
                for (t, weight) in weights.iter_mut().enumerate() {
                    *weight = (doc_topic[t] as f64 + alpha) * (topic_word[t][w] as f64 + eta)
                        / (topic_totals[t] as f64 + v_eta);
                    total += *weight;
                }

                let mut target = rng.gen::<f64>() * total;
                let mut new = k - 1;
                for (t, weight) in weights.iter().enumerate() {
                    if target < *weight {
                        new = t;
                        break;
                    }
                    target -= weight;
                }

                assignments[i] = new;
                topic_word[new][w] += 1;
                topic_totals[new] += 1;
                doc_topic[new] += 1;
            }
        }

        Self {
            vocabulary,
            eta,
            topic_word,
            topic_totals,
        }
    }

    /// Topic-word probability.
    fn phi(&self, topic: usize, word: usize) -> f64 {
        (self.topic_word[topic][word] as f64 + self.eta)
            / (self.topic_totals[topic] as f64 + self.vocabulary as f64 * self.eta)
    }

    /// Heaviest `n` words of a topic; ties go to the lower id.
    fn top_words(&self, topic: usize, n: usize) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> = (0..self.vocabulary)
            .map(|w| (w, self.phi(topic, w)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(n);
        ranked
    }
}
