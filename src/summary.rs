//! SummaryResult struct - the structured output of one pipeline run.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A keyword and its weight within one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TopicKeyword {
    pub keyword: String,
    pub weight: f64,
}

impl TopicKeyword {
    pub fn new(keyword: impl Into<String>, weight: f64) -> Self {
        Self {
            keyword: keyword.into(),
            weight,
        }
    }
}

impl fmt::Display for TopicKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}*\"{}\"", self.weight, self.keyword)
    }
}

/// Topic id to its keywords, heaviest first.
pub type TopicSet = BTreeMap<usize, Vec<TopicKeyword>>;

/// Render one topic as `0.083*"word" + 0.071*"other"`.
pub fn format_topic(keywords: &[TopicKeyword]) -> String {
    keywords
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Structured summary of a transcript.
///
/// Representative sentences are in rank order (most representative first).
/// Entities are always empty; named-entity recognition is a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SummaryResult {
    /// Sentences selected from the transcript, highest score first
    pub representative_sentences: Vec<String>,
    /// Summary written by the language model
    pub abstractive_summary: String,
    /// Topic keyword groups fitted over the whole transcript
    pub topics: TopicSet,
    /// Named entities mentioned in the transcript
    pub entities: Vec<String>,
}

impl SummaryResult {
    /// Create a new summary result
    pub fn new(
        representative_sentences: Vec<String>,
        abstractive_summary: String,
        topics: TopicSet,
        entities: Vec<String>,
    ) -> Self {
        Self {
            representative_sentences,
            abstractive_summary,
            topics,
            entities,
        }
    }
}
