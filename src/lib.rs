//! # Recap
//!
//! Transcript summarisation that mixes extractive and abstractive techniques.
//!
//! ## Features
//!
//! - **Extractive ranking**: sentences scored by aggregate cosine similarity of positional
//!   presence vectors
//! - **Abstractive summary**: representative sentences sent to Gemini or an OpenAI-compatible model
//! - **Topics**: seeded single-document LDA keyword groups
//! - **Sources**: YouTube captions, webpages, caption files, PDFs and plain text

pub mod agent;
pub mod annotate;
pub mod config;
pub mod pipeline;
pub mod scraper;
pub mod select;
pub mod similarity;
pub mod source;
pub mod summary;
pub mod tokenize;
pub mod topics;
pub mod transcript;
pub mod ui;
pub mod vector;

pub use agent::{AgentError, ProviderSummarizer, Summarizer};
pub use config::Config;
pub use pipeline::{Pipeline, PipelineError, PipelineOptions};
pub use select::select_representative;
pub use summary::{SummaryResult, TopicKeyword, TopicSet};
pub use tokenize::tokenize_and_filter;
pub use topics::extract_topics;
