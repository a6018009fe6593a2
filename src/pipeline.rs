//! Pipeline orchestration: sentence selection, abstractive summary and topics.

use crate::agent::{summarize_with, AgentError, Summarizer};
use crate::annotate::{extract_entities, resolve_coreferences};
use crate::config::DEFAULT_PROMPT;
use crate::select::select_from_document;
use crate::similarity::SimilarityError;
use crate::summary::{SummaryResult, TopicSet};
use crate::tokenize::{tokenize_with, TokenFilter};
use crate::topics::{extract_topics_with, TopicModelOptions};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("summarizer failed: {0}")]
    ExternalService(#[from] AgentError),
    #[error("internal computation error: {0}")]
    Computation(String),
}

impl From<SimilarityError> for PipelineError {
    fn from(err: SimilarityError) -> Self {
        PipelineError::Computation(err.to_string())
    }
}

/// Counts and prompt used by a [`Pipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Representative sentences to select
    pub sentence_count: usize,
    /// Instruction preamble for the summarizer
    pub prompt: String,
    pub topics: TopicModelOptions,
}

impl PipelineOptions {
    pub const DEFAULT_SENTENCES: usize = 5;
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            sentence_count: Self::DEFAULT_SENTENCES,
            prompt: DEFAULT_PROMPT.to_string(),
            topics: TopicModelOptions::default(),
        }
    }
}

/// Summarization pipeline over an injected [`Summarizer`].
pub struct Pipeline<S> {
    summarizer: S,
    options: PipelineOptions,
}

impl<S: Summarizer> Pipeline<S> {
    pub fn new(summarizer: S) -> Self {
        Self::with_options(summarizer, PipelineOptions::default())
    }

    pub fn with_options(summarizer: S, options: PipelineOptions) -> Self {
        Self {
            summarizer,
            options,
        }
    }

    /// Run the full pipeline over one transcript.
    ///
    /// Topic modeling runs while the summarizer request is in flight: on the
    /// tokio blocking pool when called inside a tokio runtime, inline on the
    /// calling task otherwise. Any summarizer failure fails the whole call; an
    /// empty document produces empty sentences and topics.
    pub async fn generate_enhanced_summary(
        &self,
        document_text: &str,
    ) -> Result<SummaryResult, PipelineError> {
        let representative: Vec<String> =
            select_from_document(document_text, self.options.sentence_count)?
                .into_iter()
                .map(str::to_string)
                .collect();
        let joined = representative.join(" ");
        let resolved = resolve_coreferences(&joined);
        debug!(
            sentences = representative.len(),
            chars = resolved.len(),
            "selected representative sentences"
        );

        let tokens = tokenize_with(document_text, TokenFilter::Alphabetic);
        let topic_options = self.options.topics.clone();
        let topics_task = async move {
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => runtime
                    .spawn_blocking(move || extract_topics_with(&tokens, &topic_options))
                    .await
                    .map_err(|e| PipelineError::Computation(e.to_string())),
                Err(_) => Ok(extract_topics_with(&tokens, &topic_options)),
            }
        };

        let summary = summarize_with(&self.summarizer, resolved, &self.options.prompt);
        let (summary, topics) = tokio::join!(summary, topics_task);
        let topics: TopicSet = topics?;
        let abstractive_summary = summary?;

        let entities = extract_entities(document_text);
        info!(
            sentences = representative.len(),
            topics = topics.len(),
            "summary complete"
        );

        Ok(SummaryResult::new(
            representative,
            abstractive_summary,
            topics,
            entities,
        ))
    }
}

/// Representative sentences only, without calling a summarizer.
pub fn extractive_summary(document_text: &str, n: usize) -> Result<Vec<String>, PipelineError> {
    Ok(select_from_document(document_text, n)?
        .into_iter()
        .map(str::to_string)
        .collect())
}

/// Topic model over the alphabetic tokens of a document.
pub fn document_topics(document_text: &str, options: &TopicModelOptions) -> TopicSet {
    let tokens = tokenize_with(document_text, TokenFilter::Alphabetic);
    extract_topics_with(&tokens, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::task::{Context, Poll, Wake, Waker};

    struct Noop;

    impl Wake for Noop {
        fn wake(self: Arc<Self>) {}
    }

    /// Polls `future` to completion on the current thread with no runtime.
    fn block_on<F: Future>(future: F) -> F::Output {
        let waker = Waker::from(Arc::new(Noop));
        let mut cx = Context::from_waker(&waker);
        let mut future = pin!(future);
        loop {
            if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
                return output;
            }
        }
    }

    struct Echo {
        calls: AtomicUsize,
    }

    impl Summarizer for Echo {
        async fn summarize(&self, prompt: &str) -> Result<String, AgentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("summary of {} chars", prompt.len()))
        }
    }

    struct Down;

    impl Summarizer for Down {
        async fn summarize(&self, _prompt: &str) -> Result<String, AgentError> {
            Err(AgentError::RequestFailed("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_assembles_all_fields() {
        let pipeline = Pipeline::new(Echo {
            calls: AtomicUsize::new(0),
        });
        let text = "Cats are mammals. Dogs are mammals too. The sky is blue.";
        let result = pipeline.generate_enhanced_summary(text).await.unwrap();

        assert_eq!(result.representative_sentences.len(), 3);
        assert!(result.abstractive_summary.starts_with("summary of"));
        assert!(!result.topics.is_empty() && result.topics.len() <= 3);
        assert!(result.entities.is_empty());
        assert_eq!(pipeline.summarizer.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_runs_outside_a_tokio_runtime() {
        let pipeline = Pipeline::new(Echo {
            calls: AtomicUsize::new(0),
        });
        let text = "Cats are mammals. Dogs are mammals too. The sky is blue.";
        let result = block_on(pipeline.generate_enhanced_summary(text)).unwrap();

        assert_eq!(result.representative_sentences.len(), 3);
        assert!(!result.topics.is_empty());
        assert_eq!(
            result.topics,
            document_topics(text, &TopicModelOptions::default())
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_multi_thread_runtime_matches_inline_topics() {
        let pipeline = Pipeline::new(Echo {
            calls: AtomicUsize::new(0),
        });
        let text = "Cats are mammals. Dogs are mammals too. The sky is blue.";
        let result = pipeline.generate_enhanced_summary(text).await.unwrap();
        assert_eq!(
            result.topics,
            document_topics(text, &TopicModelOptions::default())
        );
    }

    #[tokio::test]
    async fn test_summarizer_failure_fails_call() {
        let pipeline = Pipeline::new(Down);
        let err = pipeline
            .generate_enhanced_summary("One. Two. Three.")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::ExternalService(_)));
    }

    #[tokio::test]
    async fn test_sentence_count_option() {
        let options = PipelineOptions {
            sentence_count: 2,
            ..PipelineOptions::default()
        };
        let pipeline = Pipeline::with_options(
            Echo {
                calls: AtomicUsize::new(0),
            },
            options,
        );
        let text = "Cats are mammals. Dogs are mammals too. The sky is blue.";
        let result = pipeline.generate_enhanced_summary(text).await.unwrap();
        assert_eq!(
            result.representative_sentences,
            vec!["Cats are mammals.", "Dogs are mammals too."]
        );
    }

    #[test]
    fn test_extractive_summary() {
        let sentences = extractive_summary("Only one sentence here.", 5).unwrap();
        assert_eq!(sentences, vec!["Only one sentence here."]);
    }

    #[test]
    fn test_document_topics_empty() {
        assert!(document_topics("", &TopicModelOptions::default()).is_empty());
    }
}
