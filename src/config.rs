//! Configuration loading and management for recap.
//!
//! Loads settings from `recap.toml` with environment variable overrides for sensitive data.
//! Every section has defaults, so running without a config file works as long as an API
//! key is available in the environment.

use crate::pipeline::PipelineOptions;
use crate::topics::TopicModelOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Instruction preamble placed before the representative sentences.
pub const DEFAULT_PROMPT: &str = "You are YouTube video summarizer. You will be taking the transcript text
and summarizing the entire video and providing the important summary in points
within 550 words. Please provide the summary of the text given here:  ";

const CONFIG_FILE: &str = "recap.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("missing required API key for provider: {0}")]
    MissingApiKey(String),
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

/// LLM provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// LLM provider: "gemini" or "openai"
    pub provider: String,
    /// Model identifier (e.g., "gemini-2.0-flash")
    pub model: String,
    /// Instruction prompt prepended to the representative sentences
    pub prompt: String,
    /// Base URL for OpenAI-compatible endpoints
    pub base_url: Option<String>,
}

/// API keys configuration (loaded from environment)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub gemini_key: Option<String>,
    #[serde(default)]
    pub openai_key: Option<String>,
}

/// Extractive pipeline and topic model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of representative sentences to select
    pub sentences: usize,
    /// Number of topics to fit
    pub topics: usize,
    /// Keywords reported per topic
    pub keywords: usize,
    /// Seed for the topic model sampler
    pub seed: u64,
    /// Gibbs sampling sweeps over the document
    pub iterations: usize,
    /// Document-topic prior, `1 / topics` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    /// Topic-word prior, `1 / topics` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<f64>,
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Load configuration from the default location (recap.toml in cwd or home).
    ///
    /// A missing file yields the default configuration.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("no config file found, using defaults");
                let mut config = Config::default();
                config.apply_env();
                Ok(config)
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        config.apply_env();
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse configuration from TOML text without consulting the environment
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Override API keys from environment variables
    fn apply_env(&mut self) {
        let gemini = std::env::var("GEMINI_API_KEY").or_else(|_| std::env::var("GOOGLE_API_KEY"));
        if let Ok(key) = gemini {
            self.api.gemini_key = Some(key);
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.api.openai_key = Some(key);
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        let home_config = dirs::home_dir()?
            .join(".config")
            .join("recap")
            .join(CONFIG_FILE);
        home_config.exists().then_some(home_config)
    }

    /// Get the API key for the configured provider
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        match self.agent.provider.as_str() {
            "gemini" => self
                .api
                .gemini_key
                .as_deref()
                .ok_or_else(|| ConfigError::MissingApiKey("gemini".to_string())),
            "openai" => self
                .api
                .openai_key
                .as_deref()
                .ok_or_else(|| ConfigError::MissingApiKey("openai".to_string())),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }

    /// Pipeline options described by this configuration
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            sentence_count: self.pipeline.sentences,
            prompt: self.agent.prompt.clone(),
            topics: TopicModelOptions {
                num_topics: self.pipeline.topics,
                num_words: self.pipeline.keywords,
                seed: self.pipeline.seed,
                iterations: self.pipeline.iterations,
                alpha: self.pipeline.alpha,
                eta: self.pipeline.eta,
            },
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            base_url: None,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let topics = TopicModelOptions::default();
        Self {
            sentences: PipelineOptions::DEFAULT_SENTENCES,
            topics: topics.num_topics,
            keywords: topics.num_words,
            seed: topics.seed,
            iterations: topics.iterations,
            alpha: topics.alpha,
            eta: topics.eta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
[agent]
provider = "openai"
model = "gpt-4o-mini"
prompt = "Summarise:"
base_url = "http://localhost:8080/v1"

[api]
openai_key = "sk-test"

[pipeline]
sentences = 3
topics = 2
keywords = 4
seed = 7
iterations = 50
alpha = 0.1
eta = 0.01
"#,
        )
        .unwrap();

        assert_eq!(config.agent.provider, "openai");
        assert_eq!(config.agent.base_url.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(config.api_key().unwrap(), "sk-test");

        let options = config.pipeline_options();
        assert_eq!(options.sentence_count, 3);
        assert_eq!(options.prompt, "Summarise:");
        assert_eq!(options.topics.num_topics, 2);
        assert_eq!(options.topics.num_words, 4);
        assert_eq!(options.topics.seed, 7);
        assert_eq!(options.topics.iterations, 50);
        assert_eq!(options.topics.alpha, Some(0.1));
        assert_eq!(options.topics.eta, Some(0.01));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.agent.provider, "gemini");
        assert_eq!(config.agent.prompt, DEFAULT_PROMPT);
        assert_eq!(config.pipeline.sentences, 5);
        assert_eq!(config.pipeline.topics, 3);
        assert_eq!(config.pipeline.keywords, 5);
        assert_eq!(config.pipeline.seed, 100);
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let config = Config::parse("[pipeline]\nsentences = 8\n").unwrap();
        assert_eq!(config.pipeline.sentences, 8);
        assert_eq!(config.pipeline.topics, 3);
    }

    #[test]
    fn test_missing_key_for_provider() {
        let config = Config::parse("[agent]\nprovider = \"gemini\"\n").unwrap();
        assert!(matches!(config.api_key(), Err(ConfigError::MissingApiKey(p)) if p == "gemini"));
    }

    #[test]
    fn test_unknown_provider() {
        let config = Config::parse("[agent]\nprovider = \"claude\"\n").unwrap();
        assert!(matches!(config.api_key(), Err(ConfigError::UnknownProvider(p)) if p == "claude"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pipeline]\ntopics = 4").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.pipeline.topics, 4);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        assert!(matches!(
            Config::parse("[pipeline\nsentences = "),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }
}
