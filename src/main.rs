//! Recap CLI - transcript summarisation
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use dialoguer::Input;
use recap::pipeline::{document_topics, extractive_summary};
use recap::source::{load as load_source, Source};
use recap::{ui, Config, Pipeline, ProviderSummarizer, SummaryResult};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "recap")]
#[command(author, version, about = "Summarise transcripts with sentence ranking, topics and LLMs", long_about = None)]
struct Cli {
    /// Path to a recap.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a transcript: representative sentences, LLM summary and topics
    Summarise {
        /// YouTube link, webpage URL, file path or `-` for stdin
        source: Option<String>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
        /// Number of representative sentences
        #[arg(long)]
        sentences: Option<usize>,
        /// Number of topics
        #[arg(long)]
        topics: Option<usize>,
        /// Caption language for YouTube videos
        #[arg(long, default_value = "en")]
        lang: String,
    },
    /// Select representative sentences without calling an LLM
    Extract {
        /// YouTube link, webpage URL, file path or `-` for stdin
        source: Option<String>,
        /// Number of representative sentences
        #[arg(long)]
        sentences: Option<usize>,
        /// Print the sentences as JSON
        #[arg(long)]
        json: bool,
        /// Caption language for YouTube videos
        #[arg(long, default_value = "en")]
        lang: String,
    },
    /// Fit a topic model over a transcript
    Topics {
        /// YouTube link, webpage URL, file path or `-` for stdin
        source: Option<String>,
        /// Number of topics
        #[arg(long)]
        topics: Option<usize>,
        /// Keywords per topic
        #[arg(long)]
        keywords: Option<usize>,
        /// Sampler seed
        #[arg(long)]
        seed: Option<u64>,
        /// Print the topics as JSON
        #[arg(long)]
        json: bool,
        /// Caption language for YouTube videos
        #[arg(long, default_value = "en")]
        lang: String,
    },
    /// Print the JSON schema of the summary output
    Schema,
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Summarise {
            source,
            json,
            sentences,
            topics,
            lang,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let mut options = config.pipeline_options();
            if let Some(n) = sentences {
                options.sentence_count = n;
            }
            if let Some(k) = topics {
                options.topics.num_topics = k;
            }

            let source = resolve_source(source)?;
            let document = load_source(&source, &lang).await?;
            let summarizer = ProviderSummarizer::from_config(&config)?;
            let pipeline = Pipeline::with_options(summarizer, options);
            let summary = pipeline
                .generate_enhanced_summary(&document.text)
                .await
                .with_context(|| format!("failed to summarise {}", document.origin))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", ui::render_report(&document, &summary));
            }
        }
        Commands::Extract {
            source,
            sentences,
            json,
            lang,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let n = sentences.unwrap_or(config.pipeline.sentences);
            let source = resolve_source(source)?;
            let document = load_source(&source, &lang).await?;
            let selected = extractive_summary(&document.text, n)?;

            if json {
                let value = serde_json::json!({ "representative_sentences": selected });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!("{}", ui::render_sentences(&selected));
            }
        }
        Commands::Topics {
            source,
            topics,
            keywords,
            seed,
            json,
            lang,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let mut options = config.pipeline_options().topics;
            if let Some(k) = topics {
                options.num_topics = k;
            }
            if let Some(w) = keywords {
                options.num_words = w;
            }
            if let Some(s) = seed {
                options.seed = s;
            }

            let source = resolve_source(source)?;
            let document = load_source(&source, &lang).await?;
            let topic_set = document_topics(&document.text, &options);

            if json {
                println!("{}", serde_json::to_string_pretty(&topic_set)?);
            } else {
                print!("{}", ui::render_topics(&topic_set));
            }
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(SummaryResult);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "recap", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Logs go to stderr so JSON on stdout stays parseable
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("recap=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Use the given argument, piped stdin, or ask interactively
fn resolve_source(arg: Option<String>) -> anyhow::Result<Source> {
    if let Some(arg) = arg {
        return Ok(Source::from_arg(&arg));
    }
    if atty::isnt(atty::Stream::Stdin) {
        return Ok(Source::Stdin);
    }

    let answer: String = Input::new()
        .with_prompt("YouTube link, URL or file (empty to paste a transcript)")
        .allow_empty(true)
        .interact_text()?;
    if !answer.trim().is_empty() {
        return Ok(Source::from_arg(&answer));
    }

    let text = edit::edit("").context("failed to open editor")?;
    Ok(Source::Text(text))
}
