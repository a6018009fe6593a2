//! Document sources: local files, webpages, YouTube captions and stdin.

use crate::scraper::{self, ScraperError};
use crate::transcript::{self, TranscriptError};
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to extract PDF text from {path}: {reason}")]
    Pdf { path: String, reason: String },
    #[error(transparent)]
    Transcript(#[from] TranscriptError),
    #[error(transparent)]
    Scraper(#[from] ScraperError),
    #[error("no text found in {0}")]
    Empty(String),
}

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Read everything from standard input
    Stdin,
    File(PathBuf),
    /// Any http(s) page other than a YouTube video
    Url(String),
    /// YouTube video id
    Youtube(String),
    /// Text supplied directly (e.g. from an editor)
    Text(String),
}

impl Source {
    /// Interpret a command-line argument: `-` is stdin, YouTube links and ids
    /// are videos, other http(s) links are webpages, anything else is a path.
    pub fn from_arg(arg: &str) -> Self {
        let arg = arg.trim();
        if arg == "-" {
            return Source::Stdin;
        }
        if arg.starts_with("http://") || arg.starts_with("https://") {
            return match transcript::video_id(arg) {
                Some(id) => Source::Youtube(id),
                None => Source::Url(arg.to_string()),
            };
        }
        if !Path::new(arg).exists() {
            if let Some(id) = transcript::video_id(arg) {
                return Source::Youtube(id);
            }
        }
        Source::File(PathBuf::from(arg))
    }

    /// Human-readable origin for logs and reports.
    pub fn describe(&self) -> String {
        match self {
            Source::Stdin => "stdin".to_string(),
            Source::File(path) => path.display().to_string(),
            Source::Url(url) => url.clone(),
            Source::Youtube(id) => format!("https://www.youtube.com/watch?v={}", id),
            Source::Text(_) => "editor".to_string(),
        }
    }
}

/// A loaded transcript ready for the pipeline.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub origin: String,
    pub title: Option<String>,
    /// Preview image for videos
    pub thumbnail: Option<String>,
    pub text: String,
}

impl LoadedDocument {
    fn new(origin: String, text: String) -> Self {
        Self {
            origin,
            title: None,
            thumbnail: None,
            text,
        }
    }
}

/// Load the text of `source`. Captions are fetched in `lang`.
///
/// A source that yields only whitespace is reported as [`SourceError::Empty`].
pub async fn load(source: &Source, lang: &str) -> Result<LoadedDocument, SourceError> {
    let origin = source.describe();
    let document = match source {
        Source::Stdin => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| SourceError::Io {
                    path: origin.clone(),
                    source: e,
                })?;
            LoadedDocument::new(origin, text)
        }
        Source::File(path) => LoadedDocument::new(origin, read_file(path)?),
        Source::Url(url) => {
            let content = scraper::fetch_content(url).await?;
            LoadedDocument {
                title: content.title,
                ..LoadedDocument::new(origin, content.text)
            }
        }
        Source::Youtube(id) => {
            let text = transcript::fetch_transcript(id, lang).await?;
            LoadedDocument {
                thumbnail: Some(transcript::thumbnail_url(id)),
                ..LoadedDocument::new(origin, text)
            }
        }
        Source::Text(text) => LoadedDocument::new(origin, text.clone()),
    };

    if document.text.trim().is_empty() {
        return Err(SourceError::Empty(document.origin));
    }
    info!(origin = %document.origin, chars = document.text.len(), "loaded document");
    Ok(document)
}

/// Read a local file, decoding captions and PDFs by extension.
pub fn read_file(path: &Path) -> Result<String, SourceError> {
    let display = path.display().to_string();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    if extension.as_deref() == Some("pdf") {
        return pdf_extract::extract_text(path).map_err(|e| SourceError::Pdf {
            path: display,
            reason: e.to_string(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| SourceError::Io {
        path: display,
        source: e,
    })?;
    match extension.as_deref() {
        Some("srt") | Some("vtt") => {
            Ok(transcript::join_segments(&transcript::parse_captions(&content)))
        }
        Some("xml") => Ok(transcript::join_segments(&transcript::parse_timedtext(
            &content,
        )?)),
        _ => Ok(content),
    }
}
