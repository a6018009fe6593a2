//! Web scraping module for transcript and article text extraction.
//!
//! Uses reqwest for fetching and scraper for HTML parsing.

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// User-Agent string identifying this client
const USER_AGENT: &str = concat!("recap/", env!("CARGO_PKG_VERSION"));

/// Default timeout for HTTP requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocks with fewer words are captions, bylines or navigation
const MIN_BLOCK_WORDS: usize = 4;

/// Containers tried in order before falling back to the whole page
const CONTAINER_SELECTORS: &[&str] = &[
    ".transcript",
    "#transcript",
    "article",
    "main",
    "[role='main']",
];

/// Page furniture whose text is never part of the document
const BOILERPLATE_TAGS: &[&str] = &["nav", "header", "footer", "aside", "form"];

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),
    #[error("no content found at URL")]
    NoContent,
}

/// Extracted content from a webpage
#[derive(Debug, Clone)]
pub struct WebContent {
    /// Page title
    pub title: Option<String>,
    /// Main text content
    pub text: String,
}

/// Create a configured HTTP client
pub(crate) fn create_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
}

/// Fetch and extract content from a URL
pub async fn fetch_content(url: &str) -> Result<WebContent, ScraperError> {
    let client = create_client()?;

    let response = client.get(url).send().await?.error_for_status()?;
    let html = response.text().await?;
    debug!(url, bytes = html.len(), "fetched page");

    parse_page(&html)
}

/// Extract title and prose text from an HTML document
pub fn parse_page(html: &str) -> Result<WebContent, ScraperError> {
    let document = Html::parse_document(html);
    let title = extract_title(&document);
    let text = extract_text(&document);

    if text.trim().is_empty() {
        return Err(ScraperError::NoContent);
    }

    Ok(WebContent { title, text })
}

/// Extract the page title from <title> or <h1>
fn extract_title(document: &Html) -> Option<String> {
    ["title", "h1"].into_iter().find_map(|tag| {
        let selector = Selector::parse(tag).ok()?;
        let element = document.select(&selector).next()?;
        let title: String = element.text().collect();
        let title = title.trim();
        (!title.is_empty()).then(|| title.to_string())
    })
}

/// Prose of the page as sentence-terminated blocks separated by blank lines.
///
/// A transcript or article container is preferred over the whole page.
fn extract_text(document: &Html) -> String {
    for selector in CONTAINER_SELECTORS {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };
        if let Some(container) = document.select(&selector).next() {
            let text = prose_blocks(container);
            if !text.is_empty() {
                return text;
            }
        }
    }

    prose_blocks(document.root_element())
}

fn prose_blocks(container: ElementRef<'_>) -> String {
    let Ok(block_selector) = Selector::parse("p, blockquote") else {
        return String::new();
    };

    container
        .select(&block_selector)
        .filter(|block| !in_boilerplate(block))
        .filter_map(|block| {
            let words: Vec<&str> = block.text().flat_map(str::split_whitespace).collect();
            (words.len() >= MIN_BLOCK_WORDS).then(|| terminate(words.join(" ")))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn in_boilerplate(block: &ElementRef<'_>) -> bool {
    block.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|element| BOILERPLATE_TAGS.contains(&element.name()))
    })
}

/// End a block with a period unless it already ends a sentence, so that
/// unpunctuated blocks do not run into the next one.
fn terminate(mut block: String) -> String {
    let last = block
        .trim_end_matches(['"', '\'', ')', '\u{201d}', '\u{2019}'])
        .chars()
        .next_back();
    if !matches!(last, Some('.' | '!' | '?')) {
        block.push('.');
    }
    block
}
