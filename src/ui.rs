//! Terminal rendering of summaries, sentences and topics.

use crate::source::LoadedDocument;
use crate::summary::{format_topic, SummaryResult, TopicSet};
use colored::Colorize;
use std::fmt::Write;

/// Full report for one summarised document.
pub fn render_report(document: &LoadedDocument, summary: &SummaryResult) -> String {
    let mut out = String::new();
    let heading = document.title.as_deref().unwrap_or(&document.origin);
    let _ = writeln!(out, "=== {} ===\n", heading.bold());
    if let Some(thumbnail) = &document.thumbnail {
        let _ = writeln!(out, "🖼️  {}\n", thumbnail.dimmed());
    }

    let _ = writeln!(out, "{}", "📝 Abstractive Summary:".green().bold());
    let _ = writeln!(out, "{}\n", summary.abstractive_summary.trim());

    out.push_str(&render_sentences(&summary.representative_sentences));
    out.push('\n');
    out.push_str(&render_topics(&summary.topics));

    let _ = writeln!(out, "\n{}", "🏷️  Named Entities:".green().bold());
    if summary.entities.is_empty() {
        let _ = writeln!(out, "  {}", "(none)".dimmed());
    } else {
        let _ = writeln!(out, "  {}", summary.entities.join(", "));
    }
    out
}

/// Numbered list of representative sentences, in rank order.
pub fn render_sentences(sentences: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "📌 Representative Sentences:".green().bold());
    if sentences.is_empty() {
        let _ = writeln!(out, "  {}", "(none)".dimmed());
    }
    for (rank, sentence) in sentences.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", rank + 1, sentence);
    }
    out
}

/// One line per topic in `0.083*"word" + ...` form.
pub fn render_topics(topics: &TopicSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "💡 Key Topics:".green().bold());
    if topics.is_empty() {
        let _ = writeln!(out, "  {}", "(none)".dimmed());
    }
    for (id, keywords) in topics {
        let _ = writeln!(out, "  {} {}", format!("[{}]", id).cyan(), format_topic(keywords));
    }
    out
}
