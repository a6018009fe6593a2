//! Video transcripts: YouTube link parsing, caption file parsing and caption fetching.
//!
//! Caption segments are assembled into one document by prefixing every segment with a
//! single space, so a transcript always starts with a space when it has any segment.

use crate::scraper::create_client;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const WATCH_URL: &str = "https://www.youtube.com/watch";
const YOUTUBE_ORIGIN: &str = "https://www.youtube.com";
const CAPTION_TRACKS_KEY: &str = "\"captionTracks\":";

#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("failed to fetch transcript: {0}")]
    FetchError(#[from] reqwest::Error),
    #[error("malformed caption XML: {0}")]
    XmlError(#[from] quick_xml::Error),
    #[error("malformed caption track list: {0}")]
    TrackList(#[from] serde_json::Error),
    #[error("caption text is not valid UTF-8")]
    Encoding,
    #[error("not a YouTube video link: {0}")]
    InvalidVideoUrl(String),
    #[error("invalid caption language: {0}")]
    InvalidLanguage(String),
    #[error("no transcript available for video {0}")]
    NoTranscript(String),
}

fn is_video_id(candidate: &str) -> bool {
    candidate.len() == 11
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Extract the video id from a YouTube link (or accept a bare id).
///
/// Handles `watch?v=`, `youtu.be/`, `/shorts/`, `/embed/` and `/live/` links.
pub fn video_id(link: &str) -> Option<String> {
    let link = link.trim();
    if is_video_id(link) {
        return Some(link.to_string());
    }

    let url = Url::parse(link).ok()?;
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");
    let candidate = match host {
        "youtu.be" => url.path_segments()?.next().map(str::to_string),
        "youtube.com" | "music.youtube.com" | "youtube-nocookie.com" => {
            let mut segments = url.path_segments()?;
            match segments.next() {
                Some("watch") => url
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned()),
                Some("shorts") | Some("embed") | Some("live") | Some("v") => {
                    segments.next().map(str::to_string)
                }
                _ => None,
            }
        }
        _ => None,
    }?;

    is_video_id(&candidate).then_some(candidate)
}

/// Preview image for a video.
pub fn thumbnail_url(video_id: &str) -> String {
    format!("http://img.youtube.com/vi/{}/0.jpg", video_id)
}

/// Join caption segments into a single transcript, each preceded by a space.
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    let mut transcript = String::new();
    for segment in segments {
        transcript.push(' ');
        transcript.push_str(segment.as_ref());
    }
    transcript
}

/// Parse SubRip (`.srt`) or WebVTT (`.vtt`) captions into text segments.
///
/// Each cue becomes one segment: its text lines joined by spaces with inline
/// markup removed. Headers, notes and style blocks carry no timing line and
/// are skipped.
pub fn parse_captions(input: &str) -> Vec<String> {
    let normalized = input.replace("\r\n", "\n");
    let mut segments = Vec::new();

    for block in normalized.split("\n\n") {
        let lines: Vec<&str> = block.lines().collect();
        let Some(timing) = lines.iter().position(|line| line.contains("-->")) else {
            continue;
        };
        let text = lines[timing + 1..]
            .iter()
            .map(|line| strip_markup(line))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let text = unescape_lenient(&text);
        if !text.is_empty() {
            segments.push(text);
        }
    }
    segments
}

/// Parse YouTube timedtext XML (`<text>` or `<p>` elements) into text segments.
pub fn parse_timedtext(xml: &str) -> Result<Vec<String>, TranscriptError> {
    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) if is_segment_tag(e.name().as_ref()) => {
                current = Some(String::new());
            }
            Event::Text(e) => {
                if let Some(raw) = current.as_mut() {
                    raw.push_str(std::str::from_utf8(&e).map_err(|_| TranscriptError::Encoding)?);
                }
            }
            Event::GeneralRef(e) => {
                if let Some(raw) = current.as_mut() {
                    raw.push('&');
                    raw.push_str(std::str::from_utf8(&e).map_err(|_| TranscriptError::Encoding)?);
                    raw.push(';');
                }
            }
            Event::End(e) if is_segment_tag(e.name().as_ref()) => {
                if let Some(raw) = current.take() {
                    // YouTube escapes entities twice
                    let text = unescape_lenient(&unescape_lenient(&raw));
                    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
                    if !text.is_empty() {
                        segments.push(text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(segments)
}

/// One caption track listed in a watch page's player response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// `"asr"` for automatic speech recognition tracks, absent for uploaded ones.
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }

    fn matches_language(&self, lang: &str) -> bool {
        self.language_code.eq_ignore_ascii_case(lang)
            || self
                .language_code
                .split('-')
                .next()
                .is_some_and(|base| base.eq_ignore_ascii_case(lang))
    }

    fn url(&self) -> String {
        if self.base_url.starts_with('/') {
            format!("{}{}", YOUTUBE_ORIGIN, self.base_url)
        } else {
            self.base_url.clone()
        }
    }
}

/// Caption tracks embedded in the HTML of a YouTube watch page.
///
/// A page without a `captionTracks` list yields no tracks.
pub fn caption_tracks(watch_html: &str) -> Result<Vec<CaptionTrack>, TranscriptError> {
    let Some(at) = watch_html.find(CAPTION_TRACKS_KEY) else {
        return Ok(Vec::new());
    };
    let list = &watch_html[at + CAPTION_TRACKS_KEY.len()..];
    // the list is followed by the rest of the player response
    let tracks = serde_json::Deserializer::from_str(list)
        .into_iter::<Vec<CaptionTrack>>()
        .next()
        .transpose()?
        .unwrap_or_default();
    Ok(tracks)
}

/// Pick the track to read for `lang`: an uploaded track first, then the
/// automatically generated one.
pub fn choose_track<'a>(tracks: &'a [CaptionTrack], lang: &str) -> Option<&'a CaptionTrack> {
    let find = |generated: bool| {
        tracks
            .iter()
            .find(|track| track.matches_language(lang) && track.is_generated() == generated)
    };
    find(false).or_else(|| find(true))
}

/// Download the caption track of a video and assemble it into a transcript.
pub async fn fetch_transcript(video_id: &str, lang: &str) -> Result<String, TranscriptError> {
    if !is_video_id(video_id) {
        return Err(TranscriptError::InvalidVideoUrl(video_id.to_string()));
    }
    if lang.is_empty() || !lang.chars().all(|c| c.is_ascii_alphabetic() || c == '-') {
        return Err(TranscriptError::InvalidLanguage(lang.to_string()));
    }

    let client = create_client()?;
    let watch_url = format!("{}?v={}", WATCH_URL, video_id);
    debug!(url = %watch_url, "fetching watch page");
    let html = client
        .get(&watch_url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let tracks = caption_tracks(&html)?;
    let track = choose_track(&tracks, lang)
        .ok_or_else(|| TranscriptError::NoTranscript(video_id.to_string()))?;
    debug!(
        language = %track.language_code,
        generated = track.is_generated(),
        "fetching captions"
    );
    let xml = client
        .get(track.url())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    if xml.trim().is_empty() {
        return Err(TranscriptError::NoTranscript(video_id.to_string()));
    }
    let segments = parse_timedtext(&xml)?;
    if segments.is_empty() {
        return Err(TranscriptError::NoTranscript(video_id.to_string()));
    }
    debug!(segments = segments.len(), "parsed captions");
    Ok(join_segments(&segments))
}

fn is_segment_tag(name: &[u8]) -> bool {
    name == b"text" || name == b"p"
}

fn unescape_lenient(raw: &str) -> String {
    quick_xml::escape::unescape(raw)
        .map(|text| text.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Remove `<...>` markup (italics, voice spans, timestamps) from a caption line.
fn strip_markup(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_tag = false;
    for c in line.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_from_links() {
        let id = "dQw4w9WgXcQ";
        for link in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "dQw4w9WgXcQ",
        ] {
            assert_eq!(video_id(link).as_deref(), Some(id), "{}", link);
        }
    }

    #[test]
    fn test_video_id_rejects_other_links() {
        assert_eq!(video_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(video_id("https://www.youtube.com/watch?v=short"), None);
        assert_eq!(video_id("not a link"), None);
    }

    const WATCH_PAGE: &str = r#"<script>var ytInitialPlayerResponse = {"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ\u0026lang=de\u0026kind=asr","name":{"simpleText":"German (auto-generated)"},"vssId":"a.de","languageCode":"de","kind":"asr","isTranslatable":true},{"baseUrl":"https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ\u0026lang=en-GB","name":{"simpleText":"English (United Kingdom)"},"vssId":".en-GB","languageCode":"en-GB","isTranslatable":true}],"audioTracks":[{"captionTrackIndices":[0,1]}]}}};</script>"#;

    #[test]
    fn test_caption_tracks_from_watch_page() {
        let tracks = caption_tracks(WATCH_PAGE).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].language_code, "de");
        assert!(tracks[0].is_generated());
        assert_eq!(
            tracks[0].base_url,
            "https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=de&kind=asr"
        );
        assert_eq!(tracks[1].kind, None);
    }

    #[test]
    fn test_page_without_captions_has_no_tracks() {
        let tracks = caption_tracks("<html><body>no player here</body></html>").unwrap();
        assert!(tracks.is_empty());
        assert!(choose_track(&tracks, "en").is_none());
    }

    #[test]
    fn test_choose_track_prefers_uploaded_then_generated() {
        let track = |code: &str, kind: Option<&str>| CaptionTrack {
            base_url: format!("/api/timedtext?lang={}", code),
            language_code: code.to_string(),
            kind: kind.map(str::to_string),
        };
        let tracks = vec![
            track("en", Some("asr")),
            track("en", None),
            track("fr", Some("asr")),
        ];

        assert_eq!(choose_track(&tracks, "en"), Some(&tracks[1]));
        assert_eq!(choose_track(&tracks, "fr"), Some(&tracks[2]));
        assert_eq!(choose_track(&tracks, "es"), None);
        assert_eq!(
            tracks[0].url(),
            "https://www.youtube.com/api/timedtext?lang=en"
        );

        let regional = caption_tracks(WATCH_PAGE).unwrap();
        assert_eq!(
            choose_track(&regional, "en").map(|t| t.language_code.as_str()),
            Some("en-GB")
        );
    }

    #[test]
    fn test_thumbnail_url() {
        assert_eq!(
            thumbnail_url("dQw4w9WgXcQ"),
            "http://img.youtube.com/vi/dQw4w9WgXcQ/0.jpg"
        );
    }

    #[test]
    fn test_join_segments_prefixes_spaces() {
        assert_eq!(join_segments(&["hello there", "general"]), " hello there general");
        assert_eq!(join_segments::<&str>(&[]), "");
    }

    #[test]
    fn test_parse_srt() {
        let srt = "1\r\n00:00:01,000 --> 00:00:02,500\r\nHello <i>world</i>.\r\n\r\n2\r\n00:00:03,000 --> 00:00:04,000\r\nSecond line\r\ncontinues here.\r\n";
        assert_eq!(
            parse_captions(srt),
            vec!["Hello world.", "Second line continues here."]
        );
    }

    #[test]
    fn test_parse_vtt_skips_header_and_notes() {
        let vtt = "WEBVTT\n\nNOTE a comment\n\ncue-1\n00:00.000 --> 00:01.000 align:start\n<v Roger>Fish &amp; chips\n\n00:01.000 --> 00:02.000\nDone.\n";
        assert_eq!(parse_captions(vtt), vec!["Fish & chips", "Done."]);
    }

    #[test]
    fn test_parse_timedtext() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.5" dur="1.2">Rust is &amp;#39;fast&amp;#39;</text><text start="2" dur="1">and   safe</text><text start="3" dur="1"></text></transcript>"#;
        assert_eq!(parse_timedtext(xml).unwrap(), vec!["Rust is 'fast'", "and safe"]);
    }

    #[test]
    fn test_parse_timedtext_format3() {
        let xml = r#"<timedtext format="3"><body><p t="0" d="900"><s>hello</s><s> world</s></p><p t="1000" d="500">bye</p></body></timedtext>"#;
        assert_eq!(parse_timedtext(xml).unwrap(), vec!["hello world", "bye"]);
    }

    #[test]
    fn test_parse_timedtext_rejects_broken_xml() {
        assert!(parse_timedtext("<transcript><text>oops</transcript>").is_err());
    }
}
