//! `Accept` header parsing.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

/// What to do with an `Accept` entry whose `q` parameter is not a valid qvalue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedQuality {
    /// Keep the media type with quality 1.0.
    #[default]
    FallbackToOne,
    /// Drop the entry.
    Discard,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaTypeCandidate {
    pub media_type: String,
    pub quality: f32,
}

fn qvalue_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*q=\s*(0(?:\.[0-9]{1,3})?|1(?:\.0{1,3})?)\s*$")
            .expect("qvalue pattern is valid")
    })
}

fn parse_quality(param: &str) -> Option<f32> {
    qvalue_re()
        .captures(param)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parse an `Accept` header into candidates, most preferred first.
///
/// Media types are trimmed and lower-cased. The first occurrence of a type
/// wins. Only the first parameter after the type is looked at, and only as a
/// `q=` weight. Equal weights keep header order.
pub fn parse_accept(accept: &str, malformed: MalformedQuality) -> Vec<MediaTypeCandidate> {
    let mut candidates: Vec<MediaTypeCandidate> = Vec::new();

    for entry in accept.split(',') {
        let mut parts = entry.split(';');
        let media_type = parts.next().unwrap_or_default().trim().to_ascii_lowercase();

        if media_type.is_empty() || candidates.iter().any(|c| c.media_type == media_type) {
            continue;
        }

        let quality = match parts.next() {
            None => 1.0,
            Some(param) => match (parse_quality(param), malformed) {
                (Some(q), _) => q,
                (None, MalformedQuality::FallbackToOne) => 1.0,
                (None, MalformedQuality::Discard) => {
                    tracing::trace!(media_type = %media_type, param, "discarding malformed qvalue");
                    continue;
                }
            },
        };

        candidates.push(MediaTypeCandidate { media_type, quality });
    }

    // stable: ties stay in header order
    candidates.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    candidates
}

/// Ranked media types of an `Accept` header value, qualities dropped.
pub fn sorted_media_types(accept: &str, malformed: MalformedQuality) -> Vec<String> {
    parse_accept(accept, malformed)
        .into_iter()
        .map(|candidate| candidate.media_type)
        .collect()
}
