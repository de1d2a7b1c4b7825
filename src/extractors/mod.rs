use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

pub mod oembed;
pub mod youtube;

pub use oembed::{get_video_info, MetadataSource, OEmbedClient, VideoInfo};
pub use youtube::YoutubeCaptions;

use crate::transcript::{TranscriptEntry, TranscriptList, TranscriptTrack};
use crate::{Result, Y2tError};

/// Recognized URL shapes, tried in order: watch query, short link, embed
fn url_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"youtube\.com/watch\?v=([^&\n?#]+)",
            r"youtu\.be/([^&\n?#]+)",
            r"youtube\.com/embed/([^&\n?#]+)",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("valid video URL pattern"))
        .collect()
    })
}

/// Extract the video identifier from a YouTube URL.
///
/// The first matching shape wins; anything else is rejected.
pub fn extract_video_id(url: &str) -> Result<String> {
    url_patterns()
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(Y2tError::InvalidUrl)
}

/// Trait for retrieving caption data for a video
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// List the caption tracks available for a video
    async fn list_transcripts(&self, video_id: &str) -> Result<TranscriptList>;

    /// Retrieve the ordered caption entries of one track
    async fn fetch_entries(&self, track: &TranscriptTrack) -> Result<Vec<TranscriptEntry>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id_valid_urls() {
        let cases = [
            "https://www.youtube.com/watch?v=jNQXAC9IVRw",
            "https://youtu.be/jNQXAC9IVRw",
            "https://www.youtube.com/embed/jNQXAC9IVRw",
        ];

        for url in cases {
            assert_eq!(extract_video_id(url).unwrap(), "jNQXAC9IVRw", "url: {}", url);
        }
    }

    #[test]
    fn test_extract_video_id_stops_at_query_delimiters() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=jNQXAC9IVRw&t=42s").unwrap(),
            "jNQXAC9IVRw"
        );
        assert_eq!(
            extract_video_id("https://youtu.be/jNQXAC9IVRw?si=abc").unwrap(),
            "jNQXAC9IVRw"
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/jNQXAC9IVRw#start").unwrap(),
            "jNQXAC9IVRw"
        );
    }

    #[test]
    fn test_extract_video_id_invalid_url() {
        let err = extract_video_id("https://invalid-url.com").unwrap_err();
        assert!(matches!(err, Y2tError::InvalidUrl));
        assert!(err.to_string().contains("Invalid YouTube URL"));
    }

    #[test]
    fn test_extract_video_id_rejects_empty_id() {
        assert!(extract_video_id("https://www.youtube.com/watch?v=").is_err());
        assert!(extract_video_id("").is_err());
    }
}
