//! y2t - A Rust CLI tool for extracting YouTube video transcripts
//!
//! This library resolves a video identifier from a URL, retrieves the caption
//! track in the preferred language and delivers the formatted transcript to
//! stdout, a file, a title-named file in a directory, and/or the clipboard.

pub mod cli;
pub mod config;
pub mod extractors;
pub mod output;
pub mod transcript;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use cli::{Cli, OutputFormat};
pub use config::Config;
pub use extractors::{extract_video_id, CaptionSource};
pub use transcript::{FetchedTranscript, TranscriptEntry, TranscriptPipeline};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Y2tError>;

/// Error types specific to y2t
#[derive(thiserror::Error, Debug)]
pub enum Y2tError {
    #[error("Invalid YouTube URL")]
    InvalidUrl,

    #[error("Failed to get video title: {0}")]
    MetadataFetchFailed(String),

    #[error("Transcripts are disabled for this video ({video_id})")]
    TranscriptsDisabled { video_id: String },

    #[error(
        "No transcript found for video {video_id} in languages {requested:?} (available: {available:?})"
    )]
    NoTranscriptFound {
        video_id: String,
        requested: Vec<String>,
        available: Vec<String>,
    },

    #[error("The video is no longer available ({0})")]
    VideoUnavailable(String),

    #[error("The video {video_id} is unplayable: {reason}")]
    VideoUnplayable { video_id: String, reason: String },

    #[error("YouTube is blocking requests: {0}")]
    RequestBlocked(String),

    #[error("Unable to parse YouTube response: {0}")]
    Unparsable(String),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Y2tError {
    /// Whether the failure means no transcript could be obtained for the video.
    pub fn is_transcript_unavailable(&self) -> bool {
        matches!(
            self,
            Y2tError::TranscriptsDisabled { .. }
                | Y2tError::NoTranscriptFound { .. }
                | Y2tError::VideoUnavailable(_)
                | Y2tError::VideoUnplayable { .. }
                | Y2tError::RequestBlocked(_)
        )
    }
}
