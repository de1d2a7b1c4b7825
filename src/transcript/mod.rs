use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

use crate::config::Config;
use crate::extractors::{
    get_video_info, CaptionSource, MetadataSource, OEmbedClient, YoutubeCaptions,
};
use crate::output::clipboard::{ClipboardSink, SystemClipboard};
use crate::output::{self, OutputRequest, OutputTarget};
use crate::{Result, Y2tError};

pub mod parser;

/// One caption segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Segment text
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

/// A caption track available for a video
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptTrack {
    pub video_id: String,

    /// Display name, e.g. "English (auto-generated)"
    pub language: String,

    pub language_code: String,

    /// Auto-generated (ASR) rather than uploaded by the creator
    pub is_generated: bool,

    pub is_translatable: bool,

    /// Timedtext URL for this track
    pub base_url: String,
}

/// All caption tracks of one video, split by origin
#[derive(Debug, Clone, Default)]
pub struct TranscriptList {
    pub video_id: String,
    pub manual: Vec<TranscriptTrack>,
    pub generated: Vec<TranscriptTrack>,
}

impl TranscriptList {
    pub fn new(video_id: impl Into<String>, tracks: Vec<TranscriptTrack>) -> Self {
        let (generated, manual): (Vec<_>, Vec<_>) =
            tracks.into_iter().partition(|t| t.is_generated);
        Self {
            video_id: video_id.into(),
            manual,
            generated,
        }
    }

    /// Pick the first track matching the language preference.
    ///
    /// Languages are tried in order; for each one a manually created track
    /// is preferred over a generated one.
    pub fn find_transcript(&self, languages: &[String]) -> Result<&TranscriptTrack> {
        languages
            .iter()
            .find_map(|code| {
                self.manual
                    .iter()
                    .chain(self.generated.iter())
                    .find(|track| &track.language_code == code)
            })
            .ok_or_else(|| Y2tError::NoTranscriptFound {
                video_id: self.video_id.clone(),
                requested: languages.to_vec(),
                available: self.language_codes(),
            })
    }

    pub fn language_codes(&self) -> Vec<String> {
        self.manual
            .iter()
            .chain(self.generated.iter())
            .map(|track| track.language_code.clone())
            .collect()
    }
}

impl fmt::Display for TranscriptList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "For this video ({}) transcripts are available in the following languages:",
            self.video_id
        )?;

        for (heading, tracks) in [
            ("MANUALLY CREATED", &self.manual),
            ("GENERATED", &self.generated),
        ] {
            writeln!(f)?;
            writeln!(f, "({})", heading)?;
            if tracks.is_empty() {
                writeln!(f, "None")?;
            }
            for track in tracks {
                let translatable = if track.is_translatable {
                    " [TRANSLATABLE]"
                } else {
                    ""
                };
                writeln!(
                    f,
                    " - {} (\"{}\"){}",
                    track.language_code, track.language, translatable
                )?;
            }
        }

        Ok(())
    }
}

/// Caption entries retrieved for the selected track
#[derive(Debug, Clone, Serialize)]
pub struct FetchedTranscript {
    pub video_id: String,
    pub language: String,
    pub language_code: String,
    pub is_generated: bool,
    pub entries: Vec<TranscriptEntry>,
}

/// Fetches a transcript and delivers it to the requested outputs
pub struct TranscriptPipeline {
    captions: Box<dyn CaptionSource>,
    metadata: Box<dyn MetadataSource>,
    clipboard: Box<dyn ClipboardSink>,
    languages: Vec<String>,
}

impl TranscriptPipeline {
    pub fn new(
        captions: Box<dyn CaptionSource>,
        metadata: Box<dyn MetadataSource>,
        clipboard: Box<dyn ClipboardSink>,
        languages: Vec<String>,
    ) -> Self {
        Self {
            captions,
            metadata,
            clipboard,
            languages,
        }
    }

    /// Build a pipeline backed by YouTube and the system clipboard
    pub fn from_config(config: &Config, languages: Vec<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.http.user_agent.as_str())
            .build()?;

        Ok(Self::new(
            Box::new(YoutubeCaptions::new(client.clone(), config)),
            Box::new(OEmbedClient::new(client, &config.endpoints.oembed)?),
            Box::new(SystemClipboard),
            languages,
        ))
    }

    /// List the caption tracks available for a video
    pub async fn list_transcripts(&self, video_id: &str) -> Result<TranscriptList> {
        self.captions.list_transcripts(video_id).await
    }

    /// Retrieve the transcript in the most preferred available language
    pub async fn fetch_transcript(&self, video_id: &str) -> Result<FetchedTranscript> {
        let list = self.captions.list_transcripts(video_id).await?;
        let track = list.find_transcript(&self.languages)?;

        tracing::info!(
            "Selected {} transcript ({}{})",
            track.language_code,
            track.language,
            if track.is_generated { ", generated" } else { "" }
        );

        let entries = self.captions.fetch_entries(track).await?;
        tracing::debug!("Fetched {} caption entries", entries.len());

        Ok(FetchedTranscript {
            video_id: video_id.to_string(),
            language: track.language.clone(),
            language_code: track.language_code.clone(),
            is_generated: track.is_generated,
            entries,
        })
    }

    /// Write a fetched transcript to the requested target, then the clipboard.
    ///
    /// Status lines and stdout output both go to `out`.
    pub async fn deliver<W: Write>(
        &self,
        transcript: &FetchedTranscript,
        request: &OutputRequest,
        out: &mut W,
    ) -> Result<()> {
        let formatted = output::render(transcript, &request.format)?;

        match request.target() {
            OutputTarget::Directory(dir) => {
                let info = get_video_info(self.metadata.as_ref(), &transcript.video_id).await?;
                tracing::debug!("Resolved video title: {}", info.title);
                let path = output::save_to_directory(
                    &formatted,
                    dir,
                    &info.filename,
                    &request.format,
                )?;
                writeln!(out, "Transcript has been saved to {}", path.display())?;
            }
            OutputTarget::File(path) => {
                output::save_to_file(&formatted, path)?;
                writeln!(out, "Transcript has been saved to {}", path.display())?;
            }
            OutputTarget::Stdout => {
                output::print_to_writer(&formatted, out)?;
            }
        }

        if request.clipboard {
            self.clipboard.copy(&formatted)?;
            writeln!(out, "\nTranscript has been copied to clipboard!")?;
        }

        Ok(())
    }

    /// Fetch and deliver in one step.
    ///
    /// `progress` spins while captions are fetched and is cleared before any
    /// output is written.
    pub async fn run<W: Write>(
        &self,
        video_id: &str,
        request: &OutputRequest,
        progress: &ProgressBar,
        out: &mut W,
    ) -> Result<()> {
        progress.set_message(format!("Fetching transcript for {}...", video_id));
        let fetched = self.fetch_transcript(video_id).await;
        progress.finish_and_clear();

        self.deliver(&fetched?, request, out).await
    }
}
