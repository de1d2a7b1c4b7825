use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::extractors::extract_video_id;
use crate::output::OutputRequest;
use crate::transcript::TranscriptPipeline;
use crate::Result;

#[derive(Parser, Debug)]
#[command(
    name = "y2t",
    about = "Extract YouTube video transcripts",
    version,
    long_about = "Fetch the transcript of a YouTube video and print it, save it to a file or a title-named file in a directory, and optionally copy it to the clipboard."
)]
pub struct Cli {
    /// YouTube video URL (watch, youtu.be, or embed link)
    #[arg(value_name = "URL")]
    pub url: String,

    /// Output file path (prints to console if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Output directory; the file is named after the video title
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Copy transcript to clipboard
    #[arg(short, long)]
    pub clipboard: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Preferred transcript language, repeat for fallbacks (default: en, ru)
    #[arg(short, long = "language", value_name = "CODE")]
    pub languages: Vec<String>,

    /// List available transcripts instead of fetching one
    #[arg(long)]
    pub list_transcripts: bool,

    /// Configuration file
    #[arg(long, value_name = "FILE", env = "Y2T_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text, one caption per line
    Text,
    /// JSON with timestamps
    Json,
    /// SRT subtitle format
    Srt,
    /// WebVTT format
    Vtt,
}

impl OutputFormat {
    /// File extension used for directory output
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Srt => "srt",
            OutputFormat::Vtt => "vtt",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Srt => write!(f, "srt"),
            OutputFormat::Vtt => write!(f, "vtt"),
        }
    }
}

impl Cli {
    pub fn output_request(&self) -> OutputRequest {
        OutputRequest {
            file: self.file.clone(),
            dir: self.dir.clone(),
            clipboard: self.clipboard,
            format: self.format.clone(),
        }
    }
}

/// Run one invocation, writing transcript and status lines to `out`
pub async fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let video_id = extract_video_id(&cli.url)?;
    tracing::info!("Resolved video id {}", video_id);

    let config = Config::load(cli.config.as_deref())?;
    let languages = config.effective_languages(&cli.languages);
    let pipeline = TranscriptPipeline::from_config(&config, languages)?;

    if cli.list_transcripts {
        let list = pipeline.list_transcripts(&video_id).await?;
        write!(out, "{}", list)?;
        return Ok(());
    }

    let progress = spinner(cli.quiet);
    pipeline
        .run(&video_id, &cli.output_request(), &progress, out)
        .await
}

fn spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Collapse an invocation result into the process exit status
pub fn exit_status(result: &Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            if e.is_transcript_unavailable() {
                tracing::debug!("Transcript unavailable: {:?}", e);
            }
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CannedResponse, TestServer};
    use crate::Y2tError;
    use tempfile::TempDir;

    #[test]
    fn test_parses_all_flags() {
        let cli = Cli::try_parse_from([
            "y2t",
            "https://youtu.be/jNQXAC9IVRw",
            "-f",
            "out.txt",
            "-d",
            "transcripts",
            "-c",
            "--format",
            "srt",
            "-l",
            "de",
            "-l",
            "en",
        ])
        .unwrap();

        assert_eq!(cli.url, "https://youtu.be/jNQXAC9IVRw");
        assert_eq!(cli.file, Some(PathBuf::from("out.txt")));
        assert_eq!(cli.dir, Some(PathBuf::from("transcripts")));
        assert!(cli.clipboard);
        assert_eq!(cli.format, OutputFormat::Srt);
        assert_eq!(cli.languages, vec!["de", "en"]);

        let request = cli.output_request();
        assert!(request.clipboard);
        assert_eq!(request.format.extension(), "srt");
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["y2t", "https://youtu.be/jNQXAC9IVRw"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.languages.is_empty());
        assert!(!cli.clipboard && !cli.list_transcripts);
    }

    #[test]
    fn test_url_is_required() {
        assert!(Cli::try_parse_from(["y2t"]).is_err());
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_url_before_network() {
        let cli = Cli::try_parse_from(["y2t", "https://invalid-url.com"]).unwrap();
        let mut out = Vec::new();

        let result = run(&cli, &mut out).await;

        assert!(matches!(result, Err(Y2tError::InvalidUrl)));
        assert_eq!(exit_status(&result), 1);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_run_fetches_and_prints_transcript() {
        let server = TestServer::bind().await;
        let timedtext_url = server.url("/api/timedtext?v=jNQXAC9IVRw&lang=en");
        let player = serde_json::json!({
            "playabilityStatus": { "status": "OK" },
            "captions": {
                "playerCaptionsTracklistRenderer": {
                    "captionTracks": [{ "baseUrl": timedtext_url, "languageCode": "en" }]
                }
            }
        });

        let workdir = TempDir::new().unwrap();
        let config_path = workdir.path().join("config.yaml");
        std::fs::write(
            &config_path,
            format!(
                "endpoints:\n  watch: {}\n  player: {}\n",
                server.url("/watch"),
                server.url("/youtubei/v1/player")
            ),
        )
        .unwrap();

        let requests = server.serve(vec![
            CannedResponse::text(200, r#"<script>{"INNERTUBE_API_KEY": "key"}</script>"#),
            CannedResponse::json(200, player.to_string()),
            CannedResponse::xml(
                r#"<transcript><text start="0" dur="2">caf&amp;eacute; at the zoo</text></transcript>"#,
            ),
        ]);

        let cli = Cli::try_parse_from([
            "y2t",
            "https://www.youtube.com/watch?v=jNQXAC9IVRw",
            "--config",
            config_path.to_str().unwrap(),
            "-q",
        ])
        .unwrap();
        let mut out = Vec::new();

        let result = run(&cli, &mut out).await;

        assert!(result.is_ok(), "{result:?}");
        assert_eq!(exit_status(&result), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "café at the zoo\n");
        assert_eq!(requests.await.unwrap().len(), 3);
    }

    #[test]
    fn test_exit_status() {
        assert_eq!(exit_status(&Ok(())), 0);
        assert_eq!(
            exit_status(&Err(Y2tError::NoTranscriptFound {
                video_id: "v".to_string(),
                requested: vec!["en".to_string()],
                available: vec![],
            })),
            1
        );
        assert_eq!(
            exit_status(&Err(Y2tError::Io(std::io::Error::other("disk full")))),
            1
        );
    }
}
