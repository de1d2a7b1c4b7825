use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;

use super::{TranscriptEntry, TranscriptList, TranscriptTrack};
use crate::utils::{decode_entities, strip_tags, unescape_html};
use crate::{Result, Y2tError};

/// Caption portion of the innertube player response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTracklist {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    name: Option<TrackName>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    is_translatable: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackName {
    #[serde(default)]
    runs: Vec<TextRun>,
    #[serde(default)]
    simple_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

impl TrackName {
    fn display(&self) -> Option<String> {
        self.runs
            .first()
            .map(|run| run.text.clone())
            .or_else(|| self.simple_text.clone())
    }
}

fn text_element_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)").expect("valid timedtext regex")
    })
}

fn transcript_root_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<transcript\b").expect("valid transcript root regex"))
}

fn attribute_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(\w+)="([^"]*)""#).expect("valid attribute regex"))
}

/// Check that the player response describes a playable video
pub fn check_playability(video_id: &str, player: &Value) -> Result<()> {
    let status = &player["playabilityStatus"];
    let reason = status["reason"].as_str().unwrap_or_default().to_string();

    match status["status"].as_str() {
        None | Some("OK") => Ok(()),
        Some("LOGIN_REQUIRED") if reason.contains("not a bot") => {
            Err(Y2tError::RequestBlocked(reason))
        }
        Some("ERROR") if reason == "This video is unavailable" => {
            Err(Y2tError::VideoUnavailable(video_id.to_string()))
        }
        Some(other) => {
            let reason = if reason.is_empty() {
                other.to_string()
            } else {
                reason
            };
            Err(Y2tError::VideoUnplayable {
                video_id: video_id.to_string(),
                reason,
            })
        }
    }
}

/// Build the list of caption tracks from an innertube player response
pub fn parse_player_response(video_id: &str, player: &Value) -> Result<TranscriptList> {
    check_playability(video_id, player)?;

    let disabled = || Y2tError::TranscriptsDisabled {
        video_id: video_id.to_string(),
    };

    let renderer = player
        .get("captions")
        .and_then(|captions| captions.get("playerCaptionsTracklistRenderer"))
        .ok_or_else(disabled)?;

    let tracklist: CaptionTracklist = serde_json::from_value(renderer.clone())?;
    if tracklist.caption_tracks.is_empty() {
        return Err(disabled());
    }

    let tracks = tracklist
        .caption_tracks
        .into_iter()
        .map(|track| TranscriptTrack {
            video_id: video_id.to_string(),
            language: track
                .name
                .as_ref()
                .and_then(TrackName::display)
                .unwrap_or_else(|| track.language_code.clone()),
            language_code: track.language_code,
            is_generated: track.kind.as_deref() == Some("asr"),
            is_translatable: track.is_translatable,
            base_url: track.base_url.replace("&fmt=srv3", ""),
        })
        .collect();

    Ok(TranscriptList::new(video_id, tracks))
}

/// Parse timedtext XML into ordered caption entries.
///
/// Text is XML-decoded, HTML-unescaped and stripped of inline markup;
/// elements with no text are skipped. A body without a `<transcript>` root
/// or without any `<text>` element is rejected.
pub fn parse_timedtext(xml: &str) -> Result<Vec<TranscriptEntry>> {
    if !transcript_root_regex().is_match(xml) {
        return Err(Y2tError::Unparsable(
            "timedtext response has no <transcript> root".to_string(),
        ));
    }

    let mut entries = Vec::new();
    let mut elements = 0usize;

    for caps in text_element_regex().captures_iter(xml) {
        elements += 1;
        let raw_text = match caps.get(2) {
            Some(m) if !m.as_str().is_empty() => m.as_str(),
            _ => continue,
        };

        let mut start = None;
        let mut duration = 0.0;
        for attr in attribute_regex().captures_iter(&caps[1]) {
            match &attr[1] {
                "start" => start = attr[2].parse::<f64>().ok(),
                "dur" => duration = attr[2].parse::<f64>().unwrap_or(0.0),
                _ => {}
            }
        }

        let start = start.ok_or_else(|| {
            Y2tError::Unparsable(format!("caption element without start time: {}", &caps[0]))
        })?;

        let text = strip_tags(&unescape_html(&decode_entities(raw_text)));
        entries.push(TranscriptEntry {
            text,
            start,
            duration,
        });
    }

    if elements == 0 {
        return Err(Y2tError::Unparsable(
            "timedtext response contains no caption elements".to_string(),
        ));
    }

    Ok(entries)
}
