use crate::transcript::{FetchedTranscript, TranscriptEntry};
use crate::utils::format_timestamp;
use crate::Result;

/// Entry texts one per line, timing discarded
pub fn format_as_text(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Transcript with language details and timed entries
pub fn format_as_json(transcript: &FetchedTranscript) -> Result<String> {
    Ok(serde_json::to_string_pretty(transcript)?)
}

/// End of each cue, clipped to the next cue's start so cues never overlap
fn cue_end(entries: &[TranscriptEntry], index: usize) -> f64 {
    let entry = &entries[index];
    let end = entry.start + entry.duration;
    match entries.get(index + 1) {
        Some(next) if next.start < end => next.start,
        _ => end,
    }
}

pub fn format_as_srt(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{}\n{} --> {}\n{}\n",
                i + 1,
                format_timestamp(entry.start, ','),
                format_timestamp(cue_end(entries, i), ','),
                entry.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_as_vtt(entries: &[TranscriptEntry]) -> String {
    let cues = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{} --> {}\n{}\n",
                format_timestamp(entry.start, '.'),
                format_timestamp(cue_end(entries, i), '.'),
                entry.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("WEBVTT\n\n{}", cues)
}
