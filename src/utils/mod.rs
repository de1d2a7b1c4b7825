use regex::Regex;
use std::sync::OnceLock;
use url::Url;

use crate::{Result, Y2tError};

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

fn entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("valid entity regex")
    })
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</?[a-z][^>]*>").expect("valid tag regex"))
}

/// Validate an endpoint URL and return the parsed form
pub fn validate_http_url(url: &str) -> Result<Url> {
    let parsed =
        Url::parse(url).map_err(|_| Y2tError::Config(format!("Invalid URL format: {}", url)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Y2tError::Config(format!(
            "URL must use HTTP or HTTPS protocol: {}",
            url
        )));
    }

    Ok(parsed)
}

/// Turn a video title into a filesystem-safe token.
///
/// Leading and trailing whitespace is trimmed, every internal whitespace run
/// becomes a single underscore, and anything other than alphanumerics,
/// underscores, hyphens and periods is dropped. Applying it twice yields the
/// same result as applying it once.
pub fn clean_filename(title: &str) -> String {
    whitespace_regex()
        .replace_all(title.trim(), "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect()
}

/// Decode one level of XML/HTML character references.
///
/// Unknown named references are left untouched.
pub fn decode_entities(text: &str) -> String {
    entity_regex()
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    _ => None,
                }
            };

            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Decode HTML character references, including the full set of named entities
pub fn unescape_html(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Remove inline markup such as `<i>` or `<font color="...">` from caption text
pub fn strip_tags(text: &str) -> String {
    tag_regex().replace_all(text, "").into_owned()
}

/// Format seconds as `HH:MM:SS<sep>mmm`, the layout shared by SRT and WebVTT
pub fn format_timestamp(seconds: f64, millis_separator: char) -> String {
    let total_millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;

    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours, minutes, secs, millis_separator, millis
    )
}
