use async_trait::async_trait;
use regex::Regex;
use reqwest::{header, Client, StatusCode};
use serde_json::{json, Value};

use super::CaptionSource;
use crate::config::Config;
use crate::transcript::parser::{parse_player_response, parse_timedtext};
use crate::transcript::{TranscriptEntry, TranscriptList, TranscriptTrack};
use crate::{Result, Y2tError};

/// YouTube caption client using the watch page and the innertube player API
pub struct YoutubeCaptions {
    client: Client,
    watch_url: String,
    player_url: String,
    accept_language: String,
    client_name: String,
    client_version: String,
    api_key_regex: Regex,
    consent_regex: Regex,
}

impl YoutubeCaptions {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            watch_url: config.endpoints.watch.clone(),
            player_url: config.endpoints.player.clone(),
            accept_language: config.http.accept_language.clone(),
            client_name: config.innertube.client_name.clone(),
            client_version: config.innertube.client_version.clone(),
            api_key_regex: Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#)
                .expect("valid api key regex"),
            consent_regex: Regex::new(r#"name="v" value="(.*?)""#).expect("valid consent regex"),
        }
    }

    async fn get_watch_page(&self, video_id: &str, consent: Option<&str>) -> Result<String> {
        let mut request = self
            .client
            .get(&self.watch_url)
            .query(&[("v", video_id)])
            .header(header::ACCEPT_LANGUAGE, &self.accept_language);

        if let Some(token) = consent {
            request = request.header(header::COOKIE, format!("CONSENT=YES+{}", token));
        }

        let response = request.send().await?;
        check_rate_limit(response.status(), video_id)?;
        Ok(response.error_for_status()?.text().await?)
    }

    /// Fetch the watch page, passing the cookie consent interstitial if shown
    async fn fetch_watch_page(&self, video_id: &str) -> Result<String> {
        tracing::debug!("Fetching watch page for {}", video_id);
        let html = self.get_watch_page(video_id, None).await?;

        if !html.contains("action=\"https://consent.youtube.com/s\"") {
            return Ok(html);
        }

        tracing::debug!("Consent page detected, retrying with consent cookie");
        let token = self
            .consent_regex
            .captures(&html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| Y2tError::Unparsable("failed to create consent cookie".to_string()))?;

        let html = self.get_watch_page(video_id, Some(&token)).await?;
        if html.contains("action=\"https://consent.youtube.com/s\"") {
            return Err(Y2tError::Unparsable(
                "consent cookie was not accepted".to_string(),
            ));
        }
        Ok(html)
    }

    fn extract_api_key(&self, html: &str) -> Result<String> {
        if let Some(caps) = self.api_key_regex.captures(html) {
            return Ok(caps[1].to_string());
        }

        if html.contains("class=\"g-recaptcha\"") {
            return Err(Y2tError::RequestBlocked(
                "the watch page returned a captcha".to_string(),
            ));
        }

        Err(Y2tError::Unparsable(
            "innertube API key not found on watch page".to_string(),
        ))
    }

    async fn fetch_player_response(&self, video_id: &str, api_key: &str) -> Result<Value> {
        tracing::debug!("Requesting innertube player data for {}", video_id);

        let body = json!({
            "context": {
                "client": {
                    "clientName": self.client_name,
                    "clientVersion": self.client_version,
                }
            },
            "videoId": video_id,
        });

        let response = self
            .client
            .post(&self.player_url)
            .query(&[("key", api_key)])
            .header(header::ACCEPT_LANGUAGE, &self.accept_language)
            .json(&body)
            .send()
            .await?;

        check_rate_limit(response.status(), video_id)?;
        Ok(response.error_for_status()?.json().await?)
    }
}

fn check_rate_limit(status: StatusCode, video_id: &str) -> Result<()> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(Y2tError::RequestBlocked(format!(
            "HTTP 429 while fetching {}",
            video_id
        )));
    }
    Ok(())
}

#[async_trait]
impl CaptionSource for YoutubeCaptions {
    async fn list_transcripts(&self, video_id: &str) -> Result<TranscriptList> {
        let html = self.fetch_watch_page(video_id).await?;
        let api_key = self.extract_api_key(&html)?;
        let player = self.fetch_player_response(video_id, &api_key).await?;

        let list = parse_player_response(video_id, &player)?;
        tracing::info!(
            "Found {} caption track(s) for {}",
            list.manual.len() + list.generated.len(),
            video_id
        );
        Ok(list)
    }

    async fn fetch_entries(&self, track: &TranscriptTrack) -> Result<Vec<TranscriptEntry>> {
        tracing::debug!("Downloading {} captions", track.language_code);

        let response = self
            .client
            .get(&track.base_url)
            .header(header::ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await?;

        check_rate_limit(response.status(), &track.video_id)?;
        let xml = response.error_for_status()?.text().await?;
        parse_timedtext(&xml)
    }
}
