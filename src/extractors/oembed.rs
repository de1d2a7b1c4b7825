use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::utils::{clean_filename, validate_http_url};
use crate::{Result, Y2tError};

/// Display title of a video and the filename derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    pub title: String,
    pub filename: String,
}

/// Trait for looking up video metadata
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch the display title of a video
    async fn fetch_title(&self, video_id: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    title: String,
}

/// Metadata lookup through the public oEmbed endpoint
pub struct OEmbedClient {
    client: Client,
    endpoint: Url,
}

impl OEmbedClient {
    pub fn new(client: Client, endpoint: &str) -> Result<Self> {
        Ok(Self {
            client,
            endpoint: validate_http_url(endpoint)?,
        })
    }
}

#[async_trait]
impl MetadataSource for OEmbedClient {
    async fn fetch_title(&self, video_id: &str) -> Result<String> {
        let video_url = format!("https://www.youtube.com/watch?v={}", video_id);
        let mut request_url = self.endpoint.clone();
        request_url
            .query_pairs_mut()
            .append_pair("url", &video_url)
            .append_pair("format", "json");

        tracing::debug!("Fetching video metadata from {}", request_url);

        let response: OEmbedResponse = self
            .client
            .get(request_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.title)
    }
}

/// Look up a video's title and derive a filesystem-safe filename from it.
///
/// Every failure is reported as [`Y2tError::MetadataFetchFailed`].
pub async fn get_video_info(source: &dyn MetadataSource, video_id: &str) -> Result<VideoInfo> {
    let title = source
        .fetch_title(video_id)
        .await
        .map_err(|e| Y2tError::MetadataFetchFailed(e.to_string()))?;

    Ok(VideoInfo {
        filename: clean_filename(&title),
        title,
    })
}
