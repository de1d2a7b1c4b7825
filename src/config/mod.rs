use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::validate_http_url;
use crate::{Result, Y2tError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Transcript language preference, most preferred first
    pub languages: Vec<String>,

    /// HTTP client identity
    pub http: HttpConfig,

    /// Remote endpoints
    pub endpoints: EndpointConfig,

    /// Innertube client context sent with player requests
    pub innertube: InnertubeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header for every request
    pub user_agent: String,

    /// Accept-Language header, keeps the watch page in a parseable locale
    pub accept_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Watch page, queried with `?v=<id>`
    pub watch: String,

    /// Innertube player endpoint
    pub player: String,

    /// oEmbed metadata endpoint
    pub oembed: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InnertubeConfig {
    pub client_name: String,
    pub client_version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string(), "ru".to_string()],
            http: HttpConfig::default(),
            endpoints: EndpointConfig::default(),
            innertube: InnertubeConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("y2t/", env!("CARGO_PKG_VERSION")).to_string(),
            accept_language: "en-US".to_string(),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            watch: "https://www.youtube.com/watch".to_string(),
            player: "https://www.youtube.com/youtubei/v1/player".to_string(),
            oembed: "https://www.youtube.com/oembed".to_string(),
        }
    }
}

impl Default for InnertubeConfig {
    fn default() -> Self {
        Self {
            client_name: "ANDROID".to_string(),
            client_version: "20.10.38".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, or the default location.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Y2tError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        tracing::debug!("Loading config from {}", config_path.display());
        let content = fs_err::read_to_string(&config_path)?;
        let config = Self::from_yaml(&content)?;
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("y2t").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() || self.languages.iter().any(|l| l.trim().is_empty()) {
            return Err(Y2tError::Config(
                "at least one non-empty language code must be configured".to_string(),
            ));
        }

        validate_http_url(&self.endpoints.watch)?;
        validate_http_url(&self.endpoints.player)?;
        validate_http_url(&self.endpoints.oembed)?;

        Ok(())
    }

    /// Language preference for this run; a CLI override wins over the file
    pub fn effective_languages(&self, cli_override: &[String]) -> Vec<String> {
        if cli_override.is_empty() {
            self.languages.clone()
        } else {
            cli_override.to_vec()
        }
    }
}
