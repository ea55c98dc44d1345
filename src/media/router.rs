//! Provider routing and inbound URL filtering.

use std::fmt;

use regex::Regex;
use url::Url;

use crate::error::{Error, Result};

/// Backend capable of turning a URL into media bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Local extraction engine with a quality ladder.
    Extraction,
    /// Remote aggregation API.
    Aggregation,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Extraction => write!(f, "extraction"),
            Provider::Aggregation => write!(f, "aggregation"),
        }
    }
}

/// Classifies URLs by host against a fixed set of extraction domains.
#[derive(Debug, Clone)]
pub struct ProviderRouter {
    domains: Vec<String>,
}

impl ProviderRouter {
    pub fn new<S: AsRef<str>>(domains: &[S]) -> Self {
        Self {
            domains: domains
                .iter()
                .map(|d| normalize_host(d.as_ref().trim().trim_start_matches('.')))
                .collect(),
        }
    }

    /// Pick the provider for a URL. Never fails: anything that is not an
    /// extraction host, including unparsable input, goes to aggregation.
    pub fn classify(&self, url: &str) -> Provider {
        let Ok(parsed) = Url::parse(url) else {
            return Provider::Aggregation;
        };

        let Some(host) = parsed.host_str() else {
            return Provider::Aggregation;
        };

        let host = normalize_host(host);
        let host = host.as_str();

        if self
            .domains
            .iter()
            .any(|d| host == d || host.ends_with(&format!(".{}", d)))
        {
            Provider::Extraction
        } else {
            Provider::Aggregation
        }
    }
}

/// Lowercase a host and drop one leading `www.`.
fn normalize_host(host: &str) -> String {
    let host = host.to_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

/// Extract the media URL from inbound text.
///
/// Accepts the first `http://` or `https://` token in the text.
pub fn parse_media_url(input: &str) -> Result<String> {
    let input = input.trim();

    let url_pattern =
        Regex::new(r"https?://\S+").map_err(|e| Error::InvalidInput(e.to_string()))?;

    match url_pattern.find(input) {
        Some(m) => Ok(m.as_str().to_string()),
        None => Err(Error::InvalidInput(format!(
            "No link found. Send a link from a supported platform: {}",
            SUPPORTED_PLATFORMS
        ))),
    }
}

/// Platforms listed to users who send text without a link.
pub const SUPPORTED_PLATFORMS: &str = "YouTube, TikTok, Instagram, Twitter/X, Reddit, Twitch, \
    Vimeo, Facebook, Dailymotion, Tumblr, Bilibili and more";
