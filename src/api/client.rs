//! Aggregation API HTTP client.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use reqwest::{header, Client, Response, StatusCode};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::api::session::{SessionToken, SessionTokenCache, DEFAULT_TOKEN_TTL_SECS};
use crate::api::types::{ResolveFailure, ResolveRequest, ResolveResponse, ResolvedItem, SessionResponse};
use crate::config::{Config, SizeBudget};
use crate::error::{Error, Result};
use crate::fs::{download_path, ensure_dir, remove_quietly, LocalArtifact};

/// Longest slice of an error body kept in messages.
const ERROR_BODY_PREVIEW: usize = 200;

/// Client for the aggregation backend: resolves URLs and fetches the resolved bytes.
pub struct AggregationClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    user_agent: String,
    tokens: Arc<SessionTokenCache>,
    budget: SizeBudget,
    work_dir: PathBuf,
}

impl AggregationClient {
    /// Create a client from configuration, sharing the given token cache.
    pub fn new(config: &Config, tokens: Arc<SessionTokenCache>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.aggregation.user_agent)
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.aggregation.endpoint.trim_end_matches('/').to_string(),
            api_key: config
                .aggregation
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty()),
            user_agent: config.aggregation.user_agent.clone(),
            tokens,
            budget: config.size_budget(),
            work_dir: config.work_directory(),
        })
    }

    /// Override the size budget.
    pub fn with_budget(mut self, budget: SizeBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn budget(&self) -> SizeBudget {
        self.budget
    }

    /// Get a bearer token for the endpoint, negotiating one if none is cached.
    ///
    /// Returns `None` when the exchange fails; callers continue unauthenticated.
    pub async fn session_token(&self) -> Option<String> {
        if let Some(token) = self.tokens.get(&self.endpoint).await {
            return Some(token.value);
        }

        match self.exchange_session().await {
            Ok(token) => {
                let value = token.value.clone();
                self.tokens.put(&self.endpoint, token).await;
                Some(value)
            }
            Err(e) => {
                tracing::debug!("Could not get session token from {}: {}", self.endpoint, e);
                None
            }
        }
    }

    /// Negotiate a session with an empty credential body.
    async fn exchange_session(&self) -> Result<SessionToken> {
        let url = format!("{}/session", self.endpoint);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::http_status(status));
        }

        let text = response.text().await?;
        let body: SessionResponse = serde_json::from_str(&text)?;

        let value = body
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Transport {
                status: None,
                message: "Session response carried no token".to_string(),
            })?;
        let ttl = body
            .ttl()
            .unwrap_or(Duration::from_secs(DEFAULT_TOKEN_TTL_SECS));

        tracing::debug!("Obtained session token valid for {}s", ttl.as_secs());
        Ok(SessionToken::new(value, ttl))
    }

    /// Build the Authorization header value: API key, else session token, else none.
    async fn authorization(&self) -> Option<String> {
        if let Some(key) = &self.api_key {
            return Some(format!("Api-Key {}", key));
        }

        self.session_token()
            .await
            .map(|token| format!("Bearer {}", token))
    }

    /// Resolve a media URL. Transport and parse errors become
    /// [`ResolveFailure::Transport`]; nothing is retried.
    pub async fn resolve(&self, url: &str) -> ResolvedItem {
        match self.request_resolution(url).await {
            Ok(response) => {
                let resolved = response.into_resolved();
                tracing::debug!("Resolved {} to {:?}", url, resolved);
                resolved
            }
            Err(e) => {
                tracing::error!("Aggregation API error for {}: {}", url, e);
                ResolvedItem::Failure(ResolveFailure::Transport {
                    detail: e.to_string(),
                })
            }
        }
    }

    async fn request_resolution(&self, url: &str) -> Result<ResolveResponse> {
        let api_url = format!("{}/", self.endpoint);

        let mut request = self
            .client
            .post(&api_url)
            .header(header::ACCEPT, "application/json")
            .json(&ResolveRequest::new(url));

        if let Some(auth) = self.authorization().await {
            request = request.header(header::AUTHORIZATION, auth);
        }

        tracing::debug!("POST {}", api_url);
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            return Err(Error::Transport {
                status: Some(status.as_u16()),
                message: text.chars().take(ERROR_BODY_PREVIEW).collect(),
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!("Failed to parse resolve response: {}", text);
            Error::from(e)
        })
    }

    /// Stream a resolved locator into a temp file named after `stem`.
    ///
    /// Fails with [`Error::Oversize`] before creating the file when the
    /// advertised length exceeds the budget, and deletes the partial file the
    /// moment the running byte count does.
    pub async fn fetch_bytes(&self, locator: &str, stem: &str) -> Result<LocalArtifact> {
        let response = self
            .client
            .get(locator)
            .header(header::USER_AGENT, &self.user_agent)
            .header(header::ACCEPT, "*/*")
            .header(header::REFERER, &self.endpoint)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::http_status(status));
        }

        if let Some(length) = response.content_length() {
            if !self.budget.allows(length) {
                tracing::info!(
                    "Refusing {}: advertised {} bytes exceeds {}",
                    locator,
                    length,
                    self.budget
                );
                return Err(Error::Oversize {
                    size_bytes: length,
                    budget_bytes: self.budget.max_bytes(),
                });
            }
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        ensure_dir(&self.work_dir).await?;
        let path = download_path(&self.work_dir, stem);

        match self.stream_to_file(response, &path).await {
            Ok(size_bytes) => {
                let mut artifact = LocalArtifact::new(
                    path,
                    size_bytes,
                    crate::fs::naming::DEFAULT_FILENAME.to_string(),
                );
                artifact.content_type = content_type;
                Ok(artifact)
            }
            Err(e) => {
                remove_quietly(&path).await;
                Err(e)
            }
        }
    }

    async fn stream_to_file(&self, response: Response, path: &Path) -> Result<u64> {
        let mut file = File::create(path).await?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Transport {
                status: None,
                message: format!("Stream error: {}", e),
            })?;

            written += chunk.len() as u64;
            if !self.budget.allows(written) {
                return Err(Error::Oversize {
                    size_bytes: written,
                    budget_bytes: self.budget.max_bytes(),
                });
            }

            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        Ok(written)
    }
}
