//! Session token caching for the aggregation backend.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// Token lifetime assumed when the backend does not send `exp`.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 7200;

/// A short-lived bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    /// Token valid for `ttl` from now.
    ///
    /// A lifetime that cannot be represented as a timestamp falls back to
    /// [`DEFAULT_TOKEN_TTL_SECS`].
    pub fn new(value: String, ttl: Duration) -> Self {
        let now = Utc::now();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or_else(|| now + chrono::Duration::seconds(DEFAULT_TOKEN_TTL_SECS as i64));

        Self { value, expires_at }
    }

    /// Check if the token is still usable at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Process-wide token cache keyed by endpoint.
///
/// Entries are replaced whole, so readers never observe a value from one
/// token paired with the expiry of another. Expired entries are ignored on
/// lookup and overwritten on the next refresh.
#[derive(Debug, Default)]
pub struct SessionTokenCache {
    entries: RwLock<HashMap<String, SessionToken>>,
}

impl SessionTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached token for an endpoint if it has not expired.
    pub async fn get(&self, endpoint: &str) -> Option<SessionToken> {
        let entries = self.entries.read().await;
        entries
            .get(endpoint)
            .filter(|token| token.is_valid_at(Utc::now()))
            .cloned()
    }

    /// Store a token for an endpoint, replacing any previous one.
    pub async fn put(&self, endpoint: &str, token: SessionToken) {
        let mut entries = self.entries.write().await;
        entries.insert(endpoint.to_string(), token);
    }
}
