//! Request and media item representation.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One unit of work: a URL submitted for download.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Unique request ID, used to name temp files.
    pub id: Uuid,

    /// The submitted media URL.
    pub url: String,

    /// When the request was created.
    pub requested_at: DateTime<Utc>,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            requested_at: Utc::now(),
        }
    }

    /// Unique file stem for one fetch attempt of this request.
    pub fn attempt_stem(&self, attempt: &str) -> String {
        format!("{}-{}", self.id.simple(), attempt)
    }
}

/// Kind of media content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaKind {
    Photo,
    #[default]
    Video,
}

impl MediaKind {
    /// Parse the backend's item type. Anything but `photo` is treated as video.
    pub fn from_type(kind: &str) -> Self {
        if kind.eq_ignore_ascii_case("photo") {
            MediaKind::Photo
        } else {
            MediaKind::Video
        }
    }

    /// Default file extension for this kind.
    pub fn default_extension(&self) -> &'static str {
        match self {
            MediaKind::Photo => "jpg",
            MediaKind::Video => "mp4",
        }
    }
}

/// One entry of a multi-item resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    /// Direct locator; `None` when the backend omitted it.
    pub locator: Option<String>,
    pub kind: MediaKind,
}
