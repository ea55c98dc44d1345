//! Aggregation backend wire types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::media::{MediaKind, PickerItem};

/// Maximum picker entries processed per request.
pub const MAX_PICKER_ITEMS: usize = 10;

/// Body of `POST {endpoint}/`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest<'a> {
    pub url: &'a str,
    pub video_quality: &'static str,
    pub filename_style: &'static str,
    pub download_mode: &'static str,
}

impl<'a> ResolveRequest<'a> {
    pub fn new(url: &'a str) -> Self {
        Self {
            url,
            video_quality: "max",
            filename_style: "basic",
            download_mode: "auto",
        }
    }
}

/// Body returned by `POST {endpoint}/session`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    pub token: Option<String>,

    /// Token lifetime in seconds. Any JSON number is accepted.
    pub exp: Option<f64>,
}

impl SessionResponse {
    /// Token lifetime, if `exp` is a positive, finite number of seconds.
    pub fn ttl(&self) -> Option<Duration> {
        self.exp
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

/// Body returned by `POST {endpoint}/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveResponse {
    pub status: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub filename: Option<String>,

    #[serde(default)]
    pub picker: Vec<PickerEntry>,

    #[serde(default)]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PickerEntry {
    pub url: Option<String>,

    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub code: Option<String>,
}

/// Outcome of resolving a URL through the aggregation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedItem {
    /// One file behind a tunnel or redirect locator.
    SingleFile { locator: String, filename: String },
    /// Several independent items, in backend order, at most [`MAX_PICKER_ITEMS`].
    MultiItem(Vec<PickerItem>),
    Failure(ResolveFailure),
}

/// Why a resolution produced nothing deliverable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveFailure {
    /// The backend answered `status: "error"`.
    Backend { code: String },
    /// The backend answered with a status this client does not handle.
    UnsupportedStatus { status: String },
    /// A single-file status without a locator.
    MissingUrl,
    /// Network error, timeout, non-200 status or unparsable body.
    Transport { detail: String },
}

impl ResolveFailure {
    pub fn code(&self) -> &str {
        match self {
            ResolveFailure::Backend { code } => code,
            ResolveFailure::UnsupportedStatus { .. } => "unsupported-status",
            ResolveFailure::MissingUrl => "missing-url",
            ResolveFailure::Transport { .. } => "transport",
        }
    }
}

impl ResolveResponse {
    /// Map the backend status onto a [`ResolvedItem`].
    pub fn into_resolved(self) -> ResolvedItem {
        let status = self.status.unwrap_or_default();

        match status.as_str() {
            "error" => ResolvedItem::Failure(ResolveFailure::Backend {
                code: self
                    .error
                    .and_then(|e| e.code)
                    .unwrap_or_else(|| "unknown".to_string()),
            }),
            "picker" => ResolvedItem::MultiItem(
                self.picker
                    .into_iter()
                    .take(MAX_PICKER_ITEMS)
                    .map(|entry| PickerItem {
                        locator: entry.url.filter(|u| !u.is_empty()),
                        kind: MediaKind::from_type(entry.kind.as_deref().unwrap_or("video")),
                    })
                    .collect(),
            ),
            "tunnel" | "redirect" => match self.url.filter(|u| !u.is_empty()) {
                Some(locator) => ResolvedItem::SingleFile {
                    locator,
                    filename: self
                        .filename
                        .unwrap_or_else(|| crate::fs::naming::DEFAULT_FILENAME.to_string()),
                },
                None => ResolvedItem::Failure(ResolveFailure::MissingUrl),
            },
            _ => ResolvedItem::Failure(ResolveFailure::UnsupportedStatus { status }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ResolvedItem {
        serde_json::from_str::<ResolveResponse>(json)
            .unwrap()
            .into_resolved()
    }

    #[test]
    fn test_session_ttl_accepts_any_number() {
        let ttl = |json: &str| serde_json::from_str::<SessionResponse>(json).unwrap().ttl();

        assert_eq!(ttl(r#"{"token":"t","exp":600}"#), Some(Duration::from_secs(600)));
        assert_eq!(ttl(r#"{"token":"t","exp":7200.0}"#), Some(Duration::from_secs(7200)));
        assert_eq!(ttl(r#"{"token":"t","exp":1.5}"#), Some(Duration::from_millis(1500)));
        assert_eq!(ttl(r#"{"token":"t","exp":-5}"#), None);
        assert_eq!(ttl(r#"{"token":"t","exp":1e300}"#), None);
        assert_eq!(ttl(r#"{"token":"t"}"#), None);
    }

    #[test]
    fn test_request_payload_shape() {
        let body = serde_json::to_value(ResolveRequest::new("https://x.com/a")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "url": "https://x.com/a",
                "videoQuality": "max",
                "filenameStyle": "basic",
                "downloadMode": "auto"
            })
        );
    }

    #[test]
    fn test_tunnel_and_redirect() {
        assert_eq!(
            parse(r#"{"status":"tunnel","url":"https://t/1","filename":"a.mp4"}"#),
            ResolvedItem::SingleFile {
                locator: "https://t/1".into(),
                filename: "a.mp4".into()
            }
        );
        assert_eq!(
            parse(r#"{"status":"redirect","url":"https://r/1"}"#),
            ResolvedItem::SingleFile {
                locator: "https://r/1".into(),
                filename: "video.mp4".into()
            }
        );
        assert_eq!(
            parse(r#"{"status":"tunnel"}"#),
            ResolvedItem::Failure(ResolveFailure::MissingUrl)
        );
    }

    #[test]
    fn test_error_code() {
        let item = parse(r#"{"status":"error","error":{"code":"error.api.link.invalid"}}"#);
        assert_eq!(
            item,
            ResolvedItem::Failure(ResolveFailure::Backend {
                code: "error.api.link.invalid".into()
            })
        );

        let ResolvedItem::Failure(failure) = parse(r#"{"status":"error"}"#) else {
            panic!("expected failure");
        };
        assert_eq!(failure.code(), "unknown");
    }

    #[test]
    fn test_picker_truncates_and_keeps_order() {
        let entries: Vec<String> = (0..12)
            .map(|i| {
                format!(
                    r#"{{"url":"https://p/{}","type":"{}"}}"#,
                    i,
                    if i % 2 == 0 { "photo" } else { "video" }
                )
            })
            .collect();
        let json = format!(r#"{{"status":"picker","picker":[{}]}}"#, entries.join(","));

        let ResolvedItem::MultiItem(items) = parse(&json) else {
            panic!("expected picker");
        };
        assert_eq!(items.len(), MAX_PICKER_ITEMS);
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item.locator.as_deref(), Some(format!("https://p/{}", i).as_str()));
        }
        assert_eq!(items[0].kind, MediaKind::Photo);
        assert_eq!(items[1].kind, MediaKind::Video);
    }

    #[test]
    fn test_picker_entry_without_url_is_kept_in_place() {
        let ResolvedItem::MultiItem(items) =
            parse(r#"{"status":"picker","picker":[{"type":"photo"},{"url":"https://p/1"}]}"#)
        else {
            panic!("expected picker");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].locator, None);
        assert_eq!(items[1].kind, MediaKind::Video);
    }

    #[test]
    fn test_unknown_status_is_named_failure() {
        let ResolvedItem::Failure(failure) = parse(r#"{"status":"local-processing"}"#) else {
            panic!("expected failure");
        };
        assert_eq!(
            failure,
            ResolveFailure::UnsupportedStatus {
                status: "local-processing".into()
            }
        );
        assert_eq!(failure.code(), "unsupported-status");
    }
}
