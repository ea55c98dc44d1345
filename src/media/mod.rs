//! Media requests and provider routing.

pub mod item;
pub mod router;

pub use item::{DownloadRequest, MediaKind, PickerItem};
pub use router::{parse_media_url, Provider, ProviderRouter, SUPPORTED_PLATFORMS};
