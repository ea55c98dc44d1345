//! Filename generation and manipulation.

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{Error, Result};
use crate::media::MediaKind;

/// Fallback name when the backend provides none.
pub const DEFAULT_FILENAME: &str = "video.mp4";

/// Validate and sanitize a filename by removing or replacing invalid characters.
///
/// Returns an error if the filename contains path traversal patterns.
pub fn sanitize_filename(name: &str) -> Result<String> {
    // Reject path traversal attempts
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    // Also reject if it contains path separators (should be sanitized, not allowed)
    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    // Reject null bytes
    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Filename cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}

/// Turn a free-form title into a filename stem, replacing separators instead of rejecting.
pub fn title_to_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .replace("..", "_");

    let stem = stem.trim().trim_matches('.').to_string();
    if !stem.chars().any(char::is_alphanumeric) {
        "video".to_string()
    } else {
        stem.chars().take(120).collect()
    }
}

/// Name for a single file delivered from the aggregation backend.
pub fn delivery_filename(backend_name: Option<&str>) -> String {
    backend_name
        .and_then(|name| sanitize_filename(name).ok())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

/// Name for a picker item: `<index>.<ext>`, 1-based.
///
/// The extension comes from the locator path, then the response content type,
/// then the item kind.
pub fn picker_filename(
    index: usize,
    locator: &str,
    content_type: Option<&str>,
    kind: MediaKind,
) -> String {
    let ext = extension_from_locator(locator)
        .or_else(|| content_type.and_then(extension_from_content_type))
        .unwrap_or_else(|| kind.default_extension().to_string());

    format!("{}.{}", index + 1, ext)
}

/// Extension of the last path segment of a URL, if it looks like one.
pub fn extension_from_locator(locator: &str) -> Option<String> {
    let url = Url::parse(locator).ok()?;
    let segment = url.path_segments()?.last()?;
    let (_, ext) = segment.rsplit_once('.')?;

    if (1..=5).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(ext.to_lowercase())
    } else {
        None
    }
}

/// Preferred extension for a MIME type.
pub fn extension_from_content_type(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next()?.trim();
    let extensions = mime_guess::get_mime_extensions_str(essence)?;

    // mime_guess lists "jpe" before "jpg" for image/jpeg
    if extensions.contains(&"jpg") {
        return Some("jpg".to_string());
    }
    if extensions.contains(&"mp4") {
        return Some("mp4".to_string());
    }
    extensions.first().map(|e| e.to_string())
}

/// Generate a unique filename by appending a number if the file exists.
pub fn make_unique_filename(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let parent = path.parent().unwrap_or(Path::new("."));

    let mut counter = 1;
    loop {
        let new_name = if ext.is_empty() {
            format!("{}_{}", stem, counter)
        } else {
            format!("{}_{}.{}", stem, counter, ext)
        };

        let new_path = parent.join(&new_name);
        if !new_path.exists() {
            return new_path;
        }

        counter += 1;
        if counter > 1000 {
            // Safety limit
            return new_path;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_valid() {
        assert_eq!(sanitize_filename("normal.mp4").unwrap(), "normal.mp4");
        assert_eq!(sanitize_filename("clip:1.mp4").unwrap(), "clip_1.mp4");
        assert_eq!(
            sanitize_filename("what*is?this.mp4").unwrap(),
            "what_is_this.mp4"
        );
    }

    #[test]
    fn test_sanitize_filename_rejects_traversal_and_separators() {
        assert!(sanitize_filename("../etc/passwd").is_err());
        assert!(sanitize_filename("path/to/file.mp4").is_err());
        assert!(sanitize_filename("path\\to\\file.mp4").is_err());
        assert!(sanitize_filename("file\0name.mp4").is_err());
        assert!(sanitize_filename("   ").is_err());
    }

    #[test]
    fn test_delivery_filename_fallback() {
        assert_eq!(delivery_filename(Some("clip.mp4")), "clip.mp4");
        assert_eq!(delivery_filename(Some("../../x.mp4")), DEFAULT_FILENAME);
        assert_eq!(delivery_filename(None), DEFAULT_FILENAME);
    }

    #[test]
    fn test_title_to_stem() {
        assert_eq!(title_to_stem("My: Video / Part 1"), "My_ Video _ Part 1");
        assert_eq!(title_to_stem("../.."), "video");
        assert_eq!(title_to_stem(""), "video");
    }

    #[test]
    fn test_picker_filename_sources() {
        assert_eq!(
            picker_filename(0, "https://cdn.example.com/a/b/photo.PNG?sig=1", None, MediaKind::Photo),
            "1.png"
        );
        assert_eq!(
            picker_filename(1, "https://cdn.example.com/tunnel?id=9", Some("image/jpeg"), MediaKind::Photo),
            "2.jpg"
        );
        assert_eq!(
            picker_filename(2, "https://cdn.example.com/tunnel", None, MediaKind::Video),
            "3.mp4"
        );
    }

    #[test]
    fn test_extension_from_content_type() {
        assert_eq!(extension_from_content_type("video/mp4").as_deref(), Some("mp4"));
        assert_eq!(
            extension_from_content_type("image/jpeg; charset=binary").as_deref(),
            Some("jpg")
        );
        assert_eq!(extension_from_content_type("nonsense/type"), None);
    }

    #[test]
    fn test_make_unique_filename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        assert_eq!(make_unique_filename(&path), path);

        std::fs::write(&path, b"x").unwrap();
        assert_eq!(make_unique_filename(&path), dir.path().join("clip_1.mp4"));
    }
}
