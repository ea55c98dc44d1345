//! Error types for the media-grab application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Inbound errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Transfer errors
    #[error("Transport failure{}: {message}", status_suffix(.status))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("File too large: {size_bytes} bytes exceeds the {budget_bytes} byte budget")]
    Oversize { size_bytes: u64, budget_bytes: u64 },

    // External tool errors
    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Extraction engine '{0}' not found. Please install it and ensure it's in your PATH.")]
    ExtractionEngineNotFound(String),

    // Delivery errors
    #[error("Delivery failed: {0}")]
    Delivery(String),

    // File system errors
    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Build a transport failure from an HTTP status code.
    pub fn http_status(status: reqwest::StatusCode) -> Self {
        Error::Transport {
            status: Some(status.as_u16()),
            message: status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
        }
    }

    /// Whether this error belongs to the transport class (network, timeout, status, parse).
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. } | Error::Http(_) | Error::Json(_))
    }

    /// Whether this error is a size budget violation.
    pub fn is_oversize(&self) -> bool {
        matches!(self, Error::Oversize { .. })
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
    pub const SOME_ITEMS_FAILED: i32 = 6;
}
