//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use regex::Regex;
use url::Url;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_endpoint(&config.aggregation.endpoint)?;
    if let Some(api_key) = &config.aggregation.api_key {
        validate_api_key(api_key)?;
    }
    validate_tiers(&config.extraction.tiers)?;
    validate_domains(&config.extraction.domains)?;

    if config.extraction.binary.trim().is_empty() {
        return Err(Error::MissingConfig("extraction.binary".to_string()));
    }

    if config.options.max_concurrent_items == 0 {
        return Err(Error::ConfigValidation {
            field: "max_concurrent_items".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }

    for (field, value) in [
        ("request_timeout_secs", config.options.request_timeout_secs),
        ("connect_timeout_secs", config.options.connect_timeout_secs),
        ("extraction.timeout_secs", config.extraction.timeout_secs),
    ] {
        if value == 0 {
            return Err(Error::ConfigValidation {
                field: field.to_string(),
                message: "Timeout must be greater than zero".to_string(),
            });
        }
    }

    Ok(())
}

/// Validate the aggregation endpoint base URL.
pub fn validate_endpoint(endpoint: &str) -> Result<()> {
    if endpoint.is_empty() {
        return Err(Error::MissingConfig("aggregation.endpoint".to_string()));
    }

    let url = Url::parse(endpoint).map_err(|e| Error::ConfigValidation {
        field: "aggregation.endpoint".to_string(),
        message: format!("Not a valid URL: {}", e),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::ConfigValidation {
            field: "aggregation.endpoint".to_string(),
            message: format!("Unsupported scheme '{}', expected http or https", url.scheme()),
        });
    }

    Ok(())
}

/// Validate the static API key.
pub fn validate_api_key(api_key: &str) -> Result<()> {
    if api_key.trim().is_empty() {
        return Err(Error::ConfigValidation {
            field: "aggregation.api_key".to_string(),
            message: "API key is empty. Remove the entry to use session tokens.".to_string(),
        });
    }

    let key_lower = api_key.to_lowercase();
    if key_lower.contains("replaceme") || key_lower.contains("your_api_key") {
        return Err(Error::ConfigValidation {
            field: "aggregation.api_key".to_string(),
            message: "API key appears to be a placeholder. Please provide your actual key."
                .to_string(),
        });
    }

    Ok(())
}

/// Validate the quality ladder: non-empty and strictly descending.
pub fn validate_tiers(tiers: &[u32]) -> Result<()> {
    if tiers.is_empty() {
        return Err(Error::MissingConfig(
            "extraction.tiers (at least one quality tier required)".to_string(),
        ));
    }

    if tiers.contains(&0) {
        return Err(Error::ConfigValidation {
            field: "extraction.tiers".to_string(),
            message: "Tier heights must be positive".to_string(),
        });
    }

    if tiers.windows(2).any(|w| w[0] <= w[1]) {
        return Err(Error::ConfigValidation {
            field: "extraction.tiers".to_string(),
            message: format!(
                "Tiers must be listed from highest to lowest quality (got {:?})",
                tiers
            ),
        });
    }

    Ok(())
}

/// Validate extraction host names.
pub fn validate_domains<S: AsRef<str>>(domains: &[S]) -> Result<()> {
    if domains.is_empty() {
        return Err(Error::MissingConfig(
            "extraction.domains (at least one host required)".to_string(),
        ));
    }

    let host_pattern = Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)+$")
        .map_err(|e| Error::Config(e.to_string()))?;

    for domain in domains {
        let domain = domain.as_ref();
        if !host_pattern.is_match(&domain.to_lowercase()) {
            return Err(Error::ConfigValidation {
                field: "extraction.domains".to_string(),
                message: format!("'{}' is not a valid host name", domain),
            });
        }
    }

    Ok(())
}
