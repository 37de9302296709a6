//! Target URL validation.

use url::Url;

use crate::error::{LinkError, Result};

/// Checks that `raw` is a non-blank absolute URL with an http or https scheme.
///
/// Returns the trimmed input on success, which is what gets stored.
pub fn validate_url(raw: &str) -> Result<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LinkError::InvalidUrl("URL cannot be empty".to_string()));
    }

    let parsed = Url::parse(trimmed).map_err(|e| LinkError::InvalidUrl(format!("{trimmed}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed),
        other => Err(LinkError::InvalidUrl(format!(
            "unsupported scheme '{other}', only http and https are allowed"
        ))),
    }
}
