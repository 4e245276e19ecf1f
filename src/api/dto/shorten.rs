//! DTOs for the link shortening endpoint.

use serde::Deserialize;
use validator::Validate;

/// Request to shorten a URL.
///
/// Only length is checked here; URL and short code rules are enforced by
/// [`crate::application::services::LinkService::allocate`] so that every
/// caller gets the same errors.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// The URL to shorten. A missing scheme defaults to `https://`.
    #[validate(length(min = 1, max = 2048, message = "originalUrl must be 1-2048 characters"))]
    pub original_url: String,

    /// Optional custom short code. An empty string is treated as absent.
    #[serde(default)]
    pub custom_code: Option<String>,
}
