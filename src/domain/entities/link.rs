//! Short link entity.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A short code mapped to the URL it redirects to.
///
/// Serialized in the camelCase shape returned by the HTTP API:
/// `{id, shortCode, originalUrl, createdAt, updatedAt, clicks}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLink {
    /// Storage-assigned opaque identifier.
    pub id: String,
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub clicks: u64,
}

/// Input data for persisting a new short link.
///
/// The identifier is assigned by the DocumentStore and `clicks` always
/// starts at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShortLink {
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl NewShortLink {
    pub fn new(short_code: String, original_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            short_code,
            original_url,
            created_at,
        }
    }

    /// Materializes the stored record once the store has assigned an id.
    pub fn into_link(self, id: String) -> ShortLink {
        ShortLink {
            id,
            short_code: self.short_code,
            original_url: self.original_url,
            created_at: self.created_at,
            updated_at: self.created_at,
            clicks: 0,
        }
    }
}
