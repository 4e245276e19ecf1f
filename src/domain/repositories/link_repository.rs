//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persists a new short link and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ShortCodeExists`] if the store's own uniqueness
    /// constraint rejects the code (the race the allocator's pre-check cannot close).
    ///
    /// Returns [`AppError::Upstream`] on storage errors.
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ShortLink))` if found
    /// - `Ok(None)` if not found
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Lists links newest first.
    async fn list(&self, limit: u32, offset: u32) -> Result<Vec<ShortLink>, AppError>;

    /// Counts all stored links.
    async fn count(&self) -> Result<u64, AppError>;

    /// Adds one to the link's click counter and bumps `updated_at`.
    ///
    /// Implementations perform the increment as a single store-side operation
    /// so concurrent redirects of the same link are not lost.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    async fn increment_clicks(&self, id: &str) -> Result<(), AppError>;

    /// Deletes a link by id. Returns `Ok(false)` if it did not exist.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    /// Checks that the backing store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
