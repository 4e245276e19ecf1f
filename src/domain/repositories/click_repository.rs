//! Repository trait for click analytics.

use crate::domain::entities::ClickEvent;
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only store of [`ClickEvent`]s.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryClickRepository`] - process-local store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Persists a click event and returns its storage id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Upstream`] on storage errors.
    async fn record(&self, event: ClickEvent) -> Result<String, AppError>;

    /// Lists the most recent click events for a link, newest first.
    async fn list_for_link(
        &self,
        url_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<ClickEvent>, AppError>;
}
