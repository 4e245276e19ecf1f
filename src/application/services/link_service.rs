//! Short link allocation and lookup service.

use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_custom_code};
use crate::utils::url_normalizer::normalize_url;

/// Generated-code collisions tolerated before allocation fails.
const MAX_GENERATION_ATTEMPTS: usize = 5;

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// One page of links plus the total link count.
#[derive(Debug, Clone, Serialize)]
pub struct LinkPage {
    pub urls: Vec<ShortLink>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

/// Creates, resolves, lists and deletes short links.
///
/// Every store call on the request path is bounded by `store_timeout`; an
/// elapsed timeout surfaces as [`AppError::Upstream`].
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    store_timeout: Duration,
}

impl LinkService {
    pub fn new(repository: Arc<dyn LinkRepository>, store_timeout: Duration) -> Self {
        Self {
            repository,
            store_timeout,
        }
    }

    /// Validates the input and persists a new short link.
    ///
    /// # Arguments
    ///
    /// - `original_url` - Target URL; `https://` is prepended when no scheme is given
    /// - `custom_code` - Optional caller-chosen code; an empty string counts as absent
    ///
    /// # Collision Handling
    ///
    /// The existence check and the insert are separate store calls, so two
    /// concurrent allocations of the same code can both pass the check. The
    /// store's uniqueness constraint rejects the loser with
    /// [`AppError::ShortCodeExists`].
    ///
    /// For a caller-chosen code that is surfaced as [`AppError::ShortCodeExists`].
    /// Generated codes are instead retried, up to 5 attempts in total, whether
    /// the collision shows up in the lookup or on insert.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] / [`AppError::UrlBlocked`] for rejected targets
    /// - `ShortCode*` validation errors for a malformed custom code
    /// - [`AppError::ShortCodeExists`] if the custom code is taken
    /// - [`AppError::Upstream`] on store failure, timeout, or exhausted generation attempts
    pub async fn allocate(
        &self,
        original_url: &str,
        custom_code: Option<&str>,
    ) -> Result<ShortLink, AppError> {
        let original_url = normalize_url(original_url)?;

        let link = match custom_code.filter(|c| !c.is_empty()) {
            Some(custom) => {
                validate_custom_code(custom)?;

                if self
                    .bounded(self.repository.find_by_code(custom))
                    .await?
                    .is_some()
                {
                    return Err(AppError::ShortCodeExists(custom.to_string()));
                }

                let new_link = NewShortLink::new(custom.to_string(), original_url, Utc::now());
                self.bounded(self.repository.create(new_link)).await?
            }
            None => self.create_with_generated_code(original_url).await?,
        };

        metrics::counter!("links_created_total").increment(1);
        info!(short_code = %link.short_code, "Short link created");

        Ok(link)
    }

    /// Looks up a link by its exact (case-sensitive) short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    pub async fn get_by_code(&self, code: &str) -> Result<ShortLink, AppError> {
        self.bounded(self.repository.find_by_code(code))
            .await?
            .ok_or_else(|| AppError::NotFound("Short link".to_string()))
    }

    /// Returns one page of links, newest first.
    ///
    /// A missing or non-positive `limit` becomes 20 and larger values are
    /// capped at 100; a negative `offset` is treated as zero.
    pub async fn list(&self, limit: Option<i64>, offset: Option<i64>) -> Result<LinkPage, AppError> {
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .min(MAX_PAGE_LIMIT) as u32;
        let offset = u32::try_from(offset.unwrap_or(0).max(0)).unwrap_or(u32::MAX);

        let (urls, total) = tokio::try_join!(
            self.bounded(self.repository.list(limit, offset)),
            self.bounded(self.repository.count()),
        )?;

        Ok(LinkPage {
            urls,
            total,
            limit,
            offset,
        })
    }

    /// Deletes the link with this short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code, including when
    /// a concurrent delete removed it first.
    pub async fn delete_by_code(&self, code: &str) -> Result<(), AppError> {
        let link = self.get_by_code(code).await?;

        if !self.bounded(self.repository.delete(&link.id)).await? {
            return Err(AppError::NotFound("Short link".to_string()));
        }

        info!(short_code = %code, "Short link deleted");
        Ok(())
    }

    /// Checks store connectivity.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.bounded(self.repository.ping()).await
    }

    async fn create_with_generated_code(
        &self,
        original_url: String,
    ) -> Result<ShortLink, AppError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let code = generate_code()?;

            if self
                .bounded(self.repository.find_by_code(&code))
                .await?
                .is_some()
            {
                warn!(attempt, "Generated short code collided, retrying");
                continue;
            }

            let new_link = NewShortLink::new(code, original_url.clone(), Utc::now());
            match self.bounded(self.repository.create(new_link)).await {
                Err(AppError::ShortCodeExists(code)) => {
                    warn!(
                        attempt,
                        short_code = %code,
                        "Generated short code taken on insert, retrying"
                    );
                }
                other => return other,
            }
        }

        Err(AppError::Upstream(
            "failed to generate a unique short code".to_string(),
        ))
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| AppError::Upstream("store operation timed out".to_string()))?
    }
}
