//! Redirect resolution: lookup, click submission, target URL.

use std::sync::Arc;

use crate::application::services::{ClickRecorder, LinkService};
use crate::domain::click_job::RequestMeta;
use crate::error::AppError;

/// Resolves short codes on the public redirect path.
///
/// Once the code resolves, the redirect succeeds regardless of analytics
/// health: click submission never fails the request.
#[derive(Clone)]
pub struct RedirectService {
    links: Arc<LinkService>,
    clicks: ClickRecorder,
}

impl RedirectService {
    pub fn new(links: Arc<LinkService>, clicks: ClickRecorder) -> Self {
        Self { links, clicks }
    }

    /// Returns the target URL for `code` and submits its click jobs.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code does not exist
    /// - [`AppError::Upstream`] if the lookup fails or times out
    pub async fn resolve(&self, code: &str, meta: RequestMeta) -> Result<String, AppError> {
        let link = self.links.get_by_code(code).await?;
        self.clicks.record(&link, meta);
        Ok(link.original_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::click_job::ClickJob;
    use crate::domain::entities::NewShortLink;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn meta() -> RequestMeta {
        RequestMeta {
            user_agent: None,
            referer: None,
            ip: "198.51.100.1".parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_resolve_returns_target_and_submits_jobs() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .withf(|code| code == "abc123")
            .returning(|code| {
                Ok(Some(
                    NewShortLink::new(code.into(), "https://example.com/t".into(), Utc::now())
                        .into_link("link-1".into()),
                ))
            });

        let (tx, mut rx) = mpsc::channel(8);
        let links = Arc::new(LinkService::new(Arc::new(repo), Duration::from_secs(5)));
        let service = RedirectService::new(links, ClickRecorder::new(tx));

        let target = service.resolve("abc123", meta()).await.unwrap();

        assert_eq!(target, "https://example.com/t");
        assert!(matches!(rx.recv().await.unwrap(), ClickJob::Record(_)));
        assert!(matches!(
            rx.recv().await.unwrap(),
            ClickJob::IncrementClicks { .. }
        ));
    }

    #[tokio::test]
    async fn test_unknown_code_submits_nothing() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().returning(|_| Ok(None));

        let (tx, mut rx) = mpsc::channel(8);
        let links = Arc::new(LinkService::new(Arc::new(repo), Duration::from_secs(5)));
        let service = RedirectService::new(links, ClickRecorder::new(tx));

        assert!(matches!(
            service.resolve("nope", meta()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_redirect_succeeds_when_click_queue_is_gone() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().returning(|code| {
            Ok(Some(
                NewShortLink::new(code.into(), "https://example.com".into(), Utc::now())
                    .into_link("link-1".into()),
            ))
        });

        let (tx, rx) = mpsc::channel(8);
        drop(rx);
        let links = Arc::new(LinkService::new(Arc::new(repo), Duration::from_secs(5)));
        let service = RedirectService::new(links, ClickRecorder::new(tx));

        assert!(service.resolve("abc123", meta()).await.is_ok());
    }
}
