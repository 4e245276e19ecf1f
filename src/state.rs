//! Shared application state handed to every handler and middleware.

use std::net::IpAddr;
use std::sync::Arc;

use crate::application::services::{AuthService, ClickRecorder, LinkService, RedirectService};
use crate::domain::rate_limiter::TokenBucketLimiter;

/// Cloneable handle to the services behind the HTTP surface.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    pub click_recorder: ClickRecorder,
    pub auth_service: Arc<AuthService>,
    pub rate_limiter: TokenBucketLimiter,
    /// Peer address allowed to supply `X-Forwarded-For` / `X-Real-IP`.
    pub trusted_proxy: Option<IpAddr>,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService>,
        click_recorder: ClickRecorder,
        auth_service: AuthService,
        rate_limiter: TokenBucketLimiter,
        trusted_proxy: Option<IpAddr>,
    ) -> Self {
        let redirect_service = Arc::new(RedirectService::new(
            link_service.clone(),
            click_recorder.clone(),
        ));

        Self {
            link_service,
            redirect_service,
            click_recorder,
            auth_service: Arc::new(auth_service),
            rate_limiter,
            trusted_proxy,
        }
    }
}
