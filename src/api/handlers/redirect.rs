//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use std::net::SocketAddr;

use crate::domain::click_job::RequestMeta;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Capture user agent, referer and client IP
/// 2. Resolve the code (case-sensitive)
/// 3. Submit click jobs to the background worker without waiting
/// 4. Return 301 Moved Permanently
///
/// The response forbids caching so that browsers come back through the
/// service and every visit is counted.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let meta = RequestMeta::from_headers(&headers, peer, state.trusted_proxy);
    let target = state.redirect_service.resolve(&code, meta).await?;

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [
            (header::LOCATION, target),
            (
                header::CACHE_CONTROL,
                "no-cache, no-store, must-revalidate".to_string(),
            ),
            (header::PRAGMA, "no-cache".to_string()),
            (header::EXPIRES, "0".to_string()),
        ],
    ))
}
