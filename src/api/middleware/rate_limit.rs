//! Per-client rate limiting middleware.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Admits or rejects a request against the client's token bucket.
///
/// # Key Extraction
///
/// Clients are identified by IP address. Forwarding headers are honoured
/// only when the socket peer is the configured trusted proxy; see
/// [`crate::utils::client_ip::client_ip`].
///
/// Rejected requests receive `429 Too Many Requests` with `Retry-After` and
/// never reach the handler.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/{code}", get(redirect_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), rate_limit::layer));
/// ```
pub async fn layer(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Response {
    let ip = client_ip(req.headers(), peer, state.trusted_proxy);

    if !state.rate_limiter.admit(&ip.to_string()) {
        debug!(client = %ip, path = %req.uri().path(), "Rate limit exceeded");
        metrics::counter!("rate_limit_rejected_total").increment(1);
        return AppError::RateLimited.into_response();
    }

    next.run(req).await
}
