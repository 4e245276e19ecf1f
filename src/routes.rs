//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`  - Short link redirect (public)
//! - `GET  /health`  - Health check: store, click queue (public)
//! - `/api/*`        - Link management API (API key when configured)
//!
//! # Middleware (outermost first)
//!
//! 1. **Tracing** - Structured request/response logging
//! 2. **Rate limiting** - Per-client token bucket on every route
//! 3. **CORS** - Configured origin allow list
//! 4. **Security headers** - nosniff, frame denial, CSP and friends
//! 5. **Authentication** - `X-API-Key` on `/api/*`
//!
//! Trailing-slash normalization wraps the whole router in [`crate::server`],
//! since it has to rewrite the path before routing.

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, cors, rate_limit, security_headers, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `cors_origins` - origins allowed to call the API from a browser
///
/// Handlers and the rate limiter read the peer address from
/// [`axum::extract::ConnectInfo`], so the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn app_router(state: AppState, cors_origins: &[String]) -> Router {
    let api_router = api::routes::api_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let router = Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router);

    security_headers::apply(router)
        .layer(cors::layer(cors_origins))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::layer,
        ))
        .layer(tracing::layer())
        .with_state(state)
}
