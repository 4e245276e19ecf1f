//! API route configuration.
//!
//! When `API_KEY` is configured, every endpoint here requires the
//! `X-API-Key` header via [`crate::api::middleware::auth`].

use crate::api::handlers::{
    delete_link_handler, get_link_handler, list_links_handler, shorten_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link management routes, mounted under `/api`.
///
/// # Endpoints
///
/// - `POST   /shorten`  - Create a short link
/// - `GET    /urls`     - List links (paginated, newest first)
/// - `GET    /{code}`   - Show one link without counting a click
/// - `DELETE /{code}`   - Delete a link
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/urls", get(list_links_handler))
        .route("/{code}", get(get_link_handler).delete(delete_link_handler))
}
