//! Handlers for link management endpoints (list, show, delete).

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};

use crate::api::dto::pagination::ListParams;
use crate::application::services::LinkPage;
use crate::domain::entities::ShortLink;
use crate::error::AppError;
use crate::state::AppState;

/// Lists links, newest first.
///
/// # Endpoint
///
/// `GET /api/urls?limit=20&offset=0`
///
/// `limit` defaults to 20 and is clamped to 1..=100; a negative `offset`
/// is treated as 0.
///
/// # Response
///
/// ```json
/// { "urls": [ ... ], "total": 42, "limit": 20, "offset": 0 }
/// ```
pub async fn list_links_handler(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<LinkPage>, AppError> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let page = state.link_service.list(params.limit, params.offset).await?;
    Ok(Json(page))
}

/// Returns a single link without recording a click.
///
/// # Endpoint
///
/// `GET /api/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn get_link_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ShortLink>, AppError> {
    let link = state.link_service.get_by_code(&code).await?;
    Ok(Json(link))
}

/// Deletes a link.
///
/// # Endpoint
///
/// `DELETE /api/{code}`
///
/// # Response
///
/// `204 No Content`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_by_code(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}
