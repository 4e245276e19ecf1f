//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::shorten::ShortenRequest;
use crate::domain::entities::ShortLink;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "originalUrl": "https://example.com/some/long/path",
///   "customCode": "promo2026"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the stored link:
///
/// ```json
/// {
///   "id": "6f1c...",
///   "shortCode": "promo2026",
///   "originalUrl": "https://example.com/some/long/path",
///   "createdAt": "2026-01-01T00:00:00Z",
///   "updatedAt": "2026-01-01T00:00:00Z",
///   "clicks": 0
/// }
/// ```
///
/// # Errors
///
/// - 400 for malformed bodies and URL / short code validation failures
/// - 409 if the custom code is taken
/// - 500 on store failure
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortLink>), AppError> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    payload.validate()?;

    let link = state
        .link_service
        .allocate(&payload.original_url, payload.custom_code.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(link)))
}
