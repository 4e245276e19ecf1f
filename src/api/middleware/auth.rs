//! API key authentication middleware.

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::state::AppState;

pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

/// Authenticates requests using the `X-API-Key` header.
///
/// # Header Format
///
/// ```text
/// X-API-Key: <key>
/// ```
///
/// Passes every request through when no `API_KEY` is configured.
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is missing or the key does not
/// match. Adds `WWW-Authenticate: ApiKey` to 401 responses.
///
/// # Example
///
/// ```rust,ignore
/// let api = Router::new()
///     .route("/urls", get(list_links_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let provided = req
        .headers()
        .get(&API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if let Err(e) = st.auth_service.authenticate(provided) {
        let mut response = e.into_response();
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("ApiKey"));
        return response;
    }

    next.run(req).await
}
