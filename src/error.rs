//! Application error taxonomy and HTTP error rendering.
//!
//! Every fallible operation in the core returns [`AppError`]. Handlers return
//! it directly; [`IntoResponse`] turns it into a JSON body of the form:
//!
//! ```json
//! {
//!   "error": {
//!     "code": "invalid_code",
//!     "message": "Short code must be at least 3 characters",
//!     "details": { "min_length": 3 }
//!   }
//! }
//! ```

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Seconds advertised in `Retry-After` on rate-limited responses.
const RETRY_AFTER_SECS: &str = "60";

/// JSON envelope for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorInfo,
}

/// Machine-readable error description.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors produced by the shortener core and its HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The target URL is malformed or cannot be parsed.
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    /// The target URL uses a denylisted scheme or points into private network space.
    #[error("URL is not allowed: {0}")]
    UrlBlocked(String),

    #[error("Short code must be at least {min} characters")]
    ShortCodeTooShort { min: usize },

    #[error("Short code must not exceed {max} characters")]
    ShortCodeTooLong { max: usize },

    /// The short code contains characters outside `[A-Za-z0-9]`.
    #[error("Short code contains invalid characters")]
    ShortCodeInvalid(String),

    #[error("Short code '{0}' is reserved")]
    ShortCodeReserved(String),

    #[error("Short code already in use")]
    ShortCodeExists(String),

    #[error("{0} not found")]
    NotFound(String),

    /// The DocumentStore failed or timed out.
    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Malformed request body or query string.
    #[error("Invalid input: {0}")]
    BadRequest(String),
}

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl(_)
            | AppError::UrlBlocked(_)
            | AppError::ShortCodeTooShort { .. }
            | AppError::ShortCodeTooLong { .. }
            | AppError::ShortCodeInvalid(_)
            | AppError::ShortCodeReserved(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ShortCodeExists(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine code used by API clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidUrl(_) => "invalid_url",
            AppError::UrlBlocked(_) => "url_blocked",
            AppError::ShortCodeTooShort { .. }
            | AppError::ShortCodeTooLong { .. }
            | AppError::ShortCodeInvalid(_)
            | AppError::ShortCodeReserved(_) => "invalid_code",
            AppError::ShortCodeExists(_) => "code_exists",
            AppError::NotFound(_) => "not_found",
            AppError::Upstream(_) => "upstream_error",
            AppError::RateLimited => "rate_limited",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::BadRequest(_) => "invalid_input",
        }
    }

    fn details(&self) -> Value {
        match self {
            AppError::InvalidUrl(reason) | AppError::UrlBlocked(reason) => {
                json!({ "reason": reason })
            }
            AppError::ShortCodeTooShort { min } => json!({ "min_length": min }),
            AppError::ShortCodeTooLong { max } => json!({ "max_length": max }),
            AppError::ShortCodeInvalid(code)
            | AppError::ShortCodeReserved(code)
            | AppError::ShortCodeExists(code) => json!({ "code": code }),
            // Upstream messages can leak backend internals; they are logged instead.
            _ => json!({}),
        }
    }

    /// Builds the serializable error description.
    pub fn to_error_info(&self) -> ErrorInfo {
        let message = match self {
            AppError::Upstream(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details: self.details(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Upstream(reason) = &self {
            tracing::error!(reason = %reason, "Upstream failure");
        }

        let status = self.status();
        let body = Json(ErrorBody {
            error: self.to_error_info(),
        });

        if matches!(self, AppError::RateLimited) {
            return (status, [(header::RETRY_AFTER, RETRY_AFTER_SECS)], body).into_response();
        }

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            let constraint = db.constraint().unwrap_or("unique").to_string();
            return AppError::ShortCodeExists(constraint);
        }

        AppError::Upstream(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::BadRequest(e.to_string())
    }
}
