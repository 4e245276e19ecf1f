//! HTTP middleware for request processing and protection.
//!
//! Provides rate limiting, authentication, CORS, security headers and
//! observability middleware.

pub mod auth;
pub mod cors;
pub mod rate_limit;
pub mod security_headers;
pub mod tracing;
