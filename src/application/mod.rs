//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a narrow API for HTTP
//! handlers and the admin tool.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short code allocation, lookup, listing, deletion
//! - [`services::click_recorder::ClickRecorder`] - Non-blocking click job submission
//! - [`services::redirect_service::RedirectService`] - Redirect resolution
//! - [`services::auth_service::AuthService`] - API key authentication

pub mod services;
