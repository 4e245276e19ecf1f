//! Business logic services for the application layer.

pub mod auth_service;
pub mod click_recorder;
pub mod link_service;
pub mod redirect_service;

pub use auth_service::AuthService;
pub use click_recorder::ClickRecorder;
pub use link_service::{LinkPage, LinkService};
pub use redirect_service::RedirectService;
