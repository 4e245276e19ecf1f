//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without business logic.
//!
//! # Entity Types
//!
//! - [`ShortLink`] - A short code mapped to its original URL
//! - [`ClickEvent`] - A single redirect recorded for analytics
//!
//! Creation inputs use separate structs (`NewShortLink`) so that
//! storage-assigned fields such as the identifier never have to be faked.

pub mod click;
pub mod link;

pub use click::ClickEvent;
pub use link::{NewShortLink, ShortLink};
