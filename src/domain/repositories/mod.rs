//! Repository trait definitions for the domain layer.
//!
//! These traits are the DocumentStore contract the core depends on. The core
//! never assumes transactional semantics across calls: the short-code
//! existence check and the create call are independent round trips.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link storage and lookup
//! - [`ClickRepository`] - Append-only click event log

pub mod click_repository;
pub mod link_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
