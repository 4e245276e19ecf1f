//! Repository implementations.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] / [`PgClickRepository`] - PostgreSQL via SQLx
//! - [`InMemoryLinkRepository`] / [`InMemoryClickRepository`] - process-local
//!   fallback used when no database is configured

pub mod memory_repository;
pub mod pg_click_repository;
pub mod pg_link_repository;

pub use memory_repository::{InMemoryClickRepository, InMemoryLinkRepository};
pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
