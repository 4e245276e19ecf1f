//! Domain layer containing business entities and logic.
//!
//! Defines entities, repository interfaces and the two pieces of core
//! machinery that do not belong to a single request: the per-client rate
//! limiter and the background click worker.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`rate_limiter`] - Token bucket admission control
//! - [`click_job`] - Background jobs emitted by the redirect path
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler resolves a short code
//! 2. [`click_job::ClickJob`]s are offered to a bounded channel
//! 3. [`click_worker::run_click_worker`] processes them with retry logic
//! 4. Events and counters are persisted via [`repositories`]

pub mod click_job;
pub mod click_worker;
pub mod entities;
pub mod rate_limiter;
pub mod repositories;
