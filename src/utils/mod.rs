//! Helper functions shared across layers.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`url_normalizer`] - Target URL validation and normalization
//! - [`client_ip`] - Client address extraction behind a trusted proxy

pub mod client_ip;
pub mod code_generator;
pub mod url_normalizer;
