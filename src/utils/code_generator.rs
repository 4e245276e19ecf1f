//! Short code generation and validation utilities.
//!
//! Provides cryptographically secure random code generation and validation
//! for custom user-provided codes.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::AppError;

/// Alphabet for generated codes.
const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated codes.
pub const GENERATED_CODE_LENGTH: usize = 6;

pub const MIN_CUSTOM_LENGTH: usize = 3;
pub const MAX_CUSTOM_LENGTH: usize = 20;

/// Largest multiple of 62 that fits in a byte; bytes at or above it are
/// rejected so every symbol is equally likely.
const REJECTION_THRESHOLD: u8 = 248;

/// Reserved codes that cannot be used as short links.
///
/// These collide with system routes or well-known paths.
const RESERVED_CODES: &[&str] = &["api", "admin", "health", "www", "static", "assets", "favicon"];

static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("valid short code regex"));

/// Generates a random 6-character code over `[A-Za-z0-9]`.
///
/// Randomness comes from the operating system via `getrandom`. Each symbol is
/// drawn uniformly using rejection sampling.
///
/// # Errors
///
/// Returns [`AppError::Upstream`] if the system random source fails.
pub fn generate_code() -> Result<String, AppError> {
    let mut code = String::with_capacity(GENERATED_CODE_LENGTH);
    let mut buffer = [0u8; 16];

    while code.len() < GENERATED_CODE_LENGTH {
        getrandom::fill(&mut buffer)
            .map_err(|e| AppError::Upstream(format!("random source failed: {e}")))?;

        for byte in buffer {
            if byte < REJECTION_THRESHOLD {
                code.push(char::from(ALPHABET[usize::from(byte % 62)]));
                if code.len() == GENERATED_CODE_LENGTH {
                    break;
                }
            }
        }
    }

    Ok(code)
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 3-20 characters
/// - Allowed characters: ASCII letters and digits
/// - Cannot be a reserved system code (case-insensitive)
///
/// # Errors
///
/// - [`AppError::ShortCodeTooShort`] / [`AppError::ShortCodeTooLong`] for length violations
/// - [`AppError::ShortCodeInvalid`] for characters outside `[A-Za-z0-9]`
/// - [`AppError::ShortCodeReserved`] for reserved words
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.len() < MIN_CUSTOM_LENGTH {
        return Err(AppError::ShortCodeTooShort {
            min: MIN_CUSTOM_LENGTH,
        });
    }

    if code.len() > MAX_CUSTOM_LENGTH {
        return Err(AppError::ShortCodeTooLong {
            max: MAX_CUSTOM_LENGTH,
        });
    }

    if !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(AppError::ShortCodeInvalid(code.to_string()));
    }

    if RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
    {
        return Err(AppError::ShortCodeReserved(code.to_string()));
    }

    Ok(())
}
