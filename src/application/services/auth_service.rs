//! API key authentication for the management endpoints.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Fixed message MAC'd under each candidate key.
const KEY_CHECK_CONTEXT: &[u8] = b"shrtn/api-key/v1";

/// Checks the `X-API-Key` header against the configured key.
///
/// Keys are never compared directly: each key is used as an HMAC-SHA256 key
/// over a fixed context and the resulting tags are compared in constant time,
/// so neither key length nor matching prefixes leak through timing.
///
/// When no key is configured, authentication is disabled and every request
/// passes.
#[derive(Clone)]
pub struct AuthService {
    expected_tag: Option<Vec<u8>>,
}

impl AuthService {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            expected_tag: api_key
                .filter(|key| !key.is_empty())
                .map(|key| key_tag(&key).finalize().into_bytes().to_vec()),
        }
    }

    /// Returns true when an API key is configured.
    pub fn is_enabled(&self) -> bool {
        self.expected_tag.is_some()
    }

    /// Authenticates the key presented by a request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if a key is configured and
    /// `provided` is missing or does not match.
    pub fn authenticate(&self, provided: Option<&str>) -> Result<(), AppError> {
        let Some(expected) = &self.expected_tag else {
            return Ok(());
        };

        let provided =
            provided.ok_or_else(|| AppError::Unauthorized("missing API key".to_string()))?;

        key_tag(provided)
            .verify_slice(expected)
            .map_err(|_| AppError::Unauthorized("invalid API key".to_string()))
    }
}

fn key_tag(key: &str) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(KEY_CHECK_CONTEXT);
    mac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_without_key() {
        let service = AuthService::new(None);
        assert!(!service.is_enabled());
        assert!(service.authenticate(None).is_ok());
        assert!(service.authenticate(Some("anything")).is_ok());
    }

    #[test]
    fn test_empty_key_disables_auth() {
        assert!(!AuthService::new(Some(String::new())).is_enabled());
    }

    #[test]
    fn test_authenticate_success() {
        let service = AuthService::new(Some("s3cret-key".to_string()));
        assert!(service.authenticate(Some("s3cret-key")).is_ok());
    }

    #[test]
    fn test_authenticate_missing_key() {
        let service = AuthService::new(Some("s3cret-key".to_string()));
        assert!(matches!(
            service.authenticate(None),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_authenticate_wrong_key() {
        let service = AuthService::new(Some("s3cret-key".to_string()));
        for candidate in ["s3cret-kez", "s3cret", "s3cret-key ", ""] {
            assert!(
                matches!(
                    service.authenticate(Some(candidate)),
                    Err(AppError::Unauthorized(_))
                ),
                "{candidate:?} should be rejected"
            );
        }
    }
}
