//! Target URL validation and normalization.
//!
//! Guards the service against being used as an open redirector into internal
//! network space or into script-executing schemes.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use url::{Host, Url};

use crate::error::AppError;

/// Scheme prefixes that are never accepted, matched case-insensitively.
const BLOCKED_SCHEMES: &[&str] = &["javascript:", "data:", "vbscript:", "file:"];

/// Validates a user-supplied target URL and returns the form to store.
///
/// # Normalization Rules
///
/// 1. Surrounding whitespace is trimmed
/// 2. `https://` is prepended when no `http://` or `https://` scheme is present
/// 3. Nothing else is rewritten, so the stored URL round-trips exactly
///
/// # Security
///
/// - Denylisted schemes (`javascript:`, `data:`, `vbscript:`, `file:`) are blocked
/// - Any other explicit scheme besides HTTP(S) is rejected as invalid
/// - Literal IP hosts in loopback, private, link-local or unspecified ranges
///   and `localhost` names are blocked
///
/// # Errors
///
/// Returns [`AppError::InvalidUrl`] for empty or unparseable input, embedded
/// control characters, or a missing host.
/// Returns [`AppError::UrlBlocked`] for denylisted schemes and internal targets.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("example.com").unwrap(), "https://example.com");
/// assert!(normalize_url("http://127.0.0.1/x").is_err());
/// ```
pub fn normalize_url(input: &str) -> Result<String, AppError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidUrl("URL is empty".to_string()));
    }

    let lower = trimmed.to_ascii_lowercase();
    if let Some(scheme) = BLOCKED_SCHEMES.iter().find(|s| lower.starts_with(*s)) {
        return Err(AppError::UrlBlocked(format!(
            "scheme '{}' is not allowed",
            scheme.trim_end_matches(':')
        )));
    }

    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(AppError::InvalidUrl(
            "URL contains control characters".to_string(),
        ));
    }

    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else if trimmed.contains("://") {
        return Err(AppError::InvalidUrl(
            "only http and https URLs are supported".to_string(),
        ));
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&candidate).map_err(|e| AppError::InvalidUrl(e.to_string()))?;

    match parsed.host() {
        None => return Err(AppError::InvalidUrl("URL has no host".to_string())),
        Some(Host::Domain(domain)) if domain.is_empty() => {
            return Err(AppError::InvalidUrl("URL has no host".to_string()));
        }
        Some(Host::Domain(domain)) if is_localhost_name(domain) => {
            return Err(AppError::UrlBlocked(
                "local hosts are not allowed".to_string(),
            ));
        }
        Some(Host::Ipv4(ip)) if is_internal_ip(IpAddr::V4(ip)) => {
            return Err(AppError::UrlBlocked(format!("address {ip} is internal")));
        }
        Some(Host::Ipv6(ip)) if is_internal_ip(IpAddr::V6(ip)) => {
            return Err(AppError::UrlBlocked(format!("address {ip} is internal")));
        }
        Some(_) => {}
    }

    Ok(candidate)
}

fn is_localhost_name(domain: &str) -> bool {
    let domain = domain.trim_end_matches('.');
    domain.eq_ignore_ascii_case("localhost") || domain.to_ascii_lowercase().ends_with(".localhost")
}

/// Returns true for loopback, private, link-local and unspecified addresses.
pub fn is_internal_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_internal_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_internal_v4(v4),
            None => is_internal_v6(v6),
        },
    }
}

fn is_internal_v4(ip: Ipv4Addr) -> bool {
    ip.is_loopback() || ip.is_private() || ip.is_link_local() || ip.is_unspecified()
}

fn is_internal_v6(ip: Ipv6Addr) -> bool {
    ip.is_loopback() || ip.is_unique_local() || ip.is_unicast_link_local() || ip.is_unspecified()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_https_url_unchanged() {
        assert_eq!(
            normalize_url("https://a.example/page").unwrap(),
            "https://a.example/page"
        );
    }

    #[test]
    fn test_prepends_https_when_scheme_missing() {
        assert_eq!(normalize_url("example.com").unwrap(), "https://example.com");
        assert_eq!(
            normalize_url("example.com/path?q=1").unwrap(),
            "https://example.com/path?q=1"
        );
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(
            normalize_url("  http://example.com/x  ").unwrap(),
            "http://example.com/x"
        );
    }

    #[test]
    fn test_uppercase_scheme_is_accepted() {
        assert_eq!(
            normalize_url("HTTPS://Example.com").unwrap(),
            "HTTPS://Example.com"
        );
    }

    #[test]
    fn test_empty_is_invalid() {
        assert!(matches!(normalize_url(""), Err(AppError::InvalidUrl(_))));
        assert!(matches!(normalize_url("   "), Err(AppError::InvalidUrl(_))));
    }

    #[test]
    fn test_control_characters_are_invalid() {
        for input in [
            "https://example.com/a\nb",
            "https://example.com/a\rb",
            "https://example.com/a\tb",
            "https://example.com/a\x01b",
            "example.com/\x7f",
        ] {
            assert!(
                matches!(normalize_url(input), Err(AppError::InvalidUrl(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_not_a_url_is_invalid() {
        assert!(matches!(
            normalize_url("not a url"),
            Err(AppError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_other_schemes_are_invalid() {
        assert!(matches!(
            normalize_url("ftp://example.com/file"),
            Err(AppError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_blocked_schemes() {
        for url in [
            "javascript:alert(1)",
            "JavaScript:alert(1)",
            "data:text/html,<script>alert(1)</script>",
            "vbscript:msgbox",
            "file:///etc/passwd",
        ] {
            assert!(
                matches!(normalize_url(url), Err(AppError::UrlBlocked(_))),
                "{url} should be blocked"
            );
        }
    }

    #[test]
    fn test_loopback_is_blocked() {
        assert!(matches!(
            normalize_url("http://127.0.0.1/x"),
            Err(AppError::UrlBlocked(_))
        ));
        assert!(matches!(
            normalize_url("http://[::1]:8080/"),
            Err(AppError::UrlBlocked(_))
        ));
    }

    #[test]
    fn test_private_and_link_local_are_blocked() {
        for url in [
            "http://10.1.2.3",
            "http://172.16.0.1/admin",
            "192.168.1.1",
            "http://169.254.169.254/latest/meta-data",
            "http://0.0.0.0",
            "http://[fd00::1]/",
            "http://[fe80::1]/",
            "http://[::ffff:127.0.0.1]/",
        ] {
            assert!(
                matches!(normalize_url(url), Err(AppError::UrlBlocked(_))),
                "{url} should be blocked"
            );
        }
    }

    #[test]
    fn test_localhost_names_are_blocked() {
        assert!(matches!(
            normalize_url("http://localhost:3000"),
            Err(AppError::UrlBlocked(_))
        ));
        assert!(matches!(
            normalize_url("https://api.localhost/"),
            Err(AppError::UrlBlocked(_))
        ));
    }

    #[test]
    fn test_public_ip_is_allowed() {
        assert_eq!(
            normalize_url("http://93.184.216.34/").unwrap(),
            "http://93.184.216.34/"
        );
    }
}
