//! Client IP extraction with trusted-proxy awareness.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Determines the originating client address of a request.
///
/// Forwarding headers are honoured only when the immediate peer is the
/// configured trusted proxy. In that case the first `X-Forwarded-For` entry
/// wins, then `X-Real-IP`. Any header value that does not parse as an IP
/// address is ignored. In every other case the socket peer address is used,
/// so untrusted clients cannot spoof their address with forged headers.
///
/// # Examples
///
/// ```ignore
/// let proxy: IpAddr = "10.0.0.1".parse().unwrap();
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// let peer: SocketAddr = "10.0.0.1:55000".parse().unwrap();
/// assert_eq!(client_ip(&headers, peer, Some(proxy)).to_string(), "203.0.113.7");
/// ```
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, trusted_proxy: Option<IpAddr>) -> IpAddr {
    let peer_ip = peer.ip();

    if trusted_proxy != Some(peer_ip) {
        return peer_ip;
    }

    forwarded_for(headers)
        .or_else(|| real_ip(headers))
        .unwrap_or(peer_ip)
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get(X_FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .and_then(|first| first.trim().parse().ok())
}

fn real_ip(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get(X_REAL_IP)?
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse().ok())
}
