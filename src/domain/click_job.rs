//! Background click jobs and the request metadata they are built from.

use axum::http::{HeaderMap, header};
use chrono::Utc;
use std::net::{IpAddr, SocketAddr};

use crate::domain::entities::ClickEvent;
use crate::utils::client_ip::client_ip;

/// Request details captured on the redirect path.
///
/// Built synchronously in the handler so that nothing borrowed from the
/// request has to outlive the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMeta {
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub ip: IpAddr,
}

impl RequestMeta {
    /// Extracts user agent, referer and the client address.
    ///
    /// See [`client_ip`] for the trusted-proxy rules.
    pub fn from_headers(
        headers: &HeaderMap,
        peer: SocketAddr,
        trusted_proxy: Option<IpAddr>,
    ) -> Self {
        let header_string = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        Self {
            user_agent: header_string(header::USER_AGENT),
            referer: header_string(header::REFERER),
            ip: client_ip(headers, peer, trusted_proxy),
        }
    }

    /// Builds the click event for the link with the given id, stamped now.
    pub fn into_event(self, url_id: String) -> ClickEvent {
        ClickEvent::new(
            url_id,
            Utc::now(),
            self.user_agent,
            Some(self.ip.to_string()),
            self.referer,
        )
    }
}

/// A unit of background work submitted by the redirect path.
///
/// The two variants produced by one redirect are independent: they may run
/// concurrently and complete in either order.
#[derive(Debug, Clone)]
pub enum ClickJob {
    /// Persist a click event.
    Record(ClickEvent),
    /// Increment the click counter of a link.
    IncrementClicks { link_id: String },
}

impl ClickJob {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ClickJob::Record(_) => "record",
            ClickJob::IncrementClicks { .. } => "increment",
        }
    }
}
