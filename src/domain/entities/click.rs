//! Click event entity representing a single redirect.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A redirect recorded for analytics.
///
/// Written once by the background click worker and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    /// Identifier of the [`crate::domain::entities::ShortLink`] that was followed.
    pub url_id: String,
    pub timestamp: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub referer: Option<String>,
}

impl ClickEvent {
    pub fn new(
        url_id: String,
        timestamp: DateTime<Utc>,
        user_agent: Option<String>,
        ip_address: Option<String>,
        referer: Option<String>,
    ) -> Self {
        Self {
            url_id,
            timestamp,
            user_agent,
            ip_address,
            referer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_event_creation_minimal() {
        let now = Utc::now();
        let event = ClickEvent::new("link-1".into(), now, None, None, None);

        assert_eq!(event.url_id, "link-1");
        assert_eq!(event.timestamp, now);
        assert!(event.user_agent.is_none());
        assert!(event.ip_address.is_none());
        assert!(event.referer.is_none());
    }
}
