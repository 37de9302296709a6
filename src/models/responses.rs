//! Response DTOs for the link server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::links::{Link, LinkStats};

/// A link as returned by the API.
///
/// Remaining budgets are computed at response time and are `null` when the
/// corresponding limit is unbounded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub code: String,
    pub original_url: String,
    pub owner_id: String,
    /// Creation (or last TTL reset) time
    pub created_at: DateTime<Utc>,
    /// Configured TTL in seconds, 0 = unbounded
    pub ttl_seconds: u64,
    pub ttl_remaining_seconds: Option<u64>,
    /// Configured click budget, 0 = unlimited
    pub max_clicks: u64,
    pub click_count: u64,
    pub clicks_remaining: Option<u64>,
}

impl LinkResponse {
    /// Builds the response view of `link` as seen at `now_ms`.
    pub fn from_link(link: Link, now_ms: u64) -> Self {
        let created_at = Utc
            .timestamp_millis_opt(link.created_at as i64)
            .single()
            .unwrap_or_default();

        Self {
            ttl_remaining_seconds: link.ttl_remaining_ms(now_ms).map(|ms| ms / 1000),
            clicks_remaining: link.clicks_remaining(),
            ttl_seconds: link.ttl_ms / 1000,
            created_at,
            code: link.code,
            original_url: link.original_url,
            owner_id: link.owner_id,
            max_clicks: link.max_clicks,
            click_count: link.click_count,
        }
    }
}

/// Response body for POST /owners
#[derive(Debug, Clone, Serialize)]
pub struct OwnerResponse {
    pub id: String,
}

/// Response body for GET /owners/:id/links
#[derive(Debug, Clone, Serialize)]
pub struct OwnerLinksResponse {
    pub owner: String,
    pub links: Vec<LinkResponse>,
}

/// Response body for DELETE /links/:code
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The code that was deleted
    pub code: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            message: format!("Link '{}' deleted successfully", code),
            code,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub links_created: u64,
    pub clicks: u64,
    pub expired_evictions: u64,
    pub depleted_evictions: u64,
    pub reaped: u64,
    pub total_evictions: u64,
    pub total_links: usize,
    pub total_owners: usize,
}

impl From<LinkStats> for StatsResponse {
    fn from(stats: LinkStats) -> Self {
        Self {
            total_evictions: stats.total_evictions(),
            links_created: stats.links_created,
            clicks: stats.clicks,
            expired_evictions: stats.expired_evictions,
            depleted_evictions: stats.depleted_evictions,
            reaped: stats.reaped,
            total_links: stats.total_links,
            total_owners: stats.total_owners,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_response_bounded() {
        let link = Link {
            code: "abc".to_string(),
            original_url: "https://example.com".to_string(),
            owner_id: "alice".to_string(),
            created_at: 1_700_000_000_000,
            ttl_ms: 60_000,
            max_clicks: 5,
            click_count: 2,
        };

        let resp = LinkResponse::from_link(link, 1_700_000_030_000);
        assert_eq!(resp.ttl_seconds, 60);
        assert_eq!(resp.ttl_remaining_seconds, Some(30));
        assert_eq!(resp.clicks_remaining, Some(3));
        assert_eq!(resp.created_at.timestamp_millis(), 1_700_000_000_000);

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["originalUrl"], "https://example.com");
        assert_eq!(json["clickCount"], 2);
        assert!(json["createdAt"].as_str().unwrap().starts_with("2023-11-14T"));
    }

    #[test]
    fn test_link_response_unbounded() {
        let link = Link::new("abc", "https://example.com", "alice", 0, 0);
        let resp = LinkResponse::from_link(link, u64::MAX);

        let json = serde_json::to_value(&resp).unwrap();
        assert!(json["ttlRemainingSeconds"].is_null());
        assert!(json["clicksRemaining"].is_null());
    }

    #[test]
    fn test_delete_response_serialize() {
        let resp = DeleteResponse::new("gone42");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("gone42"));
        assert!(json.contains("deleted"));
    }

    #[test]
    fn test_stats_response_totals() {
        let mut stats = LinkStats::new();
        stats.record_eviction(crate::links::Eviction::Reaped);
        stats.record_eviction(crate::links::Eviction::Expired);

        let resp = StatsResponse::from(stats);
        assert_eq!(resp.total_evictions, 2);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
