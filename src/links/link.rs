//! Link Module
//!
//! Defines the short link record with its TTL and click-budget predicates.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// == Link ==
/// A short code pointing at an original URL.
///
/// Everything except `max_clicks` and `click_count` is fixed once the link is
/// built. `ttl_ms` and `max_clicks` use 0 for "unbounded".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Unique short code
    pub code: String,
    /// Target URL
    pub original_url: String,
    /// Owner identifier
    #[serde(alias = "ownerUuid")]
    pub owner_id: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Time to live in milliseconds, 0 = never expires
    #[serde(rename = "ttl", alias = "ttlMillis")]
    pub ttl_ms: u64,
    /// Click budget, 0 = unlimited
    pub max_clicks: u64,
    /// Clicks recorded so far
    pub click_count: u64,
}

impl Link {
    // == Constructor ==
    /// Creates a fresh link stamped with the current time and zero clicks.
    ///
    /// # Arguments
    /// * `ttl_seconds` - TTL in seconds, 0 for unbounded
    /// * `max_clicks` - Click budget, 0 for unlimited
    pub fn new(
        code: impl Into<String>,
        original_url: impl Into<String>,
        owner_id: impl Into<String>,
        ttl_seconds: u64,
        max_clicks: u64,
    ) -> Self {
        Self {
            code: code.into(),
            original_url: original_url.into(),
            owner_id: owner_id.into(),
            created_at: current_timestamp_ms(),
            ttl_ms: ttl_seconds.saturating_mul(1000),
            max_clicks,
            click_count: 0,
        }
    }

    // == Is Expired ==
    /// Checks whether the TTL has elapsed at `now_ms`.
    ///
    /// Boundary condition: a link whose age equals its TTL is already expired.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        self.ttl_ms != 0 && now_ms.saturating_sub(self.created_at) >= self.ttl_ms
    }

    /// Checks whether the TTL has elapsed right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    // == Is Depleted ==
    /// Checks whether the click budget is spent.
    pub fn is_depleted(&self) -> bool {
        self.max_clicks != 0 && self.click_count >= self.max_clicks
    }

    /// Returns true if the given owner id created this link.
    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }

    // == Remaining Budgets ==
    /// Returns remaining TTL in milliseconds at `now_ms`, or None if unbounded.
    ///
    /// # Returns
    /// - `Some(0)` once the TTL has elapsed
    /// - `None` if the link never expires
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> Option<u64> {
        if self.ttl_ms == 0 {
            return None;
        }
        let deadline = self.created_at.saturating_add(self.ttl_ms);
        Some(deadline.saturating_sub(now_ms))
    }

    /// Returns the number of clicks left, or None if unlimited.
    pub fn clicks_remaining(&self) -> Option<u64> {
        if self.max_clicks == 0 {
            None
        } else {
            Some(self.max_clicks.saturating_sub(self.click_count))
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
///
/// A clock set before the epoch reads as 0 rather than panicking.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
