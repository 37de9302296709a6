//! Request DTOs for the link server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for POST /links
///
/// # Fields
/// - `url`: Target URL, http or https
/// - `maxClicks`: Optional click budget (server default if omitted, 0 = unlimited)
/// - `ttlSeconds`: Optional lifetime in seconds (server default if omitted, 0 = unbounded)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    /// Target URL
    pub url: String,
    /// Optional click budget
    #[serde(default)]
    pub max_clicks: Option<i64>,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl_seconds: Option<i64>,
}

/// Request body for PATCH /links/:code/limit and /links/:code/ttl
#[derive(Debug, Clone, Deserialize)]
pub struct EditRequest {
    /// New click limit or TTL in seconds
    pub value: i64,
}

/// Request body for POST /owners
///
/// An absent or blank `id` asks the server to generate one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterOwnerRequest {
    #[serde(default)]
    pub id: Option<String>,
}
