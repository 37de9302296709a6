//! Link Statistics Module
//!
//! Tracks link lifecycle counters: creations, clicks and each kind of eviction.

use serde::Serialize;

// == Link Stats ==
/// Tracks link lifecycle counters since startup.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LinkStats {
    /// Links created through the store
    pub links_created: u64,
    /// Clicks recorded
    pub clicks: u64,
    /// Links removed on access because their TTL had elapsed
    pub expired_evictions: u64,
    /// Links removed because their click budget was spent
    pub depleted_evictions: u64,
    /// Links removed by the background reaper
    pub reaped: u64,
    /// Current number of links
    pub total_links: usize,
    /// Current number of owner records
    pub total_owners: usize,
}

/// Why a link left the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eviction {
    Expired,
    Depleted,
    Reaped,
}

impl LinkStats {
    // == Constructor ==
    /// Creates a new LinkStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_created(&mut self) {
        self.links_created += 1;
    }

    pub fn record_click(&mut self) {
        self.clicks += 1;
    }

    // == Record Eviction ==
    /// Increments the counter matching the eviction cause.
    pub fn record_eviction(&mut self, cause: Eviction) {
        match cause {
            Eviction::Expired => self.expired_evictions += 1,
            Eviction::Depleted => self.depleted_evictions += 1,
            Eviction::Reaped => self.reaped += 1,
        }
    }

    /// Total links evicted for any reason.
    pub fn total_evictions(&self) -> u64 {
        self.expired_evictions + self.depleted_evictions + self.reaped
    }

    // == Update Sizes ==
    /// Updates the current link and owner counts.
    pub fn set_totals(&mut self, links: usize, owners: usize) {
        self.total_links = links;
        self.total_owners = owners;
    }
}
