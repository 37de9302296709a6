//! Link Lifecycle Service
//!
//! Business rules on top of [`LinkStore`]: validated creation with unique
//! codes, lazy eviction on open, and owner-gated edits and deletes.
//!
//! Every mutating operation runs all of its checks before touching the store,
//! so a rejected call never leaves a partial change behind.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{LinkError, Result};
use crate::links::{
    current_timestamp_ms, generate_code, validate_url, ClickOutcome, Eviction, Link, LinkStore,
    Owner, MAX_CODE_ATTEMPTS,
};

// == Open Outcome ==
/// What happened when a code was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    /// No link under that code
    NotFound,
    /// TTL had elapsed; the link was removed
    Expired,
    /// Click budget was already spent; the link was removed without counting
    Depleted,
    /// Click counted; the caller should follow `url`
    Redirect {
        url: String,
        click_count: u64,
        /// This click spent the budget and the link has been removed
        last_click: bool,
    },
}

// == Link Service ==
#[derive(Debug, Clone)]
pub struct LinkService {
    store: Arc<LinkStore>,
    shortcode_length: usize,
    default_ttl_seconds: i64,
    default_max_clicks: i64,
}

impl LinkService {
    pub fn new(store: Arc<LinkStore>, config: &Config) -> Self {
        Self {
            store,
            shortcode_length: config.shortcode_length,
            default_ttl_seconds: config.default_ttl_seconds,
            default_max_clicks: config.default_max_clicks,
        }
    }

    pub fn store(&self) -> &Arc<LinkStore> {
        &self.store
    }

    // == Create ==
    /// Creates a link for `owner_id` pointing at `url`.
    ///
    /// # Arguments
    /// * `max_clicks` - Click budget, 0 for unlimited
    /// * `ttl_seconds` - Lifetime in seconds, 0 for unbounded
    ///
    /// # Errors
    /// - `MissingOwner` for a blank owner id
    /// - `InvalidUrl` unless `url` is a non-blank http(s) URL
    /// - `InvalidArgument` for a negative budget or TTL
    /// - `ExhaustedCodeSpace` if no free code turned up in
    ///   [`MAX_CODE_ATTEMPTS`] tries
    pub async fn create(
        &self,
        owner_id: &str,
        url: &str,
        max_clicks: i64,
        ttl_seconds: i64,
    ) -> Result<Link> {
        let owner_id = owner_id.trim();
        if owner_id.is_empty() {
            return Err(LinkError::MissingOwner);
        }
        let url = validate_url(url)?;
        let max_clicks = non_negative("click limit", max_clicks)?;
        let ttl_seconds = non_negative("TTL", ttl_seconds)?;

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_code(self.shortcode_length);
            let link = Link::new(code, url, owner_id, ttl_seconds, max_clicks);
            if self.store.put_if_absent(link.clone()).await {
                info!(
                    "Created link {} -> {} (owner: {}, max clicks: {}, ttl: {}s)",
                    link.code, link.original_url, link.owner_id, max_clicks, ttl_seconds
                );
                return Ok(link);
            }
        }

        Err(LinkError::ExhaustedCodeSpace(MAX_CODE_ATTEMPTS))
    }

    /// Same as [`LinkService::create`], taking omitted limits from the
    /// configured defaults.
    pub async fn create_with_defaults(
        &self,
        owner_id: &str,
        url: &str,
        max_clicks: Option<i64>,
        ttl_seconds: Option<i64>,
    ) -> Result<Link> {
        self.create(
            owner_id,
            url,
            max_clicks.unwrap_or(self.default_max_clicks),
            ttl_seconds.unwrap_or(self.default_ttl_seconds),
        )
        .await
    }

    // == Open ==
    /// Follows a code: evicts it if expired or depleted, otherwise counts the
    /// click.
    ///
    /// A click that spends the budget is counted and persisted first, then
    /// the link is removed.
    pub async fn open(&self, code: &str) -> OpenOutcome {
        let Some(link) = self.store.get(code).await else {
            debug!("Open {}: not found", code);
            return OpenOutcome::NotFound;
        };

        // Evictions re-check the stored link, so an edit that renewed it in
        // the meantime wins and the open proceeds to counting
        let now = current_timestamp_ms();
        if link.is_expired_at(now)
            && self
                .store
                .evict_if(code, Eviction::Expired, |l| l.is_expired_at(now))
                .await
                .is_some()
        {
            info!("Link {} expired and was removed", code);
            return OpenOutcome::Expired;
        }

        if link.is_depleted()
            && self
                .store
                .evict_if(code, Eviction::Depleted, Link::is_depleted)
                .await
                .is_some()
        {
            info!("Link {} had no clicks left and was removed", code);
            return OpenOutcome::Depleted;
        }

        match self.store.increment_clicks(code).await {
            ClickOutcome::Missing => OpenOutcome::NotFound,
            ClickOutcome::Exhausted(_) => {
                // Another open spent the last click between our read and now
                self.store
                    .evict_if(code, Eviction::Depleted, Link::is_depleted)
                    .await;
                OpenOutcome::Depleted
            }
            ClickOutcome::Counted(clicked) => {
                let last_click = clicked.is_depleted()
                    && self
                        .store
                        .evict_if(code, Eviction::Depleted, Link::is_depleted)
                        .await
                        .is_some();
                if last_click {
                    info!("Link {} reached its click limit and was removed", code);
                }
                OpenOutcome::Redirect {
                    url: clicked.original_url,
                    click_count: clicked.click_count,
                    last_click,
                }
            }
        }
    }

    /// Current state of a link. Never evicts or mutates.
    pub async fn info(&self, code: &str) -> Option<Link> {
        self.store.get(code).await
    }

    // == Delete ==
    /// Deletes a link if `requester` owns it.
    ///
    /// # Errors
    /// `NotFound` or `Forbidden`; the store is untouched in both cases.
    pub async fn try_delete(&self, code: &str, requester: &str) -> Result<Link> {
        self.owned_link(code, requester).await?;
        let link = self
            .store
            .remove(code)
            .await
            .ok_or_else(|| LinkError::NotFound(code.to_string()))?;
        info!("Link {} deleted by its owner", code);
        Ok(link)
    }

    /// [`LinkService::try_delete`] as a plain success flag.
    pub async fn delete(&self, code: &str, requester: &str) -> bool {
        log_rejection("delete", self.try_delete(code, requester).await).is_some()
    }

    // == Edit ==
    /// Replaces the click budget, keeping the click count.
    pub async fn try_edit_limit(
        &self,
        code: &str,
        requester: &str,
        new_max_clicks: i64,
    ) -> Result<Link> {
        self.require_exists(code).await?;
        let new_max_clicks = non_negative("click limit", new_max_clicks)?;
        self.owned_link(code, requester).await?;

        let updated = self
            .store
            .update(code, |link| link.max_clicks = new_max_clicks)
            .await
            .ok_or_else(|| LinkError::NotFound(code.to_string()))?;
        info!("Link {} click limit set to {}", code, new_max_clicks);
        Ok(updated)
    }

    pub async fn edit_limit(&self, code: &str, requester: &str, new_max_clicks: i64) -> bool {
        log_rejection(
            "edit limit",
            self.try_edit_limit(code, requester, new_max_clicks).await,
        )
        .is_some()
    }

    /// Replaces the TTL and restarts the expiration window from now.
    pub async fn try_edit_ttl(
        &self,
        code: &str,
        requester: &str,
        new_ttl_seconds: i64,
    ) -> Result<Link> {
        self.require_exists(code).await?;
        let new_ttl_seconds = non_negative("TTL", new_ttl_seconds)?;
        self.owned_link(code, requester).await?;

        let now = current_timestamp_ms();
        let updated = self
            .store
            .update(code, |link| {
                link.ttl_ms = new_ttl_seconds.saturating_mul(1000);
                link.created_at = now;
            })
            .await
            .ok_or_else(|| LinkError::NotFound(code.to_string()))?;
        info!("Link {} TTL set to {}s", code, new_ttl_seconds);
        Ok(updated)
    }

    pub async fn edit_ttl(&self, code: &str, requester: &str, new_ttl_seconds: i64) -> bool {
        log_rejection(
            "edit ttl",
            self.try_edit_ttl(code, requester, new_ttl_seconds).await,
        )
        .is_some()
    }

    // == Owners ==
    /// Returns a usable owner id, registering it if needed.
    ///
    /// A blank or missing id gets a fresh UUID.
    pub async fn ensure_owner(&self, requested: Option<&str>) -> String {
        match requested.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => {
                if self.store.get_user(id).await.is_none() {
                    self.store.put_user(Owner::new(id)).await;
                    info!("Registered owner {}", id);
                }
                id.to_string()
            }
            None => {
                let id = Uuid::new_v4().to_string();
                self.store.put_user(Owner::new(id.clone())).await;
                info!("Registered new owner {}", id);
                id
            }
        }
    }

    /// Full owner id matching a prefix, if any owner has one.
    pub async fn resolve_owner(&self, prefix: &str) -> Option<String> {
        self.store.find_user_by_prefix(prefix).await
    }

    /// Links owned by `owner_id`, oldest first.
    pub async fn list(&self, owner_id: &str) -> Vec<Link> {
        self.store.links_for_owner(owner_id).await
    }

    // == Helpers ==
    async fn require_exists(&self, code: &str) -> Result<()> {
        if self.store.get(code).await.is_some() {
            Ok(())
        } else {
            Err(LinkError::NotFound(code.to_string()))
        }
    }

    async fn owned_link(&self, code: &str, requester: &str) -> Result<Link> {
        let link = self
            .store
            .get(code)
            .await
            .ok_or_else(|| LinkError::NotFound(code.to_string()))?;
        if !link.is_owned_by(requester) {
            return Err(LinkError::Forbidden(code.to_string()));
        }
        Ok(link)
    }
}

fn non_negative(what: &str, value: i64) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| LinkError::InvalidArgument(format!("{what} cannot be negative")))
}

fn log_rejection(action: &str, result: Result<Link>) -> Option<Link> {
    result
        .map_err(|e| debug!("Rejected {}: {}", action, e))
        .ok()
}
