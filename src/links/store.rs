//! Link Store Module
//!
//! Storage engine holding the code -> link and owner -> codes maps behind a
//! single lock, mirrored to a JSON file after every mutation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

use crate::error::Result;
use crate::links::snapshot::{read_snapshot, write_snapshot, Snapshot};
use crate::links::{Eviction, Link, LinkStats, Owner};

// == Tables ==
/// Both maps plus counters. Only ever touched under [`LinkStore::tables`].
#[derive(Debug, Default)]
struct Tables {
    links: HashMap<String, Link>,
    owners: HashMap<String, Owner>,
    stats: LinkStats,
}

impl Tables {
    /// Rebuilds the maps from a loaded document, repairing owner sets so they
    /// list exactly the codes each owner has in `links`.
    fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut tables = Self::default();
        for link in snapshot.links {
            tables.links.insert(link.code.clone(), link);
        }

        for user in snapshot.users {
            let codes = tables.owned_codes(&user.id, &user.codes);
            tables.owners.insert(user.id.clone(), Owner { id: user.id, codes });
        }

        let orphaned: Vec<String> = tables
            .links
            .values()
            .filter(|l| !tables.owners.contains_key(&l.owner_id))
            .map(|l| l.owner_id.clone())
            .collect();
        for id in orphaned {
            let codes = tables.owned_codes(&id, &[]);
            tables.owners.insert(id.clone(), Owner { id, codes });
        }

        tables.refresh_totals();
        tables
    }

    /// Codes owned by `owner_id`: those in `listed` first (in that order),
    /// then any others by creation time.
    fn owned_codes(&self, owner_id: &str, listed: &[String]) -> Vec<String> {
        let mut codes: Vec<String> = Vec::new();
        for code in listed {
            let owned = self
                .links
                .get(code)
                .is_some_and(|l| l.is_owned_by(owner_id));
            if owned && !codes.contains(code) {
                codes.push(code.clone());
            }
        }

        let mut missing: Vec<&Link> = self
            .links
            .values()
            .filter(|l| l.is_owned_by(owner_id) && !codes.contains(&l.code))
            .collect();
        missing.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.code.cmp(&b.code)));
        codes.extend(missing.into_iter().map(|l| l.code.clone()));
        codes
    }

    fn upsert(&mut self, link: Link) {
        if let Some(previous) = self.links.get(&link.code) {
            if !previous.is_owned_by(&link.owner_id) {
                if let Some(old_owner) = self.owners.get_mut(&previous.owner_id) {
                    old_owner.remove_code(&link.code);
                }
            }
        }

        self.owners
            .entry(link.owner_id.clone())
            .or_insert_with(|| Owner::new(link.owner_id.clone()))
            .add_code(&link.code);
        self.links.insert(link.code.clone(), link);
        self.refresh_totals();
    }

    fn take(&mut self, code: &str) -> Option<Link> {
        let link = self.links.remove(code)?;
        if let Some(owner) = self.owners.get_mut(&link.owner_id) {
            owner.remove_code(code);
        }
        self.refresh_totals();
        Some(link)
    }

    fn refresh_totals(&mut self) {
        self.stats.set_totals(self.links.len(), self.owners.len());
    }
}

// == Click Outcome ==
/// Result of [`LinkStore::increment_clicks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// No link under that code
    Missing,
    /// Budget already spent; nothing was counted
    Exhausted(Link),
    /// Click counted; carries the updated link
    Counted(Link),
}

// == Link Store ==
/// Concurrent link and owner storage with whole-file persistence.
///
/// Reads take the shared lock; every mutation of the paired maps happens under
/// the exclusive lock so no reader sees a link without its owner entry or the
/// reverse. File writes are serialized separately by `save_lock`.
#[derive(Debug)]
pub struct LinkStore {
    tables: RwLock<Tables>,
    /// Data file, None for a purely in-memory store
    path: Option<PathBuf>,
    save_lock: Mutex<()>,
}

impl LinkStore {
    // == Constructors ==
    /// Opens the store backed by the file at `path`.
    ///
    /// A missing or blank file starts an empty store. A malformed file is
    /// logged and also starts an empty store; it is overwritten on the next
    /// mutation.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let tables = match read_snapshot(&path).await {
            Ok(snapshot) => {
                let tables = Tables::from_snapshot(snapshot);
                info!(
                    "Data file loaded (links: {}, owners: {})",
                    tables.links.len(),
                    tables.owners.len()
                );
                tables
            }
            Err(e) => {
                warn!(
                    "Could not load data file {} ({}), starting empty",
                    path.display(),
                    e
                );
                Tables::default()
            }
        };

        Self {
            tables: RwLock::new(tables),
            path: Some(path),
            save_lock: Mutex::new(()),
        }
    }

    /// Creates a store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            path: None,
            save_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // == Links ==
    /// Returns the current state of a link. No side effects.
    pub async fn get(&self, code: &str) -> Option<Link> {
        self.tables.read().await.links.get(code).cloned()
    }

    /// Inserts or replaces a link by code and registers it with its owner.
    pub async fn put(&self, link: Link) {
        self.tables.write().await.upsert(link);
        self.persist().await;
    }

    /// Inserts `link` only if its code is free. Returns false on collision.
    ///
    /// The check and the insert happen under one write lock, so two creators
    /// can never both claim the same code.
    pub async fn put_if_absent(&self, link: Link) -> bool {
        {
            let mut tables = self.tables.write().await;
            if tables.links.contains_key(&link.code) {
                return false;
            }
            tables.upsert(link);
            tables.stats.record_created();
        }
        self.persist().await;
        true
    }

    /// Removes a link and drops it from its owner's set. Absent codes are a
    /// no-op and do not rewrite the file.
    pub async fn remove(&self, code: &str) -> Option<Link> {
        let removed = self.tables.write().await.take(code);
        if removed.is_some() {
            self.persist().await;
        }
        removed
    }

    /// Like [`LinkStore::remove`], also counting the eviction cause.
    pub async fn evict(&self, code: &str, cause: Eviction) -> Option<Link> {
        self.evict_if(code, cause, |_| true).await
    }

    /// Evicts a link only if `should_evict` still holds for the stored copy.
    ///
    /// The check runs under the write lock, so a link renewed by an edit after
    /// the caller's earlier read is left alone.
    pub async fn evict_if<F>(&self, code: &str, cause: Eviction, should_evict: F) -> Option<Link>
    where
        F: FnOnce(&Link) -> bool,
    {
        let removed = {
            let mut tables = self.tables.write().await;
            if !tables.links.get(code).is_some_and(should_evict) {
                return None;
            }
            let removed = tables.take(code);
            if removed.is_some() {
                tables.stats.record_eviction(cause);
            }
            removed
        };
        if removed.is_some() {
            self.persist().await;
        }
        removed
    }

    // == Increment Clicks ==
    /// Adds one click to a stored link and persists the new count.
    ///
    /// The budget is re-checked under the write lock, so concurrent clicks
    /// can never push a link past `max_clicks`.
    pub async fn increment_clicks(&self, code: &str) -> ClickOutcome {
        let updated = {
            let mut tables = self.tables.write().await;
            let Some(link) = tables.links.get_mut(code) else {
                return ClickOutcome::Missing;
            };
            if link.is_depleted() {
                return ClickOutcome::Exhausted(link.clone());
            }
            link.click_count = link.click_count.saturating_add(1);
            let updated = link.clone();
            tables.stats.record_click();
            updated
        };
        self.persist().await;
        ClickOutcome::Counted(updated)
    }

    // == Update ==
    /// Applies `edit` to a stored link in place and persists the result.
    ///
    /// Returns the updated link, or None if the code is absent; an evicted
    /// link is never brought back. `edit` must leave `code` and `owner_id`
    /// untouched.
    pub async fn update<F>(&self, code: &str, edit: F) -> Option<Link>
    where
        F: FnOnce(&mut Link),
    {
        let updated = {
            let mut tables = self.tables.write().await;
            let link = tables.links.get_mut(code)?;
            edit(link);
            link.clone()
        };
        self.persist().await;
        Some(updated)
    }

    /// Point-in-time copy of every link.
    pub async fn all_links(&self) -> Vec<Link> {
        self.tables.read().await.links.values().cloned().collect()
    }

    /// Links of one owner in the order they were added.
    pub async fn links_for_owner(&self, owner_id: &str) -> Vec<Link> {
        let tables = self.tables.read().await;
        tables
            .owners
            .get(owner_id)
            .map(|owner| {
                owner
                    .codes
                    .iter()
                    .filter_map(|code| tables.links.get(code).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    // == Owners ==
    pub async fn get_user(&self, id: &str) -> Option<Owner> {
        self.tables.read().await.owners.get(id).cloned()
    }

    /// Inserts or replaces an owner record.
    ///
    /// The supplied `codes` only decide ordering: the stored set is
    /// reconciled against the link map so it lists exactly the owner's links.
    pub async fn put_user(&self, owner: Owner) {
        {
            let mut tables = self.tables.write().await;
            let codes = tables.owned_codes(&owner.id, &owner.codes);
            tables.owners.insert(owner.id.clone(), Owner { id: owner.id, codes });
            tables.refresh_totals();
        }
        self.persist().await;
    }

    /// First owner id (in sorted order) starting with `prefix`.
    pub async fn find_user_by_prefix(&self, prefix: &str) -> Option<String> {
        if prefix.is_empty() {
            return None;
        }
        self.tables
            .read()
            .await
            .owners
            .keys()
            .filter(|id| id.starts_with(prefix))
            .min()
            .cloned()
    }

    // == Size & Stats ==
    pub async fn len(&self) -> usize {
        self.tables.read().await.links.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tables.read().await.links.is_empty()
    }

    /// Returns current link statistics.
    pub async fn stats(&self) -> LinkStats {
        self.tables.read().await.stats.clone()
    }

    // == Save ==
    /// Writes both maps to the data file as one document.
    ///
    /// The snapshot is captured while holding `save_lock`, so concurrent saves
    /// reach the disk in the order their snapshots were taken.
    pub async fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let _guard = self.save_lock.lock().await;
        let snapshot = {
            let tables = self.tables.read().await;
            Snapshot::capture(&tables.links, &tables.owners)
        };
        write_snapshot(path, &snapshot).await
    }

    /// Saves, logging instead of propagating failures. The in-memory state
    /// stays authoritative when the disk lags.
    async fn persist(&self) {
        if let Err(e) = self.save().await {
            error!("Failed to save data file: {}", e);
        }
    }
}
