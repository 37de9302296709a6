//! Snapshot Persistence
//!
//! The whole store is mirrored into one JSON document holding two
//! collections, `links` and `users`. Every write replaces the file through a
//! temporary sibling and a rename, so a reader sees either the old or the new
//! document in full.

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::Result;
use crate::links::{Link, Owner};

// == Snapshot Document ==
/// On-disk layout of the data file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub users: Vec<Owner>,
}

impl Snapshot {
    /// Captures both maps, sorted by code and owner id so rewrites diff cleanly.
    pub fn capture(links: &HashMap<String, Link>, owners: &HashMap<String, Owner>) -> Self {
        let mut links: Vec<Link> = links.values().cloned().collect();
        links.sort_by(|a, b| a.code.cmp(&b.code));

        let mut users: Vec<Owner> = owners.values().cloned().collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));

        Self { links, users }
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.users.is_empty()
    }
}

// == Read ==
/// Reads the snapshot at `path`.
///
/// A missing file and a blank file both read as an empty snapshot. A file that
/// does not parse is a [`crate::error::LinkError::Persistence`] error.
pub async fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("Data file {} not found, starting empty", path.display());
            return Ok(Snapshot::default());
        }
        Err(e) => return Err(e.into()),
    };

    if raw.trim().is_empty() {
        info!("Data file {} is empty", path.display());
        return Ok(Snapshot::default());
    }

    Ok(serde_json::from_str(&raw)?)
}

// == Write ==
/// Atomically replaces the file at `path` with `snapshot`.
pub async fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_vec_pretty(snapshot)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let tmp_path = temp_path_for(path);
    let mut tmp = fs::File::create(&tmp_path).await?;
    tmp.write_all(&json).await?;
    tmp.sync_all().await?;
    drop(tmp);

    if let Err(e) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(e.into());
    }
    Ok(())
}

/// `dir/data.json` -> `dir/.data.json.tmp`
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_else(|| OsStr::new("snapshot")));
    name.push(".tmp");
    path.with_file_name(name)
}
