//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Reaper: Removes links whose TTL has elapsed at configured intervals

mod reaper;

pub use reaper::{reap_expired, spawn_reaper, ReaperHandle};
