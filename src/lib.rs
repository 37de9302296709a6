//! Linkkeeper - A short link server
//!
//! Stores short links that expire after a TTL or a click budget, persists
//! them to a JSON file and reaps expired links in the background.

pub mod api;
pub mod config;
pub mod error;
pub mod links;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use links::{LinkService, LinkStore};
pub use tasks::spawn_reaper;
