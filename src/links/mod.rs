//! Links Module
//!
//! Short link records, their storage engine and the lifecycle service that
//! applies TTL and click-budget rules on top of it.

mod code;
mod link;
mod owner;
mod service;
pub mod snapshot;
mod stats;
mod store;
mod url_validator;


// Re-export public types
pub use code::generate_code;
pub use link::{current_timestamp_ms, Link};
pub use owner::Owner;
pub use service::{LinkService, OpenOutcome};
pub use stats::{Eviction, LinkStats};
pub use store::{ClickOutcome, LinkStore};
pub use url_validator::validate_url;

// == Public Constants ==
/// Symbols used in generated codes: digits, lowercase, uppercase
pub const CODE_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Attempts at finding a free code before giving up
pub const MAX_CODE_ATTEMPTS: usize = 50;
