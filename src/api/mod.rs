//! API Module
//!
//! HTTP handlers and routing for the link server REST API. Owner identity is
//! taken from the `X-Owner-Id` request header.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
