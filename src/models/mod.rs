//! Request and Response models for the link server API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CreateLinkRequest, EditRequest, RegisterOwnerRequest};
pub use responses::{
    DeleteResponse, HealthResponse, LinkResponse, OwnerLinksResponse, OwnerResponse, StatsResponse,
};
