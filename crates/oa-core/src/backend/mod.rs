//! Backend API client and wire types
//!
//! The backend owns every conversation; this side only sends chat turns and
//! reads listings.

mod client;
mod types;

pub use client::{BackendClient, ChatBackend, DEFAULT_TIMEOUT_SECS};
pub use types::*;
