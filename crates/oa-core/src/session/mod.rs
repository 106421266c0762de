//! Session management module
//!
//! Tracks which backend conversation each chat user is currently talking in.
//! Message history itself lives in the backend.

mod store;
mod types;

pub use store::SessionStore;
pub use types::{Session, UserId};
