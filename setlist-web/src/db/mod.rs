//! Database access layer for setlist-web
//!
//! Every query here is scoped by the owning user's guid, so cross-account
//! access is impossible by construction.

pub mod sessions;
pub mod songs;
pub mod users;
