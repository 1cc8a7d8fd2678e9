//! HTTP API handlers for setlist-web

pub mod auth;
pub mod health;
pub mod reorder;
pub mod settings;
pub mod songs;

pub use auth::{session_middleware, CurrentUser};
pub use health::health_routes;
