//! Database access shared across the workspace
//!
//! Schema creation is idempotent; every service opens the database through
//! [`init::init_database`] and can assume all tables exist.

pub mod init;
pub mod settings;

pub use init::{init_database, init_memory_database};
pub use settings::{ensure_setting, get_setting_i64};
