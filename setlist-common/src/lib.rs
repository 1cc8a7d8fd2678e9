//! # Setlist Common Library
//!
//! Shared code for the Setlist workspace including:
//! - Data model (songs, sequence items, structural element vocabulary)
//! - Database initialization and settings
//! - Configuration loading
//! - Error types

pub mod config;
pub mod db;
pub mod elements;
pub mod error;
pub mod model;

pub use elements::{Element, ElementKind};
pub use error::{Error, Result};
pub use model::{SequenceItem, Song, SongOrder};
