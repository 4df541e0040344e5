//! Local album library access.
//!
//! The library is an external collaborator: album records are opaque
//! key/value bags that can be filtered and written back.

mod json;
mod memory;
mod query;
mod types;

pub use json::JsonLibrary;
pub use memory::MemoryLibrary;
pub use query::AlbumQuery;
pub use types::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Library I/O failed: {0}")]
    Io(String),

    #[error("Failed to parse library: {0}")]
    Parse(String),

    #[error("Album not found: {0}")]
    NotFound(i64),

    #[error("Library lock poisoned")]
    Poisoned,
}

/// Trait for album storage backends.
pub trait Library: Send + Sync {
    /// Albums matching the query, in storage order.
    fn albums(&self, query: &AlbumQuery) -> Result<Vec<Album>, LibraryError>;

    /// Persist an album's fields, replacing the stored record with the same id.
    fn store(&self, album: &Album) -> Result<(), LibraryError>;
}
