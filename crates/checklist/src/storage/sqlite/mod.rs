//! SQLite storage backend implementation.
//!
//! Implements [`checklist_core::storage::ChecklistStore`] using `rusqlite`
//! for synchronous operations and `tokio-rusqlite` for async wrapping.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::{SqliteStore, IN_MEMORY_PATH};
