//! Storage backend implementations.
//!
//! Concrete implementations of [`checklist_core::storage::ChecklistStore`].
//! The in-memory store is always available. The SQLite store is compiled in
//! with the `sqlite` feature (on by default).
//!
//! # Examples
//!
//! Build without SQLite:
//! ```bash
//! cargo build -p checklist --no-default-features
//! ```

pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use inmemory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use std::sync::Arc;

use checklist_core::storage::{ChecklistStore, Result};

use crate::config::{Backend, StoreConfig};

/// Opens the backend selected by `config`.
pub async fn open(config: &StoreConfig) -> Result<Arc<dyn ChecklistStore>> {
    match config.backend {
        Backend::Memory => {
            tracing::info!("Using in-memory store");
            Ok(Arc::new(InMemoryStore::new()))
        }
        #[cfg(feature = "sqlite")]
        Backend::Sqlite => {
            tracing::info!(path = %config.db_path, "Using SQLite store");
            Ok(Arc::new(SqliteStore::open(config).await?))
        }
        #[cfg(not(feature = "sqlite"))]
        Backend::Sqlite => Err(checklist_core::storage::StoreError::ConnectionFailed(
            "SQLite support was not compiled in (enable the `sqlite` feature)".to_string(),
        )),
    }
}
