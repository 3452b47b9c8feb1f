//! In-memory storage backend.
//!
//! This module provides an in-memory implementation of
//! [`ChecklistStore`](checklist_core::storage::ChecklistStore) that keeps the
//! three tables in arenas behind a single `Arc<RwLock<_>>`. This is useful for
//! tests, seed dry-runs and any caller that does not need persistence.
//!
//! # Example
//!
//! ```rust,ignore
//! use checklist::storage::inmemory::InMemoryStore;
//!
//! let store = InMemoryStore::new();
//! store.add_question(NewQuestion::new("How do you protect your data at rest", "High")).await?;
//! ```

mod repository;

pub use repository::InMemoryStore;
