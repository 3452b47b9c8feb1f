//! Security review checklist store.
//!
//! Backends for [`checklist_core::storage::ChecklistStore`], the store
//! configuration, and the seed loader used by the `checklist` binary.

pub mod config;
pub mod logging;
pub mod seed;
pub mod storage;
