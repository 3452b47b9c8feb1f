//! Core types and rules for the security review checklist.
//!
//! Following the Functional Core pattern, this crate holds pure data types,
//! validation and the integrity scan. Storage backends live in the
//! `checklist` crate and implement [`storage::ChecklistStore`].

pub mod checklist;
pub mod storage;
