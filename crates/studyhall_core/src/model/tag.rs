//! Tag domain model.
//!
//! # Invariants
//! - `title` is unique and case-sensitive; two tags never share a title.
//! - Tags are created on first reference and never deleted by this core.

use serde::{Deserialize, Serialize};

/// Shared interest label referenced by accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Storage row id, assigned on first persistence.
    pub id: i64,
    /// Unique, case-sensitive label text.
    pub title: String,
}
