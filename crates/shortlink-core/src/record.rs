use crate::alias::Alias;
use serde::{Deserialize, Serialize};

/// A stored alias → target mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// Store-assigned identifier. Never reused.
    pub id: i64,
    /// The unique alias.
    pub alias: Alias,
    /// The destination URL.
    pub target: String,
}
