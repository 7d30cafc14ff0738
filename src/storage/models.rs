//! Storage record models for the favorites file.
//!
//! These types describe the persisted representation only. Controllers never
//! see them; they observe plain key sets.

use serde::{Deserialize, Serialize};

/// One persisted favorite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    /// Normalized work key, e.g. `/works/OL45804W`.
    pub key: String,

    /// Unix timestamp of when the work was marked as favorite.
    pub added_at: i64,
}

impl FavoriteRecord {
    /// Creates a record stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookexplorer::storage::FavoriteRecord;
    ///
    /// let record = FavoriteRecord::new("/works/OL1W");
    /// assert_eq!(record.key, "/works/OL1W");
    /// assert!(record.added_at > 0);
    /// ```
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            added_at: chrono::Utc::now().timestamp(),
        }
    }
}
