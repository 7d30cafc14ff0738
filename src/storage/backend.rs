//! Favorites store abstraction.
//!
//! The favorites set is the only state that outlives a screen and the only
//! resource mutated from more than one controller. [`FavoritesStore`] hides
//! how it is persisted and exposes it as a reactive snapshot plus a toggle.

use crate::domain::error::Result;
use async_trait::async_trait;
use std::collections::BTreeSet;
use tokio::sync::watch;

/// Persistent, observable set of favorite work keys.
///
/// # Implementations
///
/// - [`JsonFavoritesStore`](crate::storage::JsonFavoritesStore): JSON file with atomic writes
///
/// # Examples
///
/// ```
/// use bookexplorer::storage::{FavoritesStore, JsonFavoritesStore};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = JsonFavoritesStore::ephemeral();
/// assert!(store.toggle("OL1W").await?);
/// assert!(store.is_favorite("/works/OL1W").await?);
/// # Ok::<(), bookexplorer::BookExplorerError>(())
/// # }).unwrap();
/// ```
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Returns a receiver that yields the full key set on every change.
    ///
    /// The current set is available immediately through `borrow()`.
    fn subscribe(&self) -> watch::Receiver<BTreeSet<String>>;

    /// Returns the current key set.
    fn snapshot(&self) -> BTreeSet<String>;

    /// Flips membership of `key` and returns the new membership.
    ///
    /// The whole read-modify-write-persist cycle is exclusive: concurrent
    /// toggles are applied one after another and none is lost.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted. The set is left
    /// unchanged in that case.
    async fn toggle(&self, key: &str) -> Result<bool>;

    /// Returns `true` if `key` is currently a favorite.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    async fn is_favorite(&self, key: &str) -> Result<bool>;
}
