//! Favorites screen.
//!
//! Follows the favorites store: every new key snapshot is resolved into a
//! list of [`BookSummary`] values by loading each work and its authors. A
//! snapshot that arrives while an older one is still resolving abandons the
//! older one, so only the latest set is ever published.
//!
//! Failures are per book. A book whose detail cannot be loaded is left out
//! and its error published; the remaining books still resolve. An author
//! lookup failure only drops that author's name.

use crate::app::observable::Observable;
use crate::catalog::CatalogApi;
use crate::domain::{BookDetail, BookExplorerError, BookSummary, ErrorKind, Result};
use crate::storage::FavoritesStore;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Error published when a favorite carries a credit with a non-author role.
pub const UNKNOWN_AUTHOR_TYPE: &str = "Unknown author type";

/// Published state of the favorites screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FavoritesState {
    /// Resolved favorites in key order.
    pub books: Vec<BookSummary>,

    pub loading: bool,

    /// Last failure seen while resolving the current snapshot.
    pub error: Option<String>,
    pub error_kind: Option<ErrorKind>,

    /// Number of snapshots fully resolved and published so far.
    pub resolved: u64,
}

/// Controller behind the favorites screen.
///
/// Dropping the controller stops the subscription task.
pub struct FavoritesController {
    catalog: Arc<dyn CatalogApi>,
    store: Arc<dyn FavoritesStore>,
    state: Arc<Observable<FavoritesState>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl FavoritesController {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogApi>, store: Arc<dyn FavoritesStore>) -> Self {
        Self {
            catalog,
            store,
            state: Arc::new(Observable::default()),
            task: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn state(&self) -> FavoritesState {
        self.state.get()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FavoritesState> {
        self.state.subscribe()
    }

    /// Starts following the favorites store.
    ///
    /// The current snapshot is resolved right away and every later change
    /// restarts resolution. Calling this again replaces the running
    /// subscription. Must be called from within a tokio runtime.
    pub fn load_favorite_books(&self) {
        let catalog = Arc::clone(&self.catalog);
        let state = Arc::clone(&self.state);
        let keys = self.store.subscribe();

        let handle = tokio::spawn(
            follow_favorites(catalog, state, keys).instrument(tracing::debug_span!("favorites")),
        );

        let previous = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Adds or removes `key` from the favorites.
    ///
    /// Returns whether the book is a favorite afterwards. The screen
    /// refreshes through the store subscription.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the change could not be persisted.
    pub async fn toggle_favorite(&self, key: &str) -> Result<bool> {
        self.store.toggle(key).await
    }

    /// Reports whether `key` is a favorite.
    ///
    /// # Errors
    ///
    /// Returns the store's error if membership cannot be read.
    pub async fn is_favorite(&self, key: &str) -> Result<bool> {
        self.store.is_favorite(key).await
    }
}

impl Drop for FavoritesController {
    fn drop(&mut self) {
        let task = self
            .task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.abort();
        }
    }
}

impl std::fmt::Debug for FavoritesController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesController")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

enum Outcome {
    Resolved(Vec<BookSummary>),
    Restart,
    Closed,
}

async fn follow_favorites(
    catalog: Arc<dyn CatalogApi>,
    state: Arc<Observable<FavoritesState>>,
    mut keys: watch::Receiver<BTreeSet<String>>,
) {
    loop {
        let snapshot = keys.borrow_and_update().clone();
        tracing::debug!(count = snapshot.len(), "resolving favorites snapshot");

        if snapshot.is_empty() {
            state.modify(|s| {
                *s = FavoritesState {
                    resolved: s.resolved + 1,
                    ..FavoritesState::default()
                };
            });
        } else {
            state.modify(|s| {
                s.loading = true;
                s.error = None;
                s.error_kind = None;
            });

            let outcome = tokio::select! {
                books = resolve_snapshot(catalog.as_ref(), &state, &snapshot) => Outcome::Resolved(books),
                changed = keys.changed() => match changed {
                    Ok(()) => Outcome::Restart,
                    Err(_) => Outcome::Closed,
                },
            };

            match outcome {
                Outcome::Resolved(books) => state.modify(|s| {
                    s.books = books;
                    s.loading = false;
                    s.resolved += 1;
                }),
                Outcome::Restart => {
                    tracing::debug!("favorites changed mid-resolution, restarting");
                    continue;
                }
                Outcome::Closed => {
                    state.modify(|s| s.loading = false);
                    break;
                }
            }
        }

        if keys.changed().await.is_err() {
            break;
        }
    }
    tracing::debug!("favorites store closed");
}

async fn resolve_snapshot(
    catalog: &dyn CatalogApi,
    state: &Observable<FavoritesState>,
    keys: &BTreeSet<String>,
) -> Vec<BookSummary> {
    let mut books = Vec::with_capacity(keys.len());
    for key in keys {
        match catalog.get_book_detail(key).await {
            Ok(detail) => books.push(summarize(catalog, state, detail).await),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to load favorite");
                state.modify(|s| record_failure(s, Some(&e)));
            }
        }
    }
    books
}

/// Folds a work record and its resolved author names into a list row.
async fn summarize(
    catalog: &dyn CatalogApi,
    state: &Observable<FavoritesState>,
    detail: BookDetail,
) -> BookSummary {
    let mut authors = Vec::new();
    for credit in &detail.credits {
        if !credit.is_author_role() {
            tracing::debug!(key = %detail.key, role = ?credit.role, "unexpected credit role");
            state.modify(|s| record_failure(s, None));
            continue;
        }

        match catalog.get_author(&credit.author_key).await {
            Ok(author) => authors.push(author.name),
            Err(e) => tracing::debug!(author = %credit.author_key, error = %e, "dropping unresolved author"),
        }
    }

    BookSummary {
        cover_id: Some(detail.primary_cover().unwrap_or(0)),
        key: detail.key,
        title: detail.title,
        authors,
    }
}

/// `None` records the unknown credit role.
fn record_failure(state: &mut FavoritesState, error: Option<&BookExplorerError>) {
    match error {
        Some(e) => {
            state.error = Some(e.user_message());
            state.error_kind = Some(e.kind());
        }
        None => {
            state.error = Some(UNKNOWN_AUTHOR_TYPE.to_string());
            state.error_kind = None;
        }
    }
    state.loading = false;
}
