//! Book detail screen.
//!
//! Loads one work record, then resolves its credited authors one at a time,
//! in credit order, publishing after each. Credits whose role is anything
//! other than the author role are skipped without a lookup.
//!
//! The author loop checks `loading` before every credit, so clearing it
//! (through [`DetailController::cancel`] or an author failure) stops further
//! lookups. A second `load_book_detail` supersedes the first through the
//! same generation scheme the listing uses.

use crate::app::observable::Observable;
use crate::catalog::CatalogApi;
use crate::domain::{normalize_work_key, BookDetail, BookExplorerError, ErrorKind, ResolvedAuthor};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Published state of the detail screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailState {
    /// Loaded work. Kept from the previous load until the new one arrives.
    pub book: Option<BookDetail>,

    /// Resolved authors in credit order.
    pub authors: Vec<ResolvedAuthor>,

    pub loading: bool,
    pub error: Option<String>,
    pub error_kind: Option<ErrorKind>,
}

/// Controller behind the detail screen.
pub struct DetailController {
    catalog: Arc<dyn CatalogApi>,
    state: Observable<DetailState>,
    generation: AtomicU64,
}

impl DetailController {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Self {
        Self {
            catalog,
            state: Observable::default(),
            generation: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn state(&self) -> DetailState {
        self.state.get()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    /// Loads `work_key` (bare or `/works/`-prefixed) and resolves its authors.
    ///
    /// On a detail failure the error is published and no author lookups are
    /// made. On an author failure the error is published, `loading` clears,
    /// and the remaining credits are not looked up.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn load_book_detail(&self, work_key: &str) {
        let key = normalize_work_key(work_key);

        let mut generation = 0;
        self.state.modify(|s| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            s.loading = true;
            s.error = None;
            s.error_kind = None;
            s.authors.clear();
        });

        let detail = match self.catalog.get_book_detail(&key).await {
            Ok(detail) => detail,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to load book detail");
                self.publish_if_current(generation, |s| fail(s, &e));
                return;
            }
        };

        let credits = detail.credits.clone();
        if !self.publish_if_current(generation, |s| s.book = Some(detail)) {
            return;
        }

        for credit in &credits {
            let proceed = self.is_current(generation) && self.state.read(|s| s.loading);
            if !proceed {
                tracing::debug!(key = %key, "author resolution stopped");
                break;
            }

            if !credit.is_author_role() {
                tracing::trace!(author = %credit.author_key, role = ?credit.role, "skipping non-author credit");
                continue;
            }

            match self.catalog.get_author(&credit.author_key).await {
                Ok(author) => {
                    self.publish_if_current(generation, |s| s.authors.push(author));
                }
                Err(e) => {
                    tracing::warn!(author = %credit.author_key, error = %e, "failed to resolve author");
                    self.publish_if_current(generation, |s| fail(s, &e));
                }
            }
        }

        self.publish_if_current(generation, |s| s.loading = false);
    }

    /// Stops any in-progress author resolution.
    ///
    /// Returns `true` if a load was in progress.
    pub fn cancel(&self) -> bool {
        self.state.modify_if(|s| std::mem::replace(&mut s.loading, false))
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn publish_if_current(&self, generation: u64, f: impl FnOnce(&mut DetailState)) -> bool {
        self.state.modify_if(|s| {
            if !self.is_current(generation) {
                return false;
            }
            f(s);
            true
        })
    }
}

fn fail(state: &mut DetailState, error: &BookExplorerError) {
    state.error = Some(error.user_message());
    state.error_kind = Some(error.kind());
    state.loading = false;
}

impl std::fmt::Debug for DetailController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailController")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
