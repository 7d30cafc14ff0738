//! Paginated, searchable book listing.
//!
//! [`ListingController`] owns the book list shown on the home screen. It
//! coordinates three kinds of fetches against the catalog:
//!
//! - **Fresh loads** (`load_first_page`, `search_books`) replace the list and
//!   reset pagination.
//! - **Load-more** appends the next page of whatever the list currently shows
//!   (fiction listing or search results).
//! - **Debounced search** turns keystrokes into at most one search per
//!   quiescence window.
//!
//! # Generations
//!
//! Every fresh load and every keystroke in the search field bumps a
//! generation counter inside the same state mutation that resets the page
//! or echoes the query. Each request remembers the generation it was issued
//! under and only publishes if it is still current, so a slow response from
//! a superseded query or an earlier listing can never overwrite fresher
//! state.
//!
//! # Load-more guard
//!
//! `load_more_books` is a no-op while `loading`, `loading_more`, or
//! `!page.can_load_more` holds. The check and the `loading_more = true`
//! write happen in one atomic mutation, so two concurrent calls issue at
//! most one request.

use crate::app::debounce::Debouncer;
use crate::app::observable::Observable;
use crate::catalog::CatalogApi;
use crate::domain::{BookExplorerError, BookSummary, ErrorKind, Result};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Default number of books per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default quiescence window before a typed query is searched.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Item offset of a 1-based `page`.
///
/// # Examples
///
/// ```
/// use bookexplorer::app::listing::page_offset;
///
/// assert_eq!(page_offset(1, 20), 0);
/// assert_eq!(page_offset(3, 20), 40);
/// ```
#[must_use]
pub const fn page_offset(page: u32, limit: u32) -> u32 {
    page.saturating_sub(1).saturating_mul(limit)
}

/// Pagination cursor of the list currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    /// Last page appended to the list, 1-based.
    pub current_page: u32,

    /// `false` once a page came back empty; reset by every fresh load.
    pub can_load_more: bool,

    /// Whether the list shows search results (load-more searches too).
    pub search_mode: bool,

    /// Query the current search results belong to. Empty outside search mode.
    pub query: String,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            can_load_more: true,
            search_mode: false,
            query: String::new(),
        }
    }
}

/// Published state of the listing screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingState {
    /// Books in display order. Appended by load-more, replaced by fresh loads.
    pub books: Vec<BookSummary>,

    /// A fresh load (first page or search) is in flight.
    pub loading: bool,

    /// A load-more request is in flight.
    pub loading_more: bool,

    pub error: Option<String>,

    /// Classification of `error`, when it came from a typed failure.
    pub error_kind: Option<ErrorKind>,

    /// Text of the search field, echoed immediately on every keystroke.
    pub search_query: String,

    /// A debounced search is pending or in flight.
    pub is_searching: bool,

    pub page: PageState,
}

/// What a fetch reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PageSource {
    Fiction,
    Search(String),
}

impl PageSource {
    fn query(&self) -> Option<&str> {
        match self {
            Self::Fiction => None,
            Self::Search(query) => Some(query),
        }
    }
}

/// Controller behind the home screen list.
///
/// Cheap to clone; clones share state. Must be used from within a tokio
/// runtime because debounced searches run as spawned tasks.
#[derive(Clone)]
pub struct ListingController {
    inner: Arc<ListingInner>,
}

struct ListingInner {
    catalog: Arc<dyn CatalogApi>,
    state: Observable<ListingState>,
    generation: AtomicU64,
    // Set when the last published failure came from a load-more.
    load_more_failed: AtomicBool,
    debouncer: Debouncer,
    page_size: u32,
}

impl ListingController {
    /// Creates a controller with an empty, idle list.
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogApi>, page_size: u32, search_debounce: Duration) -> Self {
        Self {
            inner: Arc::new(ListingInner {
                catalog,
                state: Observable::default(),
                generation: AtomicU64::new(0),
                load_more_failed: AtomicBool::new(false),
                debouncer: Debouncer::new(search_debounce),
                page_size: page_size.max(1),
            }),
        }
    }

    /// Snapshot of the published state.
    #[must_use]
    pub fn state(&self) -> ListingState {
        self.inner.state.get()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListingState> {
        self.inner.state.subscribe()
    }

    /// Replaces the list with the first page of the fiction listing.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn load_first_page(&self) {
        if let Some(generation) = self.begin_fresh_load(&PageSource::Fiction, None) {
            let result = self
                .inner
                .catalog
                .list_fiction(self.inner.page_size, page_offset(1, self.inner.page_size))
                .await;
            self.finish_fresh_load(generation, &PageSource::Fiction, result);
        }
    }

    /// Replaces the list with the first page of search results for `query`.
    ///
    /// This is what the debouncer runs; calling it directly searches
    /// immediately.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn search_books(&self, query: &str) {
        self.run_search(query, None).await;
    }

    /// Records a keystroke in the search field.
    ///
    /// The query is echoed to state immediately, any pending debounced
    /// search is cancelled and responses to earlier requests are discarded
    /// from then on. A blank query leaves search mode and reloads the
    /// first page right away; anything else schedules a search after the
    /// debounce window.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn on_search_query_change(&self, text: &str) {
        self.inner.debouncer.cancel();

        let blank = text.trim().is_empty();
        self.inner.state.modify(|s| {
            self.inner.generation.fetch_add(1, Ordering::SeqCst);
            s.search_query = text.to_string();
            s.is_searching = !blank;
        });

        if blank {
            self.load_first_page().await;
            return;
        }

        let this = self.clone();
        let query = text.trim().to_string();
        self.inner.debouncer.schedule(async move {
            this.run_search(&query, Some(&query)).await;
        });
    }

    /// Clears the search field and returns to the fiction listing.
    pub async fn clear_search(&self) {
        self.on_search_query_change("").await;
    }

    /// Appends the next page of the current list.
    ///
    /// No-op while a fresh load or another load-more is in flight, or after
    /// a page came back empty.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn load_more_books(&self) {
        let mut request = None;
        self.inner.state.modify_if(|s| {
            if s.loading || s.loading_more || !s.page.can_load_more {
                return false;
            }
            s.loading_more = true;
            let source = if s.page.search_mode {
                PageSource::Search(s.page.query.clone())
            } else {
                PageSource::Fiction
            };
            request = Some((
                self.inner.generation.load(Ordering::SeqCst),
                s.page.current_page + 1,
                source,
            ));
            true
        });

        let Some((generation, next_page, source)) = request else {
            tracing::debug!("load more suppressed");
            return;
        };

        let limit = self.inner.page_size;
        let offset = page_offset(next_page, limit);
        tracing::debug!(next_page, offset, source = ?source, "loading next page");

        let result = self.fetch(&source, limit, offset).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, next_page, "load more failed");
        }

        let applied = self.inner.state.modify_if(|s| {
            if !self.is_current(generation) {
                return false;
            }
            s.loading_more = false;
            let failed = result.is_err();
            match result {
                Ok(books) => {
                    s.error = None;
                    s.error_kind = None;
                    if books.is_empty() {
                        s.page.can_load_more = false;
                    } else {
                        s.page.current_page = next_page;
                        s.books.extend(books);
                    }
                }
                Err(e) => set_error(s, &e),
            }
            self.inner.load_more_failed.store(failed, Ordering::SeqCst);
            true
        });

        if !applied {
            tracing::debug!(generation, next_page, "discarding stale page");
        }
    }

    /// Re-runs whatever failed last.
    ///
    /// A failed load-more is retried as a load-more so appended pages are
    /// kept. Otherwise the last fresh load runs again: the active search, or
    /// the first page.
    pub async fn retry(&self) {
        if self.inner.load_more_failed.load(Ordering::SeqCst) {
            self.load_more_books().await;
            return;
        }

        let page = self.inner.state.read(|s| s.page.clone());
        if page.search_mode && !page.query.is_empty() {
            self.search_books(&page.query).await;
        } else {
            self.load_first_page().await;
        }
    }

    async fn run_search(&self, query: &str, expected_query: Option<&str>) {
        let source = PageSource::Search(query.to_string());
        let Some(generation) = self.begin_fresh_load(&source, expected_query) else {
            tracing::debug!(query = %query, "search superseded before it started");
            return;
        };

        let limit = self.inner.page_size;
        let result = self.fetch(&source, limit, page_offset(1, limit)).await;
        self.finish_fresh_load(generation, &source, result);
    }

    async fn fetch(&self, source: &PageSource, limit: u32, offset: u32) -> Result<Vec<BookSummary>> {
        match source {
            PageSource::Fiction => self.inner.catalog.list_fiction(limit, offset).await,
            PageSource::Search(query) => self.inner.catalog.search(query, limit, offset).await,
        }
    }

    /// Resets pagination for a fresh load and returns its generation.
    ///
    /// With `expected_query`, the load only starts if the search field still
    /// holds that query; a debounced search racing a newer keystroke or a
    /// clear backs off this way.
    fn begin_fresh_load(&self, source: &PageSource, expected_query: Option<&str>) -> Option<u64> {
        let mut generation = None;
        self.inner.state.modify_if(|s| {
            if let Some(expected) = expected_query {
                if s.search_query.trim() != expected {
                    return false;
                }
            }

            generation = Some(self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1);
            self.inner.load_more_failed.store(false, Ordering::SeqCst);
            s.loading = true;
            s.loading_more = false;
            s.error = None;
            s.error_kind = None;
            s.page = PageState {
                search_mode: source.query().is_some(),
                query: source.query().unwrap_or_default().to_string(),
                ..PageState::default()
            };
            if source.query().is_some() {
                s.is_searching = true;
            }
            true
        });
        generation
    }

    fn finish_fresh_load(
        &self,
        generation: u64,
        source: &PageSource,
        result: Result<Vec<BookSummary>>,
    ) {
        match &result {
            Ok(books) => tracing::debug!(count = books.len(), source = ?source, "fresh load complete"),
            Err(e) => tracing::warn!(error = %e, source = ?source, "fresh load failed"),
        }

        let searching = source.query().is_some();
        let applied = self.inner.state.modify_if(|s| {
            if !self.is_current(generation) {
                return false;
            }
            match result {
                Ok(books) => {
                    s.page.can_load_more = !books.is_empty();
                    s.books = books;
                }
                Err(e) => set_error(s, &e),
            }
            s.loading = false;
            if searching {
                s.is_searching = false;
            }
            true
        });

        if !applied {
            tracing::debug!(generation, "discarding stale listing response");
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.inner.generation.load(Ordering::SeqCst) == generation
    }
}

fn set_error(state: &mut ListingState, error: &BookExplorerError) {
    state.error = Some(error.user_message());
    state.error_kind = Some(error.kind());
}

impl std::fmt::Debug for ListingController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingController")
            .field("page_size", &self.inner.page_size)
            .field("debounce", &self.inner.debouncer.delay())
            .field("generation", &self.inner.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_follow_one_based_pages() {
        for limit in [1_u32, 7, 20] {
            assert_eq!(page_offset(1, limit), 0);
            for page in 2..6 {
                assert_eq!(page_offset(page, limit), (page - 1) * limit);
            }
        }
    }

    #[test]
    fn page_zero_clamps_to_first_offset() {
        assert_eq!(page_offset(0, 20), 0);
    }

    #[test]
    fn fresh_page_state_allows_loading_more() {
        let page = PageState::default();
        assert_eq!(page.current_page, 1);
        assert!(page.can_load_more);
        assert!(!page.search_mode);
    }
}
