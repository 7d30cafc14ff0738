//! Catalog client abstraction.
//!
//! Controllers depend on [`CatalogApi`] rather than on the HTTP client, so
//! they can be driven headlessly against an in-process double.

use crate::domain::{BookDetail, BookSummary, ResolvedAuthor, Result};
use async_trait::async_trait;

/// Typed access to the four catalog endpoints the app consumes.
///
/// Every call is a fresh request; implementations must not cache. Failures
/// are reported as `Network`/`NotFound` for transport and status problems
/// and `Decode` for schema mismatches.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetches one page of the fixed-subject listing.
    ///
    /// `offset` is the zero-based item offset, i.e. `page_index * limit`.
    async fn list_fiction(&self, limit: u32, offset: u32) -> Result<Vec<BookSummary>>;

    /// Runs a full-text search and returns one page of results.
    async fn search(&self, query: &str, limit: u32, offset: u32) -> Result<Vec<BookSummary>>;

    /// Looks up a single work.
    ///
    /// `work_key` must already carry the `/works/` prefix.
    async fn get_book_detail(&self, work_key: &str) -> Result<BookDetail>;

    /// Looks up a single author by key.
    async fn get_author(&self, author_key: &str) -> Result<ResolvedAuthor>;
}
