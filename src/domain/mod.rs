//! Domain layer for the book explorer core.
//!
//! This module contains the canonical book types and the error taxonomy,
//! independent of HTTP, JSON wire shapes, or the favorites file format.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`book`]: Book summaries, details, author credits and key helpers
//!
//! # Examples
//!
//! ```
//! use bookexplorer::domain::{normalize_work_key, Result};
//!
//! fn detail_key(route_param: &str) -> Result<String> {
//!     Ok(normalize_work_key(route_param))
//! }
//! assert_eq!(detail_key("OL1W").unwrap(), "/works/OL1W");
//! ```

pub mod book;
pub mod error;

pub use book::{
    bare_work_key, cover_url, normalize_author_key, normalize_work_key, AuthorCredit, BookDetail,
    BookSummary, CoverSize, ResolvedAuthor, AUTHOR_KEY_PREFIX, AUTHOR_ROLE,
    DEFAULT_COVERS_BASE_URL, UNKNOWN_AUTHOR, UNTITLED, WORK_KEY_PREFIX,
};
pub use error::{BookExplorerError, ErrorKind, Result, GENERIC_ERROR_MESSAGE};
