//! Book domain model and catalog key helpers.
//!
//! This module defines the canonical types every controller works with,
//! independent of the wire shapes the catalog returns. Two listing shapes
//! (subject listing and full-text search) are normalized into one
//! [`BookSummary`]; a single work lookup produces a [`BookDetail`] whose
//! [`AuthorCredit`] entries are later resolved into [`ResolvedAuthor`] names.

use serde::{Deserialize, Serialize};

/// Namespace prefix carried by every work key.
pub const WORK_KEY_PREFIX: &str = "/works/";

/// Namespace prefix carried by every author key.
pub const AUTHOR_KEY_PREFIX: &str = "/authors/";

/// Role tag of credits that name an actual author.
///
/// Credits with any other role (illustrator, editor, ...) are never resolved.
pub const AUTHOR_ROLE: &str = "/type/author_role";

/// Placeholder title for works the catalog returns without one.
pub const UNTITLED: &str = "Untitled";

/// Display text used when a book has no resolvable author names.
pub const UNKNOWN_AUTHOR: &str = "Unknown author";

/// Default root for cover image URLs.
pub const DEFAULT_COVERS_BASE_URL: &str = "https://covers.openlibrary.org/b/id";

/// One entry of a paged listing or search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    /// Catalog work key, e.g. `/works/OL45804W`.
    pub key: String,
    pub title: String,
    /// Author display names in source order. May be empty.
    pub authors: Vec<String>,
    /// Numeric cover identifier, if the catalog has one.
    pub cover_id: Option<i64>,
}

impl BookSummary {
    /// Returns the author names joined for display, or [`UNKNOWN_AUTHOR`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bookexplorer::domain::BookSummary;
    ///
    /// let book = BookSummary {
    ///     key: "/works/OL1W".into(),
    ///     title: "Dune".into(),
    ///     authors: vec!["Frank Herbert".into()],
    ///     cover_id: None,
    /// };
    /// assert_eq!(book.author_line(), "Frank Herbert");
    /// ```
    #[must_use]
    pub fn author_line(&self) -> String {
        if self.authors.is_empty() {
            UNKNOWN_AUTHOR.to_string()
        } else {
            self.authors.join(", ")
        }
    }

    /// Cover URL for this book at the given size, rooted at `covers_base`.
    #[must_use]
    pub fn cover_url(&self, covers_base: &str, size: CoverSize) -> Option<String> {
        cover_url(covers_base, self.cover_id, size)
    }
}

/// A credited contributor of a work, before name resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorCredit {
    /// Author key, e.g. `/authors/OL34184A`.
    pub author_key: String,
    /// Role tag; `None` when the catalog omits it.
    pub role: Option<String>,
}

impl AuthorCredit {
    /// Returns `true` if this credit carries the [`AUTHOR_ROLE`] tag.
    #[must_use]
    pub fn is_author_role(&self) -> bool {
        self.role.as_deref() == Some(AUTHOR_ROLE)
    }
}

/// Full record of a single work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetail {
    pub key: String,
    pub title: String,
    /// Cover identifiers; the first one is canonical.
    pub covers: Vec<i64>,
    pub publish_date: Option<String>,
    pub description: Option<String>,
    /// Credits in source order.
    pub credits: Vec<AuthorCredit>,
}

impl BookDetail {
    /// The canonical cover identifier, if any.
    #[must_use]
    pub fn primary_cover(&self) -> Option<i64> {
        self.covers.first().copied()
    }

    /// Cover URL built from the canonical cover.
    #[must_use]
    pub fn cover_url(&self, covers_base: &str, size: CoverSize) -> Option<String> {
        cover_url(covers_base, self.primary_cover(), size)
    }
}

/// An author name resolved from an [`AuthorCredit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAuthor {
    pub name: String,
}

/// Size class accepted by the cover image service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    Small,
    Medium,
    Large,
}

impl CoverSize {
    /// The single-letter suffix used in cover file names.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Small => "S",
            Self::Medium => "M",
            Self::Large => "L",
        }
    }
}

/// Builds `<covers_base>/<id>-<size>.jpg`.
///
/// Returns `None` for a missing identifier and for non-positive identifiers,
/// which the catalog uses as "no cover".
///
/// # Examples
///
/// ```
/// use bookexplorer::domain::{cover_url, CoverSize};
///
/// let url = cover_url("https://covers.openlibrary.org/b/id", Some(240727), CoverSize::Medium);
/// assert_eq!(url.as_deref(), Some("https://covers.openlibrary.org/b/id/240727-M.jpg"));
/// assert_eq!(cover_url("https://covers.openlibrary.org/b/id", None, CoverSize::Large), None);
/// ```
#[must_use]
pub fn cover_url(covers_base: &str, cover_id: Option<i64>, size: CoverSize) -> Option<String> {
    let id = cover_id.filter(|id| *id > 0)?;
    Some(format!(
        "{}/{id}-{}.jpg",
        covers_base.trim_end_matches('/'),
        size.suffix()
    ))
}

/// Prefixes a bare work key with [`WORK_KEY_PREFIX`].
///
/// Already-prefixed keys are returned unchanged.
///
/// # Examples
///
/// ```
/// use bookexplorer::domain::normalize_work_key;
///
/// assert_eq!(normalize_work_key("OL45804W"), "/works/OL45804W");
/// assert_eq!(normalize_work_key("/works/OL45804W"), "/works/OL45804W");
/// ```
#[must_use]
pub fn normalize_work_key(key: &str) -> String {
    normalize_key(key, WORK_KEY_PREFIX)
}

/// Prefixes a bare author key with [`AUTHOR_KEY_PREFIX`].
#[must_use]
pub fn normalize_author_key(key: &str) -> String {
    normalize_key(key, AUTHOR_KEY_PREFIX)
}

/// Strips [`WORK_KEY_PREFIX`] for use in navigation routes.
#[must_use]
pub fn bare_work_key(key: &str) -> &str {
    key.trim().strip_prefix(WORK_KEY_PREFIX).unwrap_or(key.trim())
}

fn normalize_key(key: &str, prefix: &str) -> String {
    let key = key.trim();
    if key.starts_with(prefix) {
        key.to_string()
    } else {
        format!("{prefix}{}", key.trim_start_matches('/'))
    }
}
