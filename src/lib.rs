//! Bookexplorer: the headless core of a book-catalog browser.
//!
//! Bookexplorer talks to a public book catalog (Open Library) and exposes
//! three screen controllers whose state a renderer can observe:
//! - A paginated fiction listing with debounced free-text search
//! - A book detail view that resolves credited authors in order
//! - A favorites view kept live against a persisted favorites set

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI driver (main.rs) / any renderer                │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │  subscribe() / operations
//! ┌─────────────────────────────────────────────────────┐
//! │  Controllers (app/)                                 │  ← State machines
//! │  - Listing: pages, search debounce, generations     │
//! │  - Detail: sequential author resolution             │
//! │  - Favorites: live snapshot resolution              │
//! └─────────────────────────────────────────────────────┘
//!         │                                    │
//! ┌───────────────────────┐         ┌───────────────────────┐
//! │ Catalog (catalog/)    │         │ Storage (storage/)    │
//! │ - CatalogApi trait    │         │ - FavoritesStore      │
//! │ - reqwest client      │         │ - Atomic JSON file    │
//! │ - Wire normalization  │         │ - watch snapshots     │
//! └───────────────────────┘         └───────────────────────┘
//!         │                                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain & Infrastructure                            │
//! │  - Book types, key helpers (domain/book)            │
//! │  - Error types (domain/error)                       │
//! │  - Data directory resolution (infrastructure/)      │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional export
//! │  - stderr logging, JSON-lines span file             │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Screen controllers and their observable state
//! - [`catalog`]: Catalog client trait, HTTP implementation, wire shapes
//! - [`domain`]: Core domain types (books, errors)
//! - [`infrastructure`]: Platform paths
//! - [`storage`]: Persisted favorites
//! - [`observability`]: Tracing subscriber setup
//!
//! # Configuration
//!
//! Configuration is read from TOML, every key optional:
//!
//! ```toml
//! api_base_url = "https://openlibrary.org"
//! subject = "fiction"
//! page_size = 20
//! search_debounce_ms = 500
//! request_timeout_secs = 30
//! favorites_path = "~/.local/share/bookexplorer/favorites.json"
//! trace_level = "debug"
//! trace_file = "~/.local/share/bookexplorer/trace.jsonl"
//! ```
//!
//! # Example
//!
//! ```no_run
//! use bookexplorer::{initialize, Config};
//!
//! # async fn run() -> bookexplorer::Result<()> {
//! let explorer = initialize(&Config::default())?;
//! let listing = explorer.listing();
//!
//! listing.load_first_page().await;
//! listing.load_more_books().await;
//! for book in &listing.state().books {
//!     println!("{} by {}", book.title, book.author_line());
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod catalog;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod storage;

pub use app::{
    DetailController, DetailState, FavoritesController, FavoritesState, ListingController,
    ListingState, PageState,
};
pub use catalog::{CatalogApi, HttpCatalogClient};
pub use domain::{BookDetail, BookExplorerError, BookSummary, ErrorKind, Result};
pub use storage::{FavoritesStore, JsonFavoritesStore};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Runtime configuration.
///
/// Every field has a default, so an empty TOML document or an empty override
/// map yields [`Config::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the catalog API. Default: `https://openlibrary.org`
    pub api_base_url: String,

    /// Root of the cover image service. Default: `https://covers.openlibrary.org/b/id`
    pub covers_base_url: String,

    /// Subject the home listing is drawn from. Default: `fiction`
    pub subject: String,

    /// Books per page for listing and search. Default: 20
    pub page_size: u32,

    /// Quiet period after the last keystroke before searching. Default: 500
    pub search_debounce_ms: u64,

    /// Connect and read timeout for each catalog request. Default: 30
    pub request_timeout_secs: u64,

    pub user_agent: String,

    /// Favorites file. `~` is expanded. Default: `<data dir>/favorites.json`
    pub favorites_path: Option<String>,

    /// Tracing filter directive, e.g. `debug` or `bookexplorer=trace`.
    ///
    /// `RUST_LOG` takes precedence. Default: `"info"`
    pub trace_level: Option<String>,

    /// When set, finished spans are exported to this file as JSON lines.
    pub trace_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://openlibrary.org".to_string(),
            covers_base_url: domain::DEFAULT_COVERS_BASE_URL.to_string(),
            subject: "fiction".to_string(),
            page_size: app::listing::DEFAULT_PAGE_SIZE,
            search_debounce_ms: 500,
            request_timeout_secs: 30,
            user_agent: concat!("bookexplorer/", env!("CARGO_PKG_VERSION")).to_string(),
            favorites_path: None,
            trace_level: None,
            trace_file: None,
        }
    }
}

impl Config {
    /// Parses configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`BookExplorerError::Config`] if the document is not valid
    /// TOML or a value has the wrong type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bookexplorer::Config;
    ///
    /// let config = Config::from_toml_str("page_size = 10\nsubject = \"science_fiction\"")?;
    /// assert_eq!(config.page_size, 10);
    /// assert_eq!(config.subject, "science_fiction");
    /// assert_eq!(config.search_debounce_ms, 500);
    /// # Ok::<(), bookexplorer::BookExplorerError>(())
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| BookExplorerError::Config(format!("invalid config: {e}")))
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`BookExplorerError::Io`] if the file cannot be read and
    /// [`BookExplorerError::Config`] if it does not parse.
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = ?path, "loading config file");
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Builds configuration from a flat key/value map.
    ///
    /// Unknown keys are ignored and unparsable numbers fall back to their
    /// defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use bookexplorer::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size".to_string(), "5".to_string());
    /// map.insert("search_debounce_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.page_size, 5);
    /// assert_eq!(config.search_debounce_ms, 500);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let mut config = Self::default();
        config.apply_overrides(map);
        config
    }

    /// Layers `map` onto this configuration.
    ///
    /// Only keys present in the map change; a value that fails to parse
    /// leaves the field untouched.
    pub fn apply_overrides(&mut self, map: &BTreeMap<String, String>) {
        for (key, value) in map {
            match key.as_str() {
                "api_base_url" => self.api_base_url.clone_from(value),
                "covers_base_url" => self.covers_base_url.clone_from(value),
                "subject" => self.subject.clone_from(value),
                "user_agent" => self.user_agent.clone_from(value),
                "page_size" => set_parsed(&mut self.page_size, key, value),
                "search_debounce_ms" => set_parsed(&mut self.search_debounce_ms, key, value),
                "request_timeout_secs" => set_parsed(&mut self.request_timeout_secs, key, value),
                "favorites_path" => self.favorites_path = non_empty(value),
                "trace_level" => self.trace_level = non_empty(value),
                "trace_file" => self.trace_file = non_empty(value),
                _ => tracing::debug!(key = %key, "ignoring unknown config key"),
            }
        }
    }

    /// The debounce window as a [`Duration`].
    #[must_use]
    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Resolved location of the favorites file.
    #[must_use]
    pub fn favorites_file(&self) -> PathBuf {
        self.favorites_path
            .as_deref()
            .map_or_else(infrastructure::default_favorites_path, infrastructure::expand_tilde)
    }
}

fn set_parsed<T: std::str::FromStr>(field: &mut T, key: &str, value: &str) {
    match value.trim().parse() {
        Ok(parsed) => *field = parsed,
        Err(_) => tracing::debug!(key = %key, value = %value, "unparsable config value, keeping current"),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Composition root: one catalog client and one favorites store, shared by
/// every controller it hands out.
#[derive(Clone)]
pub struct BookExplorer {
    config: Config,
    catalog: Arc<dyn CatalogApi>,
    favorites: Arc<dyn FavoritesStore>,
}

impl BookExplorer {
    /// Assembles an explorer from existing parts.
    #[must_use]
    pub fn from_parts(
        config: Config,
        catalog: Arc<dyn CatalogApi>,
        favorites: Arc<dyn FavoritesStore>,
    ) -> Self {
        Self {
            config,
            catalog,
            favorites,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<dyn CatalogApi> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn favorites_store(&self) -> Arc<dyn FavoritesStore> {
        Arc::clone(&self.favorites)
    }

    /// New listing controller using the configured page size and debounce.
    #[must_use]
    pub fn listing(&self) -> ListingController {
        ListingController::new(self.catalog(), self.config.page_size, self.config.search_debounce())
    }

    #[must_use]
    pub fn detail(&self) -> DetailController {
        DetailController::new(self.catalog())
    }

    #[must_use]
    pub fn favorites(&self) -> FavoritesController {
        FavoritesController::new(self.catalog(), self.favorites_store())
    }

    /// Cover URL for `cover_id` against the configured cover service.
    #[must_use]
    pub fn cover_url(&self, cover_id: Option<i64>, size: domain::CoverSize) -> Option<String> {
        domain::cover_url(&self.config.covers_base_url, cover_id, size)
    }
}

impl std::fmt::Debug for BookExplorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookExplorer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builds the HTTP catalog client and opens the favorites store.
///
/// Does not install tracing; call [`observability::init_tracing`] first if
/// logs are wanted.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the favorites
/// file exists but cannot be read or parsed.
///
/// # Example
///
/// ```no_run
/// use bookexplorer::{initialize, Config};
///
/// let config = Config {
///     favorites_path: Some("/tmp/bookexplorer/favorites.json".to_string()),
///     ..Default::default()
/// };
/// let explorer = initialize(&config)?;
/// let detail = explorer.detail();
/// # Ok::<(), bookexplorer::BookExplorerError>(())
/// ```
pub fn initialize(config: &Config) -> Result<BookExplorer> {
    tracing::debug!(api = %config.api_base_url, subject = %config.subject, "initializing bookexplorer");

    let catalog = HttpCatalogClient::new(config)?;
    let favorites = JsonFavoritesStore::open(config.favorites_file())?;

    Ok(BookExplorer::from_parts(
        config.clone(),
        Arc::new(catalog),
        Arc::new(favorites),
    ))
}
