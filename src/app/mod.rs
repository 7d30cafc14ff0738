//! Screen controllers.
//!
//! Each controller owns the observable state of one screen and the async
//! operations that change it. Renderers subscribe to that state and call
//! controller operations in response to user input; controllers never
//! render anything themselves.
//!
//! ```text
//!  user input ──▶ controller op ──▶ CatalogApi / FavoritesStore
//!                      │
//!                      ▼
//!               Observable<State> ──▶ watch::Receiver ──▶ renderer
//! ```
//!
//! # Modules
//!
//! - [`listing`]: paginated fiction listing with debounced search
//! - [`detail`]: single work with sequential author resolution
//! - [`favorites`]: favorites resolved live from the store
//! - [`observable`]: `watch`-backed state container shared by the controllers
//! - [`debounce`]: single-slot cancellable delay

pub mod debounce;
pub mod detail;
pub mod favorites;
pub mod listing;
pub mod observable;

pub use debounce::Debouncer;
pub use detail::{DetailController, DetailState};
pub use favorites::{FavoritesController, FavoritesState, UNKNOWN_AUTHOR_TYPE};
pub use listing::{ListingController, ListingState, PageState};
pub use observable::Observable;
