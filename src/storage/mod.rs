//! Storage layer for the persisted favorites set.
//!
//! # Modules
//!
//! - `backend`: [`FavoritesStore`] trait abstraction
//! - `json`: JSON file implementation with atomic writes
//! - `models`: Persisted record types, separate from domain models

pub mod backend;
pub mod json;
pub mod models;

pub use backend::FavoritesStore;
pub use json::JsonFavoritesStore;
pub use models::FavoriteRecord;
