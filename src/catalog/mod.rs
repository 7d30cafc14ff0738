//! Catalog client layer.
//!
//! Typed request/response mapping to the public book catalog. Stateless: no
//! caching, one request per call.
//!
//! # Modules
//!
//! - [`api`]: The [`CatalogApi`] trait controllers depend on
//! - [`wire`]: JSON wire shapes and their normalization into domain types
//! - [`http`]: `reqwest` implementation of the trait

pub mod api;
pub mod http;
pub mod wire;

pub use api::CatalogApi;
pub use http::HttpCatalogClient;
