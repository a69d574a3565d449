//! Catalog module: products, embedded reviews with a denormalized average
//! rating, and the paginated list/search/filter query paths.
//!
//! Layering follows the usual split: `contract` holds pure models and the
//! `CatalogApi` trait other crates consume, `domain` the service with
//! validation, rating aggregation, and ports, `infra` the SeaORM storage
//! (one table per product line) and media storage, and `api::rest` the axum
//! handlers speaking the JSON envelope wire format.

pub mod api;
pub mod config;
pub mod contract;
pub mod domain;
pub mod gateways;
pub mod infra;

pub use config::CatalogConfig;
pub use contract::client::CatalogApi;
pub use domain::service::CatalogService;
pub use infra::storage::migrations::Migrator;
