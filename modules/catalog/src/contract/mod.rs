pub mod client;
pub mod error;
pub mod model;

pub use client::CatalogApi;
pub use error::CatalogError;
pub use model::*;
