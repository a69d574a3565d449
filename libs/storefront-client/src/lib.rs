//! Client-side page cache over the catalog API.
//!
//! `StorefrontClient` fronts a `CatalogApi` (one per product line) and keeps
//! three mutually exclusive query contexts cached: plain listing pages, the
//! active search result, and the active category-filter result. Mutations
//! keep the cache coherent: create/delete drop everything, add-review
//! patches the affected product in place wherever it is cached.

mod cache;
mod client;

pub use cache::{CachedPage, CachedProduct, PageCache};
pub use client::StorefrontClient;
