use async_trait::async_trait;
use paging::{Page, PageRequest};
use uuid::Uuid;

use crate::contract::error::CatalogError;
use crate::contract::model::{
    NewProduct, NewReview, Product, ProductDetails, ProductSummary, ReviewSheet,
};

/// Catalog operations as consumed by other crates (notably the client-side
/// page cache). A client holds one instance per product line; implementations
/// are line-scoped, so book clients never see clothing.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Newest-first page over the whole line, reviews excluded.
    async fn list(&self, page: PageRequest) -> Result<Page<ProductSummary>, CatalogError>;

    /// Free-text search over name and the line's secondary field. Empty
    /// queries are rejected with a validation error.
    async fn search(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Page<ProductSummary>, CatalogError>;

    /// Exact-category page. Unknown or missing categories are rejected.
    async fn filter(
        &self,
        category: &str,
        page: PageRequest,
    ) -> Result<Page<ProductSummary>, CatalogError>;

    /// Full record with reviewer projections resolved.
    async fn get(&self, id: Uuid) -> Result<ProductDetails, CatalogError>;

    /// Validate, upload images, persist. Returns the created record.
    async fn create(&self, new_product: NewProduct) -> Result<Product, CatalogError>;

    /// Remove the product and its embedded reviews; image release is
    /// best-effort after the delete commits.
    async fn delete(&self, id: Uuid) -> Result<(), CatalogError>;

    /// Append a review and recompute the average; returns the updated record.
    async fn add_review(&self, id: Uuid, review: NewReview) -> Result<Product, CatalogError>;

    /// Review list plus average, reviewer projections resolved.
    async fn reviews(&self, id: Uuid) -> Result<ReviewSheet, CatalogError>;
}
