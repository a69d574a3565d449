use async_trait::async_trait;
use paging::{Page, PageRequest};
use uuid::Uuid;

use crate::contract::model::{Product, ProductLine, ProductSummary, Review};
use crate::domain::query::ProductSelector;

/// Persistence port for the domain layer. Every method is line-scoped; the
/// two product lines live in separate tables and never mix.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a fully-formed product. The service computes ids, timestamps,
    /// and validation; the repo persists.
    async fn insert(&self, product: Product) -> anyhow::Result<()>;

    /// Load a product by id, reviews included.
    async fn find_by_id(&self, line: ProductLine, id: Uuid) -> anyhow::Result<Option<Product>>;

    /// Delete by id, returning the removed record (the caller releases its
    /// images). None if the id was unknown. Embedded reviews go with the row.
    async fn delete(&self, line: ProductLine, id: Uuid) -> anyhow::Result<Option<Product>>;

    /// One page of summaries matching the selector, newest first, plus the
    /// total match count.
    async fn page(
        &self,
        line: ProductLine,
        selector: &ProductSelector,
        page: PageRequest,
    ) -> anyhow::Result<Page<ProductSummary>>;

    /// Atomically append a review and store the recomputed average. Must be
    /// safe against concurrent appends to the same product: both reviews
    /// land and the final average reflects both. None if the id was unknown.
    async fn append_review(
        &self,
        line: ProductLine,
        id: Uuid,
        review: Review,
    ) -> anyhow::Result<Option<Product>>;
}
