use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use catalog::contract::client::CatalogApi;
use catalog::contract::error::CatalogError;
use catalog::contract::model::{NewProduct, NewReview, Product, ProductDetails};
use paging::PageRequest;

use crate::cache::{to_cached_page, CachedPage, PageCache};

pub const DEFAULT_PAGE_LIMIT: u32 = 12;

/// Caching client for one product line.
///
/// Reads consult the cache first; mutations go straight to the API and then
/// either invalidate (create/delete) or patch (add-review) the cache. A
/// superseded search response is discarded instead of overwriting the
/// context that belongs to the newest query.
pub struct StorefrontClient {
    api: Arc<dyn CatalogApi>,
    cache: Mutex<PageCache>,
    limit: u32,
    search_seq: AtomicU64,
}

impl StorefrontClient {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self::with_limit(api, DEFAULT_PAGE_LIMIT)
    }

    pub fn with_limit(api: Arc<dyn CatalogApi>, limit: u32) -> Self {
        Self {
            api,
            cache: Mutex::new(PageCache::new()),
            limit: limit.max(1),
            search_seq: AtomicU64::new(0),
        }
    }

    /// One unfiltered listing page, served from cache when present.
    pub async fn browse(&self, page_number: u32) -> Result<CachedPage, CatalogError> {
        {
            let cache = self.cache.lock();
            if let Some(hit) = cache.listing(page_number) {
                debug!(page = page_number, "listing served from cache");
                return Ok(hit.clone());
            }
        }

        let page = self
            .api
            .list(PageRequest::new(page_number, self.limit))
            .await?;
        let entry = to_cached_page(page);
        self.cache.lock().store_listing(entry.clone());
        Ok(entry)
    }

    /// Search result page. Returns `Ok(None)` when the response came back
    /// for a query the user has already replaced; the stale payload is
    /// dropped without touching the cache.
    pub async fn search(
        &self,
        query: &str,
        page_number: u32,
    ) -> Result<Option<CachedPage>, CatalogError> {
        let query = query.trim().to_string();
        {
            let cache = self.cache.lock();
            if let Some(hit) = cache.search_result(&query, page_number) {
                return Ok(Some(hit.clone()));
            }
        }

        let seq = self.search_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self
            .api
            .search(&query, PageRequest::new(page_number, self.limit))
            .await;

        if self.search_seq.load(Ordering::SeqCst) != seq {
            debug!(query = %query, "discarding superseded search response");
            return Ok(None);
        }

        let entry = to_cached_page(result?);
        self.cache.lock().store_search(query, entry.clone());
        Ok(Some(entry))
    }

    /// Category filter page, cached per (category, page).
    pub async fn filter(
        &self,
        category: &str,
        page_number: u32,
    ) -> Result<CachedPage, CatalogError> {
        {
            let cache = self.cache.lock();
            if let Some(hit) = cache.filter_result(category, page_number) {
                return Ok(hit.clone());
            }
        }

        let page = self
            .api
            .filter(category, PageRequest::new(page_number, self.limit))
            .await?;
        let entry = to_cached_page(page);
        self.cache
            .lock()
            .store_filter(category.to_string(), entry.clone());
        Ok(entry)
    }

    /// Fetch and remember the currently viewed product.
    pub async fn view(&self, id: Uuid) -> Result<ProductDetails, CatalogError> {
        let details = self.api.get(id).await?;
        self.cache.lock().store_current(details.clone());
        Ok(details)
    }

    /// The currently viewed product, if any.
    pub fn current(&self) -> Option<ProductDetails> {
        self.cache.lock().current().cloned()
    }

    /// Create a product; every cached context is dropped because counts and
    /// page boundaries shift.
    pub async fn create(&self, new_product: NewProduct) -> Result<Product, CatalogError> {
        let product = self.api.create(new_product).await?;
        self.cache.lock().invalidate_all();
        Ok(product)
    }

    /// Delete a product; same wholesale invalidation as create.
    pub async fn delete(&self, id: Uuid) -> Result<(), CatalogError> {
        self.api.delete(id).await?;
        self.cache.lock().invalidate_all();
        Ok(())
    }

    /// Add a review and patch it into every cached context that holds the
    /// product, leaving unrelated pages untouched.
    pub async fn add_review(
        &self,
        id: Uuid,
        review: NewReview,
    ) -> Result<Product, CatalogError> {
        let updated = self.api.add_review(id, review).await?;

        // The service appends, so the caller's review is the last one.
        if let Some(added) = updated.reviews.last() {
            self.cache
                .lock()
                .apply_review(id, added, updated.average_rating);
        }
        Ok(updated)
    }
}
