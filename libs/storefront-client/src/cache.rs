//! The cache proper: three named context slots plus the currently viewed
//! product, with explicit invalidation and patch rules. Pure data structure,
//! no I/O; the client drives it under its own lock.

use std::collections::HashMap;
use uuid::Uuid;

use catalog::contract::model::{
    ProductDetails, ProductSummary, Review, ReviewWithAuthor,
};

/// A cached product summary plus whatever reviews the client has seen for
/// it. Page payloads arrive without reviews; the list fills in as reviews
/// are added through this client.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedProduct {
    pub summary: ProductSummary,
    pub reviews: Vec<Review>,
}

impl From<ProductSummary> for CachedProduct {
    fn from(summary: ProductSummary) -> Self {
        Self {
            summary,
            reviews: Vec::new(),
        }
    }
}

/// One cached page of results with its pagination totals.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPage {
    pub items: Vec<CachedProduct>,
    pub total_items: u64,
    pub total_pages: u64,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq)]
struct SearchContext {
    query: String,
    entry: CachedPage,
}

#[derive(Debug, Clone, PartialEq)]
struct FilterContext {
    category: String,
    entry: CachedPage,
}

/// Explicit cache state: unfiltered pages by page number, at most one search
/// context, at most one filter context, and the currently viewed product.
/// Search and filter are mutually exclusive; unbounded beyond full
/// invalidation.
#[derive(Debug, Default)]
pub struct PageCache {
    pages: HashMap<u32, CachedPage>,
    search: Option<SearchContext>,
    filter: Option<FilterContext>,
    current: Option<ProductDetails>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- unfiltered listing ----

    pub fn listing(&self, page: u32) -> Option<&CachedPage> {
        self.pages.get(&page)
    }

    pub fn store_listing(&mut self, entry: CachedPage) {
        self.pages.insert(entry.page, entry);
    }

    // ---- search context ----

    pub fn search_result(&self, query: &str, page: u32) -> Option<&CachedPage> {
        self.search
            .as_ref()
            .filter(|ctx| ctx.query == query && ctx.entry.page == page)
            .map(|ctx| &ctx.entry)
    }

    /// Storing a search result clears any active filter context.
    pub fn store_search(&mut self, query: String, entry: CachedPage) {
        self.filter = None;
        self.search = Some(SearchContext { query, entry });
    }

    // ---- filter context ----

    pub fn filter_result(&self, category: &str, page: u32) -> Option<&CachedPage> {
        self.filter
            .as_ref()
            .filter(|ctx| ctx.category == category && ctx.entry.page == page)
            .map(|ctx| &ctx.entry)
    }

    /// Storing a filter result clears any active search context.
    pub fn store_filter(&mut self, category: String, entry: CachedPage) {
        self.search = None;
        self.filter = Some(FilterContext { category, entry });
    }

    // ---- currently viewed product ----

    pub fn current(&self) -> Option<&ProductDetails> {
        self.current.as_ref()
    }

    pub fn store_current(&mut self, details: ProductDetails) {
        self.current = Some(details);
    }

    // ---- mutations ----

    /// Create and delete shift item counts and page boundaries, so every
    /// context is dropped wholesale.
    pub fn invalidate_all(&mut self) {
        self.pages.clear();
        self.search = None;
        self.filter = None;
        self.current = None;
    }

    /// Patch a freshly added review into every context holding the product:
    /// prepend the review and overwrite the average, leaving all other
    /// cached entries untouched.
    pub fn apply_review(&mut self, product_id: Uuid, review: &Review, average_rating: f64) {
        let mut patch = |item: &mut CachedProduct| {
            if item.summary.id == product_id {
                item.reviews.insert(0, review.clone());
                item.summary.average_rating = average_rating;
                item.summary.review_count += 1;
            }
        };

        for entry in self.pages.values_mut() {
            entry.items.iter_mut().for_each(&mut patch);
        }
        if let Some(ctx) = self.search.as_mut() {
            ctx.entry.items.iter_mut().for_each(&mut patch);
        }
        if let Some(ctx) = self.filter.as_mut() {
            ctx.entry.items.iter_mut().for_each(&mut patch);
        }

        if let Some(details) = self.current.as_mut() {
            if details.product.id == product_id {
                details.reviews.insert(
                    0,
                    ReviewWithAuthor {
                        rating: review.rating,
                        comment: review.comment.clone(),
                        created_at: review.created_at,
                        author: None,
                    },
                );
                details.product.reviews.insert(0, review.clone());
                details.product.average_rating = average_rating;
            }
        }
    }
}

pub(crate) fn to_cached_page(page: paging::Page<ProductSummary>) -> CachedPage {
    CachedPage {
        page: page.page,
        total_items: page.total_items,
        total_pages: page.total_pages,
        items: page.items.into_iter().map(CachedProduct::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::contract::model::{BookGenre, Variant};
    use chrono::Utc;

    fn summary(id: Uuid, name: &str) -> ProductSummary {
        ProductSummary {
            id,
            name: name.into(),
            price: 10.0,
            images: Vec::new(),
            description: String::new(),
            variant: Variant::Book {
                genre: BookGenre::Fiction,
                author: "author".into(),
                publication: "pub".into(),
                isbn: None,
            },
            average_rating: 0.0,
            review_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn page_with(items: Vec<ProductSummary>, page: u32) -> CachedPage {
        CachedPage {
            total_items: items.len() as u64,
            total_pages: 1,
            page,
            items: items.into_iter().map(CachedProduct::from).collect(),
        }
    }

    fn review(rating: u8) -> Review {
        Review {
            rating,
            comment: "nice".into(),
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn search_and_filter_contexts_are_mutually_exclusive() {
        let mut cache = PageCache::new();

        cache.store_search("gatsby".into(), page_with(vec![], 1));
        assert!(cache.search_result("gatsby", 1).is_some());

        cache.store_filter("fiction".into(), page_with(vec![], 1));
        assert!(cache.search_result("gatsby", 1).is_none());
        assert!(cache.filter_result("fiction", 1).is_some());

        cache.store_search("gatsby".into(), page_with(vec![], 1));
        assert!(cache.filter_result("fiction", 1).is_none());
    }

    #[test]
    fn context_hits_require_matching_page_and_key() {
        let mut cache = PageCache::new();
        cache.store_search("gatsby".into(), page_with(vec![], 2));

        assert!(cache.search_result("gatsby", 2).is_some());
        assert!(cache.search_result("gatsby", 1).is_none());
        assert!(cache.search_result("other", 2).is_none());
    }

    #[test]
    fn invalidate_all_drops_every_context() {
        let mut cache = PageCache::new();
        cache.store_listing(page_with(vec![summary(Uuid::new_v4(), "a")], 1));
        cache.store_search("q".into(), page_with(vec![], 1));

        cache.invalidate_all();
        assert!(cache.listing(1).is_none());
        assert!(cache.search_result("q", 1).is_none());
        assert!(cache.current().is_none());
    }

    #[test]
    fn apply_review_patches_only_the_affected_product() {
        let target = Uuid::new_v4();
        let other = Uuid::new_v4();

        let mut cache = PageCache::new();
        cache.store_listing(page_with(
            vec![summary(target, "target"), summary(other, "other")],
            1,
        ));
        cache.store_filter("fiction".into(), page_with(vec![summary(target, "target")], 1));

        cache.apply_review(target, &review(5), 5.0);

        let listing = cache.listing(1).unwrap();
        let patched = listing.items.iter().find(|i| i.summary.id == target).unwrap();
        assert_eq!(patched.summary.average_rating, 5.0);
        assert_eq!(patched.summary.review_count, 1);
        assert_eq!(patched.reviews.len(), 1);

        let untouched = listing.items.iter().find(|i| i.summary.id == other).unwrap();
        assert_eq!(untouched.summary.average_rating, 0.0);
        assert!(untouched.reviews.is_empty());

        let filtered = cache.filter_result("fiction", 1).unwrap();
        assert_eq!(filtered.items[0].summary.average_rating, 5.0);
    }

    #[test]
    fn apply_review_prepends_newest_first() {
        let target = Uuid::new_v4();
        let mut cache = PageCache::new();
        cache.store_listing(page_with(vec![summary(target, "target")], 1));

        let first = review(5);
        let second = review(3);
        cache.apply_review(target, &first, 5.0);
        cache.apply_review(target, &second, 4.0);

        let listing = cache.listing(1).unwrap();
        assert_eq!(listing.items[0].reviews[0].rating, 3);
        assert_eq!(listing.items[0].reviews[1].rating, 5);
    }
}
