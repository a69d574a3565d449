use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use paging::{Page, PageRequest};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::CatalogConfig;
use crate::contract::model::{
    ImageRef, NewProduct, NewReview, Product, ProductDetails, ProductLine, ProductSummary, Review,
    ReviewSheet, ReviewWithAuthor, Variant,
};
use crate::domain::error::DomainError;
use crate::domain::ports::{MediaStore, ReviewerDirectory};
use crate::domain::query::{CategorySelector, ProductSelector, SearchTerms};
use crate::domain::repo::ProductRepository;
use crate::domain::validate;

/// Domain service for one product line. The server runs two instances over
/// the same repository, one per line; they never see each other's rows.
#[derive(Clone)]
pub struct CatalogService {
    line: ProductLine,
    repo: Arc<dyn ProductRepository>,
    media: Arc<dyn MediaStore>,
    reviewers: Arc<dyn ReviewerDirectory>,
    config: CatalogConfig,
}

impl CatalogService {
    pub fn new(
        line: ProductLine,
        repo: Arc<dyn ProductRepository>,
        media: Arc<dyn MediaStore>,
        reviewers: Arc<dyn ReviewerDirectory>,
        config: CatalogConfig,
    ) -> Self {
        Self {
            line,
            repo,
            media,
            reviewers,
            config,
        }
    }

    pub fn line(&self) -> ProductLine {
        self.line
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    #[instrument(name = "catalog.service.create", skip(self, new_product), fields(line = %self.line))]
    pub async fn create(&self, mut new_product: NewProduct) -> Result<Product, DomainError> {
        info!("Creating product");

        normalize_new_product(&mut new_product);
        let violations = validate::validate_new_product(self.line, &new_product);
        if !violations.is_empty() {
            return Err(DomainError::validation(validate::violation_message(
                &violations,
            )));
        }

        // Uploads must all succeed before anything is persisted. On failure,
        // release whatever already landed and abort with no partial record.
        let mut images: Vec<ImageRef> = Vec::with_capacity(new_product.images.len());
        for upload in &new_product.images {
            match self
                .media
                .upload(&upload.filename, upload.bytes.clone())
                .await
            {
                Ok(image) => images.push(image),
                Err(e) => {
                    warn!(error = %e, "Image upload failed, aborting create");
                    self.release_images(&images);
                    return Err(DomainError::media_store(
                        "Failed to upload one or more images",
                    ));
                }
            }
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: new_product.name,
            price: new_product.price,
            images,
            description: new_product.description,
            variant: new_product.variant,
            reviews: Vec::new(),
            average_rating: 0.0,
            created_at: now,
            updated_at: now,
        };

        self.repo
            .insert(product.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!(product_id = %product.id, "Successfully created product");
        Ok(product)
    }

    #[instrument(name = "catalog.service.get", skip(self), fields(line = %self.line, product_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<ProductDetails, DomainError> {
        debug!("Fetching product details");

        let product = self
            .repo
            .find_by_id(self.line, id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::product_not_found(id))?;

        let reviews = self.resolve_authors(&product.reviews).await?;
        Ok(ProductDetails { product, reviews })
    }

    #[instrument(name = "catalog.service.delete", skip(self), fields(line = %self.line, product_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting product");

        let deleted = self
            .repo
            .delete(self.line, id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::product_not_found(id))?;

        // The record is gone; releasing images must not undo that.
        self.release_images(&deleted.images);

        info!("Successfully deleted product");
        Ok(())
    }

    #[instrument(
        name = "catalog.service.add_review",
        skip(self, new_review),
        fields(line = %self.line, product_id = %id, user_id = %new_review.user_id)
    )]
    pub async fn add_review(
        &self,
        id: Uuid,
        new_review: NewReview,
    ) -> Result<Product, DomainError> {
        info!("Adding review");

        if let Some(violation) = validate::validate_rating(new_review.rating) {
            return Err(DomainError::validation(violation.message));
        }

        let review = Review {
            rating: new_review.rating,
            comment: new_review.comment.trim().to_string(),
            user_id: new_review.user_id,
            created_at: Utc::now(),
        };

        let updated = self
            .repo
            .append_review(self.line, id, review)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::product_not_found(id))?;

        debug!(
            average_rating = updated.average_rating,
            review_count = updated.reviews.len(),
            "Review appended"
        );
        Ok(updated)
    }

    #[instrument(name = "catalog.service.reviews", skip(self), fields(line = %self.line, product_id = %id))]
    pub async fn reviews(&self, id: Uuid) -> Result<ReviewSheet, DomainError> {
        let product = self
            .repo
            .find_by_id(self.line, id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::product_not_found(id))?;

        let reviews = self.resolve_authors(&product.reviews).await?;
        Ok(ReviewSheet {
            reviews,
            average_rating: product.average_rating,
        })
    }

    #[instrument(name = "catalog.service.list", skip(self), fields(line = %self.line))]
    pub async fn list(&self, page: PageRequest) -> Result<Page<ProductSummary>, DomainError> {
        debug!(page = page.page, limit = page.limit, "Listing products");

        self.repo
            .page(self.line, &ProductSelector::All, page)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    #[instrument(name = "catalog.service.search", skip(self), fields(line = %self.line, query = %query))]
    pub async fn search(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Page<ProductSummary>, DomainError> {
        let terms = SearchTerms::parse(query)
            .ok_or_else(|| DomainError::validation("Search query is required"))?;

        debug!(page = page.page, limit = page.limit, "Searching products");
        self.repo
            .page(self.line, &ProductSelector::Search(terms), page)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    #[instrument(name = "catalog.service.filter", skip(self), fields(line = %self.line, category = %category))]
    pub async fn filter(
        &self,
        category: &str,
        page: PageRequest,
    ) -> Result<Page<ProductSummary>, DomainError> {
        if category.trim().is_empty() {
            return Err(DomainError::validation(
                "Category is required for filtering",
            ));
        }
        let selector = self.parse_category(category)?;

        debug!(page = page.page, limit = page.limit, "Filtering products");
        self.repo
            .page(self.line, &ProductSelector::Category(selector), page)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    fn parse_category(&self, raw: &str) -> Result<CategorySelector, DomainError> {
        match self.line {
            ProductLine::Books => raw
                .parse()
                .map(CategorySelector::Book)
                .map_err(|e| DomainError::validation(format!("{e}"))),
            ProductLine::Clothing => raw
                .parse()
                .map(CategorySelector::Clothing)
                .map_err(|e| DomainError::validation(format!("{e}"))),
        }
    }

    async fn resolve_authors(
        &self,
        reviews: &[Review],
    ) -> Result<Vec<ReviewWithAuthor>, DomainError> {
        let mut ids: Vec<Uuid> = reviews.iter().map(|r| r.user_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let profiles = if ids.is_empty() {
            HashMap::new()
        } else {
            self.reviewers
                .resolve(&ids)
                .await
                .map_err(|e| DomainError::database(e.to_string()))?
        };

        Ok(reviews
            .iter()
            .map(|r| ReviewWithAuthor {
                rating: r.rating,
                comment: r.comment.clone(),
                created_at: r.created_at,
                author: profiles.get(&r.user_id).cloned(),
            })
            .collect())
    }

    /// Fire-and-forget release; a failure never affects the owning operation.
    fn release_images(&self, images: &[ImageRef]) {
        for image in images {
            let media = Arc::clone(&self.media);
            let storage_id = image.storage_id.clone();
            tokio::spawn(async move {
                if let Err(e) = media.release(&storage_id).await {
                    warn!(storage_id = %storage_id, error = %e, "Failed to release image");
                }
            });
        }
    }
}

fn normalize_new_product(new_product: &mut NewProduct) {
    new_product.name = new_product.name.trim().to_lowercase();
    new_product.description = new_product.description.trim().to_string();
    if let Variant::Book {
        author,
        publication,
        isbn,
        ..
    } = &mut new_product.variant
    {
        *author = author.trim().to_string();
        *publication = publication.trim().to_string();
        *isbn = isbn
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
    }
}
