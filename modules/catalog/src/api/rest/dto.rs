use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{
    ImageRef, Product, ProductDetails, ProductSummary, Review, ReviewWithAuthor, ReviewerProfile,
    Variant,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageDto {
    pub storage_id: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<ImageDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    /// Resolved display projection; present on read paths that populate it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<ReviewerDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    pub description: String,
    pub images: Vec<ImageDto>,
    pub average_rating: f64,
    pub reviews: Vec<ReviewDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List entries carry no review bodies, only the count and the average.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummaryDto {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    pub description: String,
    pub images: Vec<ImageDto>,
    pub average_rating: f64,
    pub review_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---- response envelopes ----

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub success: bool,
    pub products: Vec<ProductSummaryDto>,
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub success: bool,
    pub product: ProductDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductMutatedResponse {
    pub success: bool,
    pub message: String,
    pub product: ProductDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsResponse {
    pub success: bool,
    pub reviews: Vec<ReviewDto>,
    pub average_rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// ---- query parameters ----

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(alias = "type")]
    pub category: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddReviewRequest {
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

// ---- conversions ----

impl From<ImageRef> for ImageDto {
    fn from(image: ImageRef) -> Self {
        Self {
            storage_id: image.storage_id,
            url: image.url,
        }
    }
}

impl From<ReviewerProfile> for ReviewerDto {
    fn from(profile: ReviewerProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            avatar: profile.avatar.map(ImageDto::from),
        }
    }
}

impl From<Review> for ReviewDto {
    fn from(review: Review) -> Self {
        Self {
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
            user_id: Some(review.user_id),
            user: None,
        }
    }
}

impl From<ReviewWithAuthor> for ReviewDto {
    fn from(review: ReviewWithAuthor) -> Self {
        Self {
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
            user_id: review.author.as_ref().map(|a| a.id),
            user: review.author.map(ReviewerDto::from),
        }
    }
}

fn variant_fields(
    variant: &Variant,
) -> (String, Option<String>, Option<String>, Option<String>) {
    match variant {
        Variant::Book {
            genre,
            author,
            publication,
            isbn,
        } => (
            genre.as_str().to_string(),
            Some(author.clone()),
            Some(publication.clone()),
            isbn.clone(),
        ),
        Variant::Clothing { kind } => (kind.as_str().to_string(), None, None, None),
    }
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        let (category, author, publication, isbn) = variant_fields(&product.variant);
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            category,
            author,
            publication,
            isbn,
            description: product.description,
            images: product.images.into_iter().map(ImageDto::from).collect(),
            average_rating: product.average_rating,
            reviews: product.reviews.into_iter().map(ReviewDto::from).collect(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl From<ProductDetails> for ProductDto {
    fn from(details: ProductDetails) -> Self {
        let mut dto = ProductDto::from(details.product);
        dto.reviews = details.reviews.into_iter().map(ReviewDto::from).collect();
        dto
    }
}

impl From<ProductSummary> for ProductSummaryDto {
    fn from(summary: ProductSummary) -> Self {
        let (category, author, publication, isbn) = variant_fields(&summary.variant);
        Self {
            id: summary.id,
            name: summary.name,
            price: summary.price,
            category,
            author,
            publication,
            isbn,
            description: summary.description,
            images: summary.images.into_iter().map(ImageDto::from).collect(),
            average_rating: summary.average_rating,
            review_count: summary.review_count,
            created_at: summary.created_at,
            updated_at: summary.updated_at,
        }
    }
}
