//! JSON document columns embedded in product rows.
//!
//! Reviews and images are owned by their product and live inside its row, so
//! a row delete removes them atomically and reviews are never orphaned.

use chrono::{DateTime, Utc};
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contract::model::{ImageRef, Review};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    pub storage_id: String,
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StoredImages(pub Vec<StoredImage>);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredReview {
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StoredReviews(pub Vec<StoredReview>);

impl From<&ImageRef> for StoredImage {
    fn from(image: &ImageRef) -> Self {
        Self {
            storage_id: image.storage_id.clone(),
            url: image.url.clone(),
        }
    }
}

impl From<StoredImage> for ImageRef {
    fn from(stored: StoredImage) -> Self {
        Self {
            storage_id: stored.storage_id,
            url: stored.url,
        }
    }
}

impl From<&Review> for StoredReview {
    fn from(review: &Review) -> Self {
        Self {
            rating: review.rating,
            comment: review.comment.clone(),
            user_id: review.user_id,
            created_at: review.created_at,
        }
    }
}

impl From<StoredReview> for Review {
    fn from(stored: StoredReview) -> Self {
        Self {
            rating: stored.rating,
            comment: stored.comment,
            user_id: stored.user_id,
            created_at: stored.created_at,
        }
    }
}

impl StoredImages {
    pub fn from_refs(images: &[ImageRef]) -> Self {
        Self(images.iter().map(StoredImage::from).collect())
    }

    pub fn into_refs(self) -> Vec<ImageRef> {
        self.0.into_iter().map(ImageRef::from).collect()
    }
}

impl StoredReviews {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        Self(reviews.iter().map(StoredReview::from).collect())
    }

    pub fn into_reviews(self) -> Vec<Review> {
        self.0.into_iter().map(Review::from).collect()
    }
}
