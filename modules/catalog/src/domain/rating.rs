//! Average-rating aggregation.
//!
//! The stored `average_rating` is a pure function of the review list and is
//! recomputed synchronously by every mutation path that changes reviews.
//! There is no lazy or hook-based recomputation.

use crate::contract::model::Review;

/// Arithmetic mean of the ratings, full float precision. Exactly 0.0 for an
/// empty list.
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    f64::from(total) / reviews.len() as f64
}
