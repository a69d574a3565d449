//! Precondition checks for catalog mutations.
//!
//! Validation is explicit: each check appends to a violation list and the
//! caller rejects the whole operation before any mutation when the list is
//! non-empty. No schema layer, no partial writes.

use crate::contract::model::{NewProduct, ProductLine, Variant};

pub const MIN_IMAGES: usize = 1;
pub const MAX_IMAGES: usize = 5;
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// A single failed precondition, tagged with the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

impl Violation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Collapse a violation list into the single-line message sent to callers.
pub fn violation_message(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check a create request against the target line. Returns every violation
/// rather than stopping at the first.
pub fn validate_new_product(line: ProductLine, new_product: &NewProduct) -> Vec<Violation> {
    let mut violations = Vec::new();

    if new_product.name.trim().is_empty() {
        violations.push(Violation::new("name", "Name is required"));
    }

    if !new_product.price.is_finite() || new_product.price < 0.0 {
        violations.push(Violation::new("price", "Price cannot be negative"));
    }

    let count = new_product.images.len();
    if !(MIN_IMAGES..=MAX_IMAGES).contains(&count) {
        violations.push(Violation::new(
            "images",
            format!("Must have at least {MIN_IMAGES} and at most {MAX_IMAGES} images"),
        ));
    }
    if new_product.images.iter().any(|img| img.bytes.is_empty()) {
        violations.push(Violation::new("images", "Empty image upload"));
    }

    if new_product.variant.line() != line {
        violations.push(Violation::new(
            "category",
            format!("Category does not belong to the {line} line"),
        ));
    }

    if let Variant::Book {
        author,
        publication,
        ..
    } = &new_product.variant
    {
        if author.trim().is_empty() {
            violations.push(Violation::new("author", "Author is required"));
        }
        if publication.trim().is_empty() {
            violations.push(Violation::new("publication", "Publication is required"));
        }
    }

    violations
}

/// Rating bound check shared by add-review.
pub fn validate_rating(rating: u8) -> Option<Violation> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        None
    } else {
        Some(Violation::new(
            "rating",
            format!("Rating must be between {MIN_RATING} and {MAX_RATING}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::{BookGenre, ClothingKind, NewImage};

    fn image() -> NewImage {
        NewImage {
            filename: "cover.jpg".into(),
            bytes: vec![1, 2, 3],
        }
    }

    fn book(images: usize) -> NewProduct {
        NewProduct {
            name: "the great gatsby".into(),
            price: 10.0,
            description: String::new(),
            variant: Variant::Book {
                genre: BookGenre::Fiction,
                author: "F. Scott Fitzgerald".into(),
                publication: "Scribner".into(),
                isbn: None,
            },
            images: (0..images).map(|_| image()).collect(),
        }
    }

    #[test]
    fn image_count_bounds() {
        assert!(validate_new_product(ProductLine::Books, &book(0))
            .iter()
            .any(|v| v.field == "images"));
        assert!(validate_new_product(ProductLine::Books, &book(6))
            .iter()
            .any(|v| v.field == "images"));
        assert!(validate_new_product(ProductLine::Books, &book(1)).is_empty());
        assert!(validate_new_product(ProductLine::Books, &book(5)).is_empty());
    }

    #[test]
    fn missing_required_fields_are_all_reported() {
        let mut new_product = book(1);
        new_product.name = "  ".into();
        new_product.price = -1.0;
        let violations = validate_new_product(ProductLine::Books, &new_product);
        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"price"));
    }

    #[test]
    fn variant_must_match_line() {
        let clothing = NewProduct {
            name: "winter jacket".into(),
            price: 49.0,
            description: String::new(),
            variant: Variant::Clothing {
                kind: ClothingKind::Jacket,
            },
            images: vec![image()],
        };
        assert!(validate_new_product(ProductLine::Books, &clothing)
            .iter()
            .any(|v| v.field == "category"));
        assert!(validate_new_product(ProductLine::Clothing, &clothing).is_empty());
    }

    #[test]
    fn rating_bounds() {
        assert!(validate_rating(0).is_some());
        assert!(validate_rating(6).is_some());
        assert!(validate_rating(1).is_none());
        assert!(validate_rating(5).is_none());
    }
}
