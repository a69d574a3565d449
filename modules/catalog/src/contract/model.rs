use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Reference to an image held by the media store: the opaque storage id used
/// to release it later, plus the URL clients fetch it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub storage_id: String,
    pub url: String,
}

/// The two product lines. Each is backed by its own table; book queries never
/// return clothing and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductLine {
    Books,
    Clothing,
}

impl ProductLine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::Clothing => "clothing",
        }
    }
}

impl fmt::Display for ProductLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! category_enum {
    ($(#[$doc:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownCategory;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_lowercase();
                match normalized.as_str() {
                    $($label => Ok(Self::$variant),)+
                    _ => Err(UnknownCategory(s.trim().to_string())),
                }
            }
        }
    };
}

category_enum! {
    /// Closed set of book genres.
    BookGenre {
        Comedy => "comedy",
        Study => "study",
        Romantic => "romantic",
        Horror => "horror",
        Fiction => "fiction",
        NonFiction => "non-fiction",
        Mystery => "mystery",
        Fantasy => "fantasy",
        Biography => "biography",
    }
}

category_enum! {
    /// Closed set of clothing categories.
    ClothingKind {
        Shirt => "shirt",
        Pants => "pants",
        Shoes => "shoes",
        SportsGear => "sports gear",
        Jacket => "jacket",
        Dress => "dress",
        Skirt => "skirt",
        Sweater => "sweater",
        Accessories => "accessories",
    }
}

/// A category value that failed to parse against its closed enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a valid category", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

/// Line-specific product data. Category and the line's extra fields travel
/// together, so a clothing category can never be attached to a book.
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Book {
        genre: BookGenre,
        author: String,
        publication: String,
        isbn: Option<String>,
    },
    Clothing {
        kind: ClothingKind,
    },
}

impl Variant {
    pub fn line(&self) -> ProductLine {
        match self {
            Self::Book { .. } => ProductLine::Books,
            Self::Clothing { .. } => ProductLine::Clothing,
        }
    }

    /// Wire label of the category ("fiction", "shoes", ...).
    pub fn category_label(&self) -> &'static str {
        match self {
            Self::Book { genre, .. } => genre.as_str(),
            Self::Clothing { kind } => kind.as_str(),
        }
    }
}

/// One user's rating plus optional comment. Reviews are only ever created by
/// add-review; there is no edit or delete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub rating: u8,
    pub comment: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A catalog item. `average_rating` is derived from `reviews` and is
/// recomputed by every mutation that touches the review list, never lazily.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub images: Vec<ImageRef>,
    pub description: String,
    pub variant: Variant,
    pub reviews: Vec<Review>,
    pub average_rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn line(&self) -> ProductLine {
        self.variant.line()
    }

    /// List payloads exclude the review list to keep pages small.
    pub fn summarize(&self) -> ProductSummary {
        ProductSummary {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            images: self.images.clone(),
            description: self.description.clone(),
            variant: self.variant.clone(),
            average_rating: self.average_rating,
            review_count: self.reviews.len() as u64,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// `Product` without its review list, as served by list/search/filter pages.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub images: Vec<ImageRef>,
    pub description: String,
    pub variant: Variant,
    pub average_rating: f64,
    pub review_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Small projection of the reviewing user, resolved on read paths for
/// display. The review itself only stores the user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<ImageRef>,
}

/// A review joined with its reviewer's display projection. `author` is None
/// when the user can no longer be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewWithAuthor {
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub author: Option<ReviewerProfile>,
}

/// Full detail payload: the product plus its reviews with authors resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    pub product: Product,
    pub reviews: Vec<ReviewWithAuthor>,
}

/// Review list payload as served by the reviews endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSheet {
    pub reviews: Vec<ReviewWithAuthor>,
    pub average_rating: f64,
}

/// A raw uploaded image, not yet handed to the media store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Data for creating a product. Images are uploaded to the media store as
/// part of create; the whole operation fails if any upload fails.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub variant: Variant,
    pub images: Vec<NewImage>,
}

/// Data for appending a review to a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub rating: u8,
    pub comment: String,
    pub user_id: Uuid,
}
