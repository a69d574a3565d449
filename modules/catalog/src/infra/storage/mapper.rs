//! Conversions between storage rows and contract models.
//!
//! Category strings are parsed against their closed enums on the way out; a
//! row that fails to parse indicates a corrupted table and surfaces as an
//! error rather than a silently skipped product.

use anyhow::{bail, Context};
use sea_orm::Set;

use crate::contract::model::{Product, ProductSummary, Variant};
use crate::infra::storage::doc::{StoredImages, StoredReviews};
use crate::infra::storage::{book, clothing};

pub fn book_to_product(model: book::Model) -> anyhow::Result<Product> {
    let genre = model
        .genre
        .parse()
        .with_context(|| format!("book {} has invalid genre {:?}", model.id, model.genre))?;
    Ok(Product {
        id: model.id,
        name: model.name,
        price: model.price,
        images: model.images.into_refs(),
        description: model.description,
        variant: Variant::Book {
            genre,
            author: model.author,
            publication: model.publication,
            isbn: model.isbn,
        },
        reviews: model.reviews.into_reviews(),
        average_rating: model.average_rating,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub fn clothing_to_product(model: clothing::Model) -> anyhow::Result<Product> {
    let kind = model
        .kind
        .parse()
        .with_context(|| format!("clothing {} has invalid kind {:?}", model.id, model.kind))?;
    Ok(Product {
        id: model.id,
        name: model.name,
        price: model.price,
        images: model.images.into_refs(),
        description: model.description,
        variant: Variant::Clothing { kind },
        reviews: model.reviews.into_reviews(),
        average_rating: model.average_rating,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub fn product_to_book_active(product: &Product) -> anyhow::Result<book::ActiveModel> {
    let Variant::Book {
        genre,
        author,
        publication,
        isbn,
    } = &product.variant
    else {
        bail!("product {} is not a book", product.id);
    };
    Ok(book::ActiveModel {
        id: Set(product.id),
        name: Set(product.name.clone()),
        price: Set(product.price),
        genre: Set(genre.as_str().to_string()),
        author: Set(author.clone()),
        publication: Set(publication.clone()),
        isbn: Set(isbn.clone()),
        description: Set(product.description.clone()),
        images: Set(StoredImages::from_refs(&product.images)),
        reviews: Set(StoredReviews::from_reviews(&product.reviews)),
        average_rating: Set(product.average_rating),
        revision: Set(0),
        created_at: Set(product.created_at),
        updated_at: Set(product.updated_at),
    })
}

pub fn product_to_clothing_active(product: &Product) -> anyhow::Result<clothing::ActiveModel> {
    let Variant::Clothing { kind } = &product.variant else {
        bail!("product {} is not a clothing item", product.id);
    };
    Ok(clothing::ActiveModel {
        id: Set(product.id),
        name: Set(product.name.clone()),
        price: Set(product.price),
        kind: Set(kind.as_str().to_string()),
        description: Set(product.description.clone()),
        images: Set(StoredImages::from_refs(&product.images)),
        reviews: Set(StoredReviews::from_reviews(&product.reviews)),
        average_rating: Set(product.average_rating),
        revision: Set(0),
        created_at: Set(product.created_at),
        updated_at: Set(product.updated_at),
    })
}

pub fn book_to_summary(model: book::Model) -> anyhow::Result<ProductSummary> {
    book_to_product(model).map(|p| p.summarize())
}

pub fn clothing_to_summary(model: clothing::Model) -> anyhow::Result<ProductSummary> {
    clothing_to_product(model).map(|p| p.summarize())
}
