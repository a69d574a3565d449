//! SeaORM-backed repository. One table per product line; queries dispatch on
//! the line and never cross tables.

use anyhow::{bail, Context};
use async_trait::async_trait;
use paging::{Page, PageRequest};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::contract::model::{Product, ProductLine, ProductSummary, Review};
use crate::domain::query::{CategorySelector, ProductSelector, SearchTerms};
use crate::domain::rating;
use crate::domain::repo::ProductRepository;
use crate::infra::storage::doc::{StoredReview, StoredReviews};
use crate::infra::storage::{book, clothing, mapper};

/// Retries for the optimistic review append before giving up. Contention on
/// a single product is short-lived; this bound only guards against livelock.
const MAX_APPEND_ATTEMPTS: u32 = 8;

pub struct SeaOrmProductRepository {
    db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn insert(&self, product: Product) -> anyhow::Result<()> {
        match product.line() {
            ProductLine::Books => {
                let model = mapper::product_to_book_active(&product)?;
                book::Entity::insert(model)
                    .exec(&self.db)
                    .await
                    .context("insert book failed")?;
            }
            ProductLine::Clothing => {
                let model = mapper::product_to_clothing_active(&product)?;
                clothing::Entity::insert(model)
                    .exec(&self.db)
                    .await
                    .context("insert clothing item failed")?;
            }
        }
        Ok(())
    }

    async fn find_by_id(&self, line: ProductLine, id: Uuid) -> anyhow::Result<Option<Product>> {
        match line {
            ProductLine::Books => book::Entity::find_by_id(id)
                .one(&self.db)
                .await
                .context("find book failed")?
                .map(mapper::book_to_product)
                .transpose(),
            ProductLine::Clothing => clothing::Entity::find_by_id(id)
                .one(&self.db)
                .await
                .context("find clothing item failed")?
                .map(mapper::clothing_to_product)
                .transpose(),
        }
    }

    async fn delete(&self, line: ProductLine, id: Uuid) -> anyhow::Result<Option<Product>> {
        // Embedded reviews live in the row, so the single delete removes the
        // product and its reviews together.
        match line {
            ProductLine::Books => {
                let Some(model) = book::Entity::find_by_id(id)
                    .one(&self.db)
                    .await
                    .context("find book failed")?
                else {
                    return Ok(None);
                };
                let res = book::Entity::delete_by_id(id)
                    .exec(&self.db)
                    .await
                    .context("delete book failed")?;
                if res.rows_affected == 0 {
                    return Ok(None);
                }
                mapper::book_to_product(model).map(Some)
            }
            ProductLine::Clothing => {
                let Some(model) = clothing::Entity::find_by_id(id)
                    .one(&self.db)
                    .await
                    .context("find clothing item failed")?
                else {
                    return Ok(None);
                };
                let res = clothing::Entity::delete_by_id(id)
                    .exec(&self.db)
                    .await
                    .context("delete clothing item failed")?;
                if res.rows_affected == 0 {
                    return Ok(None);
                }
                mapper::clothing_to_product(model).map(Some)
            }
        }
    }

    async fn page(
        &self,
        line: ProductLine,
        selector: &ProductSelector,
        page: PageRequest,
    ) -> anyhow::Result<Page<ProductSummary>> {
        match line {
            ProductLine::Books => self.page_books(selector, page).await,
            ProductLine::Clothing => self.page_clothing(selector, page).await,
        }
    }

    async fn append_review(
        &self,
        line: ProductLine,
        id: Uuid,
        review: Review,
    ) -> anyhow::Result<Option<Product>> {
        match line {
            ProductLine::Books => self.append_book_review(id, review).await,
            ProductLine::Clothing => self.append_clothing_review(id, review).await,
        }
    }
}

impl SeaOrmProductRepository {
    async fn page_books(
        &self,
        selector: &ProductSelector,
        page: PageRequest,
    ) -> anyhow::Result<Page<ProductSummary>> {
        let condition = book_condition(selector);

        let total = book::Entity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await
            .context("count books failed")?;

        let rows = book::Entity::find()
            .filter(condition)
            .order_by_desc(book::Column::CreatedAt)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("page books failed")?;

        let items = rows
            .into_iter()
            .map(mapper::book_to_summary)
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Page::new(items, total, page))
    }

    async fn page_clothing(
        &self,
        selector: &ProductSelector,
        page: PageRequest,
    ) -> anyhow::Result<Page<ProductSummary>> {
        let condition = clothing_condition(selector);

        let total = clothing::Entity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await
            .context("count clothing items failed")?;

        let rows = clothing::Entity::find()
            .filter(condition)
            .order_by_desc(clothing::Column::CreatedAt)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("page clothing items failed")?;

        let items = rows
            .into_iter()
            .map(mapper::clothing_to_summary)
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Page::new(items, total, page))
    }

    async fn append_book_review(
        &self,
        id: Uuid,
        review: Review,
    ) -> anyhow::Result<Option<Product>> {
        for _ in 0..MAX_APPEND_ATTEMPTS {
            let Some(model) = book::Entity::find_by_id(id)
                .one(&self.db)
                .await
                .context("find book failed")?
            else {
                return Ok(None);
            };

            let mut reviews = model.reviews.0.clone();
            reviews.push(StoredReview::from(&review));
            let domain_reviews: Vec<Review> =
                reviews.iter().cloned().map(Review::from).collect();
            let average = rating::average_rating(&domain_reviews);

            // The update only lands if nobody else bumped the revision since
            // our read; otherwise re-read and recompute.
            let res = book::Entity::update_many()
                .filter(book::Column::Id.eq(id))
                .filter(book::Column::Revision.eq(model.revision))
                .col_expr(
                    book::Column::Reviews,
                    Expr::value(StoredReviews(reviews.clone())),
                )
                .col_expr(book::Column::AverageRating, Expr::value(average))
                .col_expr(book::Column::Revision, Expr::value(model.revision + 1))
                .col_expr(book::Column::UpdatedAt, Expr::value(review.created_at))
                .exec(&self.db)
                .await
                .context("append book review failed")?;

            if res.rows_affected > 0 {
                let updated = book::Model {
                    reviews: StoredReviews(reviews),
                    average_rating: average,
                    revision: model.revision + 1,
                    updated_at: review.created_at,
                    ..model
                };
                return mapper::book_to_product(updated).map(Some);
            }
        }
        bail!("gave up appending review to book {id} after contention");
    }

    async fn append_clothing_review(
        &self,
        id: Uuid,
        review: Review,
    ) -> anyhow::Result<Option<Product>> {
        for _ in 0..MAX_APPEND_ATTEMPTS {
            let Some(model) = clothing::Entity::find_by_id(id)
                .one(&self.db)
                .await
                .context("find clothing item failed")?
            else {
                return Ok(None);
            };

            let mut reviews = model.reviews.0.clone();
            reviews.push(StoredReview::from(&review));
            let domain_reviews: Vec<Review> =
                reviews.iter().cloned().map(Review::from).collect();
            let average = rating::average_rating(&domain_reviews);

            let res = clothing::Entity::update_many()
                .filter(clothing::Column::Id.eq(id))
                .filter(clothing::Column::Revision.eq(model.revision))
                .col_expr(
                    clothing::Column::Reviews,
                    Expr::value(StoredReviews(reviews.clone())),
                )
                .col_expr(clothing::Column::AverageRating, Expr::value(average))
                .col_expr(clothing::Column::Revision, Expr::value(model.revision + 1))
                .col_expr(clothing::Column::UpdatedAt, Expr::value(review.created_at))
                .exec(&self.db)
                .await
                .context("append clothing review failed")?;

            if res.rows_affected > 0 {
                let updated = clothing::Model {
                    reviews: StoredReviews(reviews),
                    average_rating: average,
                    revision: model.revision + 1,
                    updated_at: review.created_at,
                    ..model
                };
                return mapper::clothing_to_product(updated).map(Some);
            }
        }
        bail!("gave up appending review to clothing item {id} after contention");
    }
}

fn book_condition(selector: &ProductSelector) -> Condition {
    match selector {
        ProductSelector::All => Condition::all(),
        ProductSelector::Search(terms) => {
            search_condition(terms, book::Column::Name, book::Column::Author)
        }
        ProductSelector::Category(category) => match category {
            CategorySelector::Book(genre) => {
                Condition::all().add(book::Column::Genre.eq(genre.as_str()))
            }
            // Line dispatch happens above; a clothing selector cannot reach
            // the books table, but match exhaustively rather than panic.
            CategorySelector::Clothing(_) => Condition::all().add(Expr::value(false)),
        },
    }
}

fn clothing_condition(selector: &ProductSelector) -> Condition {
    match selector {
        ProductSelector::All => Condition::all(),
        ProductSelector::Search(terms) => {
            search_condition(terms, clothing::Column::Name, clothing::Column::Kind)
        }
        ProductSelector::Category(category) => match category {
            CategorySelector::Clothing(kind) => {
                Condition::all().add(clothing::Column::Kind.eq(kind.as_str()))
            }
            CategorySelector::Book(_) => Condition::all().add(Expr::value(false)),
        },
    }
}

/// Whole phrase OR any token, against name OR the secondary column. Matching
/// is case-insensitive: names are stored lowercased and the terms are
/// lowercased at parse, with LIKE covering the mixed-case secondary column.
fn search_condition<C: ColumnTrait>(terms: &SearchTerms, name: C, secondary: C) -> Condition {
    let mut condition = Condition::any();
    for needle in terms.needles() {
        condition = condition
            .add(name.contains(needle))
            .add(secondary.contains(needle));
    }
    condition
}
