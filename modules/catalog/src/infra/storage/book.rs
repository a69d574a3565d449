use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::infra::storage::doc::{StoredImages, StoredReviews};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub genre: String,
    pub author: String,
    pub publication: String,
    pub isbn: Option<String>,
    pub description: String,
    #[sea_orm(column_type = "Json")]
    pub images: StoredImages,
    #[sea_orm(column_type = "Json")]
    pub reviews: StoredReviews,
    pub average_rating: f64,
    /// Bumped on every review append; the optimistic-concurrency guard.
    pub revision: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
