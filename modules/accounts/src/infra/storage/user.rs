use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::infra::storage::StoredAvatar;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Salted digest; never leaves the storage layer except for login.
    pub password_hash: String,
    pub role: String,
    #[sea_orm(column_type = "Json", nullable)]
    pub avatar: Option<StoredAvatar>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
