pub mod mapper;
pub mod migrations;
pub mod repo;
pub mod session;
pub mod user;

pub use repo::SeaOrmAccountsRepository;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Avatar reference embedded in the user row as JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StoredAvatar {
    pub storage_id: String,
    pub url: String,
}
