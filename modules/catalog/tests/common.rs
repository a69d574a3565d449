//! Shared helpers for catalog integration tests.

use async_trait::async_trait;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use catalog::contract::model::{
    BookGenre, ClothingKind, NewImage, NewProduct, ProductLine, ReviewerProfile, Variant,
};
use catalog::domain::ports::{ReviewerDirectory, Role, Session, SessionVerifier};
use catalog::infra::media::MemoryMediaStore;
use catalog::infra::storage::SeaOrmProductRepository;
use catalog::{CatalogConfig, CatalogService, Migrator};

/// Fresh in-memory database with the catalog schema applied. A single
/// connection keeps every query on the same in-memory database.
pub async fn test_db() -> DatabaseConnection {
    let mut opts = sea_orm::ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1);
    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Directory stub resolving from a fixed map.
pub struct StaticReviewers(pub HashMap<Uuid, ReviewerProfile>);

#[async_trait]
impl ReviewerDirectory for StaticReviewers {
    async fn resolve(&self, ids: &[Uuid]) -> anyhow::Result<HashMap<Uuid, ReviewerProfile>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.0.get(id).cloned().map(|p| (*id, p)))
            .collect())
    }
}

/// Session stub resolving from a fixed token map.
pub struct StaticSessions(pub HashMap<String, Session>);

#[async_trait]
impl SessionVerifier for StaticSessions {
    async fn verify(&self, token: &str) -> anyhow::Result<Option<Session>> {
        Ok(self.0.get(token).copied())
    }
}

pub struct TestCatalog {
    pub service: Arc<CatalogService>,
    pub media: Arc<MemoryMediaStore>,
}

pub async fn test_catalog(line: ProductLine) -> TestCatalog {
    test_catalog_with_reviewers(line, HashMap::new()).await
}

pub async fn test_catalog_with_reviewers(
    line: ProductLine,
    reviewers: HashMap<Uuid, ReviewerProfile>,
) -> TestCatalog {
    let db = test_db().await;
    let media = Arc::new(MemoryMediaStore::new());
    let service = Arc::new(CatalogService::new(
        line,
        Arc::new(SeaOrmProductRepository::new(db)),
        media.clone(),
        Arc::new(StaticReviewers(reviewers)),
        CatalogConfig::default(),
    ));
    TestCatalog { service, media }
}

pub fn image() -> NewImage {
    NewImage {
        filename: "cover.jpg".into(),
        bytes: vec![0xFF, 0xD8, 0xFF],
    }
}

pub fn new_book(name: &str, author: &str, genre: BookGenre) -> NewProduct {
    NewProduct {
        name: name.into(),
        price: 15.0,
        description: String::new(),
        variant: Variant::Book {
            genre,
            author: author.into(),
            publication: "test press".into(),
            isbn: None,
        },
        images: vec![image()],
    }
}

pub fn new_clothing(name: &str, kind: ClothingKind) -> NewProduct {
    NewProduct {
        name: name.into(),
        price: 25.0,
        description: String::new(),
        variant: Variant::Clothing { kind },
        images: vec![image()],
    }
}

pub fn user_session(user_id: Uuid) -> Session {
    Session {
        user_id,
        role: Role::User,
    }
}

pub fn admin_session(user_id: Uuid) -> Session {
    Session {
        user_id,
        role: Role::Admin,
    }
}
