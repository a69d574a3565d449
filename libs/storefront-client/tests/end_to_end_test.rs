//! The cache client against the real catalog service (in-process gateway,
//! in-memory SQLite) rather than a test double.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use catalog::contract::client::CatalogApi;
use catalog::contract::model::{
    BookGenre, NewImage, NewProduct, NewReview, ProductLine, ReviewerProfile, Variant,
};
use catalog::domain::ports::ReviewerDirectory;
use catalog::gateways::CatalogLocalClient;
use catalog::infra::media::MemoryMediaStore;
use catalog::infra::storage::SeaOrmProductRepository;
use catalog::{CatalogConfig, CatalogService, Migrator};
use storefront_client::StorefrontClient;

struct NoReviewers;

#[async_trait]
impl ReviewerDirectory for NoReviewers {
    async fn resolve(&self, _ids: &[Uuid]) -> anyhow::Result<HashMap<Uuid, ReviewerProfile>> {
        Ok(HashMap::new())
    }
}

async fn client_over_real_service() -> Arc<StorefrontClient> {
    let mut opts = sea_orm::ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1);
    let db = Database::connect(opts).await.expect("connect failed");
    Migrator::up(&db, None).await.expect("migrations failed");

    let service = Arc::new(CatalogService::new(
        ProductLine::Books,
        Arc::new(SeaOrmProductRepository::new(db)),
        Arc::new(MemoryMediaStore::new()),
        Arc::new(NoReviewers),
        CatalogConfig::default(),
    ));
    let api: Arc<dyn CatalogApi> = Arc::new(CatalogLocalClient::new(service));
    Arc::new(StorefrontClient::with_limit(api, 12))
}

fn book(name: &str) -> NewProduct {
    NewProduct {
        name: name.into(),
        price: 12.0,
        description: String::new(),
        variant: Variant::Book {
            genre: BookGenre::Fiction,
            author: "some author".into(),
            publication: "press".into(),
            isbn: None,
        },
        images: vec![NewImage {
            filename: "cover.jpg".into(),
            bytes: vec![1, 2, 3],
        }],
    }
}

#[tokio::test]
async fn full_flow_through_the_local_gateway() {
    let client = client_over_real_service().await;

    let created = client.create(book("The Great Gatsby")).await.unwrap();
    assert_eq!(created.name, "the great gatsby");

    // listing goes through the gateway once, then comes from cache
    let page = client.browse(1).await.unwrap();
    assert_eq!(page.total_items, 1);
    let cached = client.browse(1).await.unwrap();
    assert_eq!(cached, page);

    // search matches per-token against the real query engine
    let found = client.search("gats unrelated", 1).await.unwrap().unwrap();
    assert_eq!(found.total_items, 1);

    // a review patches the cached contexts and the stored average
    let updated = client
        .add_review(
            created.id,
            NewReview {
                rating: 4,
                comment: "good".into(),
                user_id: Uuid::new_v4(),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.average_rating, 4.0);

    let page = client.browse(1).await.unwrap();
    assert_eq!(page.items[0].summary.average_rating, 4.0);
    assert_eq!(page.items[0].reviews.len(), 1);

    // details through the gateway reflect the review immediately
    let details = client.view(created.id).await.unwrap();
    assert_eq!(details.product.average_rating, 4.0);
    assert_eq!(details.reviews.len(), 1);

    // delete invalidates and the id disappears from every query mode
    client.delete(created.id).await.unwrap();
    let page = client.browse(1).await.unwrap();
    assert_eq!(page.total_items, 0);
    let found = client.search("gatsby", 1).await.unwrap().unwrap();
    assert_eq!(found.total_items, 0);
}
