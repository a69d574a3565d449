mod common;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Extension, Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use catalog::api::rest::routes;
use catalog::contract::model::{BookGenre, ProductLine};
use catalog::domain::ports::SessionVerifier;

use common::{admin_session, new_book, test_catalog, user_session, TestCatalog};

const USER_TOKEN: &str = "user-token";
const ADMIN_TOKEN: &str = "admin-token";

async fn test_router(line: ProductLine) -> (Router, TestCatalog) {
    let catalog = test_catalog(line).await;

    let sessions: Arc<dyn SessionVerifier> = Arc::new(common::StaticSessions(HashMap::from([
        (USER_TOKEN.to_string(), user_session(Uuid::new_v4())),
        (ADMIN_TOKEN.to_string(), admin_session(Uuid::new_v4())),
    ])));

    let router = routes::router(catalog.service.clone()).layer(Extension(sessions));
    (router, catalog)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn multipart_create_body(boundary: &str) -> Vec<u8> {
    let mut body = Vec::new();
    let mut text_part = |name: &str, value: &str| {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    };
    text_part("name", "The Great Gatsby");
    text_part("price", "10.5");
    text_part("category", "fiction");
    text_part("author", "F. Scott Fitzgerald");
    text_part("publication", "Scribner");

    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"cover.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xE0]);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

fn create_request(token: Option<&str>) -> Request<Body> {
    let boundary = "test-boundary";
    let mut builder = Request::builder()
        .method("POST")
        .uri("/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(multipart_create_body(boundary)))
        .unwrap()
}

#[tokio::test]
async fn list_returns_envelope_with_totals() {
    let (router, _catalog) = test_router(ProductLine::Books).await;

    let response = router
        .oneshot(Request::get("/?page=abc&limit=-1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["products"].as_array().unwrap().len(), 0);
    assert_eq!(json["totalItems"], 0);
    assert_eq!(json["totalPages"], 0);
    // garbage page/limit coerce to the defaults
    assert_eq!(json["currentPage"], 1);
}

#[tokio::test]
async fn create_requires_admin_role() {
    let (router, _catalog) = test_router(ProductLine::Books).await;

    let response = router.clone().oneshot(create_request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router
        .clone()
        .oneshot(create_request(Some(USER_TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = router.oneshot(create_request(Some(ADMIN_TOKEN))).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["product"]["name"], "the great gatsby");
    assert_eq!(json["product"]["category"], "fiction");
    assert_eq!(json["product"]["averageRating"], 0.0);
}

#[tokio::test]
async fn add_review_requires_authentication_and_updates_average() {
    let (router, catalog) = test_router(ProductLine::Books).await;
    let created = catalog
        .service
        .create(new_book("reviewable", "author", BookGenre::Fiction))
        .await
        .unwrap();

    let review_body = r#"{"rating": 5, "comment": "great"}"#;
    let uri = format!("/{}/reviews", created.id);

    let response = router
        .clone()
        .oneshot(
            Request::post(&uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(review_body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // the token cookie works as well as the bearer header
    let response = router
        .clone()
        .oneshot(
            Request::post(&uri)
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::COOKIE, format!("token={USER_TOKEN}"))
                .body(Body::from(review_body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Review added successfully");
    assert_eq!(json["product"]["averageRating"], 5.0);
    assert_eq!(json["product"]["reviews"].as_array().unwrap().len(), 1);

    // missing rating is rejected before any mutation
    let response = router
        .oneshot(
            Request::post(&uri)
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {USER_TOKEN}"))
                .body(Body::from(r#"{"comment": "no stars"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Rating is required");
}

#[tokio::test]
async fn search_without_query_is_bad_request() {
    let (router, _catalog) = test_router(ProductLine::Books).await;

    let response = router
        .oneshot(Request::get("/search").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Search query is required");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let (router, _catalog) = test_router(ProductLine::Books).await;

    for uri in [
        format!("/{}", Uuid::new_v4()),
        "/not-a-uuid".to_string(),
    ] {
        let response = router
            .clone()
            .oneshot(Request::get(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
    }
}

#[tokio::test]
async fn delete_removes_the_product() {
    let (router, catalog) = test_router(ProductLine::Books).await;
    let created = catalog
        .service
        .create(new_book("short lived", "author", BookGenre::Horror))
        .await
        .unwrap();
    let uri = format!("/{}", created.id);

    let response = router
        .clone()
        .oneshot(
            Request::delete(&uri)
                .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Product deleted successfully");

    let response = router
        .oneshot(Request::get(&uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
