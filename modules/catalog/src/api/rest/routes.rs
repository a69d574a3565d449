use axum::{routing::get, Extension, Router};
use std::sync::Arc;

use crate::api::rest::handlers;
use crate::domain::service::CatalogService;

/// Router for one product line. The server mounts one instance per line
/// (e.g. under `/api/v1/books` and `/api/v1/clothing`).
pub fn router(service: Arc<CatalogService>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/search", get(handlers::search_products))
        .route("/filter", get(handlers::filter_products))
        .route(
            "/{id}",
            get(handlers::get_product).delete(handlers::delete_product),
        )
        .route(
            "/{id}/reviews",
            get(handlers::get_reviews).post(handlers::add_review),
        )
        .layer(Extension(service))
}
