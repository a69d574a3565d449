//! OpenAPI document assembled from the modules' DTO schemas and served at
//! `/openapi.json`.

use axum::response::Json;
use serde_json::Value;
use utoipa::OpenApi;

use accounts::api::rest::dto as accounts_dto;
use catalog::api::rest::dto as catalog_dto;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        description = "Catalog and reviews backend: books and clothing lines, accounts, five-star reviews",
        version = "0.1.0"
    ),
    components(schemas(
        catalog_dto::ImageDto,
        catalog_dto::ReviewerDto,
        catalog_dto::ReviewDto,
        catalog_dto::ProductDto,
        catalog_dto::ProductSummaryDto,
        catalog_dto::ProductListResponse,
        catalog_dto::ProductResponse,
        catalog_dto::ProductMutatedResponse,
        catalog_dto::ReviewsResponse,
        catalog_dto::MessageResponse,
        catalog_dto::AddReviewRequest,
        accounts_dto::UserDto,
        accounts_dto::RegisterRequest,
        accounts_dto::LoginRequest,
        accounts_dto::AuthResponse,
        accounts_dto::ProfileResponse,
    )),
    tags(
        (name = "books", description = "Book catalog"),
        (name = "clothing", description = "Clothing catalog"),
        (name = "users", description = "Accounts and sessions")
    )
)]
struct ApiDoc;

pub async fn serve() -> Json<Value> {
    Json(serde_json::to_value(ApiDoc::openapi()).unwrap_or_default())
}
