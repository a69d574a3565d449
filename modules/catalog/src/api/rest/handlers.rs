use axum::{
    extract::{Multipart, Path, Query},
    http::StatusCode,
    response::Json,
    Extension,
};
use paging::PageRequest;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::rest::auth::{AdminUser, AuthUser};
use crate::api::rest::dto::{
    AddReviewRequest, FilterQuery, ListQuery, MessageResponse, ProductDto, ProductListResponse,
    ProductMutatedResponse, ProductResponse, ProductSummaryDto, ReviewDto, ReviewsResponse,
    SearchQuery,
};
use crate::api::rest::error::ApiError;
use crate::contract::model::{NewImage, NewProduct, NewReview, ProductLine, Variant};
use crate::domain::service::CatalogService;

fn page_request(svc: &CatalogService, page: Option<&str>, limit: Option<&str>) -> PageRequest {
    PageRequest::coerce_or(page, limit, PageRequest::new(1, svc.config().default_limit))
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound("Product not found".to_string()))
}

fn list_response(page: paging::Page<crate::contract::model::ProductSummary>) -> ProductListResponse {
    let page = page.map_items(ProductSummaryDto::from);
    ProductListResponse {
        success: true,
        products: page.items,
        total_items: page.total_items,
        total_pages: page.total_pages,
        current_page: page.page,
    }
}

/// List one page of the line, newest first.
pub async fn list_products(
    Extension(svc): Extension<Arc<CatalogService>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let request = page_request(&svc, query.page.as_deref(), query.limit.as_deref());
    let page = svc.list(request).await?;
    Ok(Json(list_response(page)))
}

/// Free-text search over name and the line's secondary field.
pub async fn search_products(
    Extension(svc): Extension<Arc<CatalogService>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let request = page_request(&svc, query.page.as_deref(), query.limit.as_deref());
    let page = svc
        .search(query.query.as_deref().unwrap_or(""), request)
        .await?;
    Ok(Json(list_response(page)))
}

/// Exact-category page.
pub async fn filter_products(
    Extension(svc): Extension<Arc<CatalogService>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let request = page_request(&svc, query.page.as_deref(), query.limit.as_deref());
    let page = svc
        .filter(query.category.as_deref().unwrap_or(""), request)
        .await?;
    Ok(Json(list_response(page)))
}

/// Full product record with reviewer projections resolved.
pub async fn get_product(
    Extension(svc): Extension<Arc<CatalogService>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let details = svc.get(parse_id(&id)?).await?;
    Ok(Json(ProductResponse {
        success: true,
        product: ProductDto::from(details),
    }))
}

/// Create a product from a multipart form (admin only).
pub async fn create_product(
    Extension(svc): Extension<Arc<CatalogService>>,
    AdminUser(_session): AdminUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ProductMutatedResponse>), ApiError> {
    let mut name = None;
    let mut price_raw = None;
    let mut category_raw = None;
    let mut author = None;
    let mut publication = None;
    let mut isbn = None;
    let mut description = String::new();
    let mut images: Vec<NewImage> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("Malformed multipart request".to_string()))?
    {
        match field.name().unwrap_or_default() {
            "images" => {
                let filename = field.file_name().unwrap_or("image").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::Validation("Malformed image upload".to_string()))?;
                if bytes.len() > svc.config().max_image_bytes {
                    return Err(ApiError::Validation(
                        "Image exceeds the upload size limit".to_string(),
                    ));
                }
                images.push(NewImage {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            "name" => name = Some(read_text(field).await?),
            "price" => price_raw = Some(read_text(field).await?),
            "category" | "type" => category_raw = Some(read_text(field).await?),
            "author" => author = Some(read_text(field).await?),
            "publication" => publication = Some(read_text(field).await?),
            "isbn" => isbn = Some(read_text(field).await?),
            "description" => description = read_text(field).await?,
            _ => {}
        }
    }

    let (Some(name), Some(price_raw), Some(category_raw)) = (name, price_raw, category_raw) else {
        return Err(ApiError::Validation(
            "All required fields must be provided, and 1-5 images are required".to_string(),
        ));
    };

    let price: f64 = price_raw
        .trim()
        .parse()
        .map_err(|_| ApiError::Validation("Price must be a number".to_string()))?;

    let variant = match svc.line() {
        ProductLine::Books => Variant::Book {
            genre: category_raw.parse().map_err(|_| {
                ApiError::Validation(format!("{} is not a valid book type", category_raw.trim()))
            })?,
            author: author.unwrap_or_default(),
            publication: publication.unwrap_or_default(),
            isbn,
        },
        ProductLine::Clothing => Variant::Clothing {
            kind: category_raw.parse().map_err(|_| {
                ApiError::Validation(format!("{} is not a valid item type", category_raw.trim()))
            })?,
        },
    };

    let product = svc
        .create(NewProduct {
            name,
            price,
            description,
            variant,
            images,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductMutatedResponse {
            success: true,
            message: "Product created successfully".to_string(),
            product: ProductDto::from(product),
        }),
    ))
}

/// Delete a product (admin only). Image release is best-effort afterwards.
pub async fn delete_product(
    Extension(svc): Extension<Arc<CatalogService>>,
    AdminUser(_session): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    svc.delete(parse_id(&id)?).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Product deleted successfully".to_string(),
    }))
}

/// Review list plus average rating.
pub async fn get_reviews(
    Extension(svc): Extension<Arc<CatalogService>>,
    Path(id): Path<String>,
) -> Result<Json<ReviewsResponse>, ApiError> {
    let sheet = svc.reviews(parse_id(&id)?).await?;
    Ok(Json(ReviewsResponse {
        success: true,
        reviews: sheet.reviews.into_iter().map(ReviewDto::from).collect(),
        average_rating: sheet.average_rating,
    }))
}

/// Append a review as the authenticated caller.
pub async fn add_review(
    Extension(svc): Extension<Arc<CatalogService>>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
    Json(body): Json<AddReviewRequest>,
) -> Result<Json<ProductMutatedResponse>, ApiError> {
    let Some(rating) = body.rating else {
        return Err(ApiError::Validation("Rating is required".to_string()));
    };

    let product = svc
        .add_review(
            parse_id(&id)?,
            NewReview {
                // Out-of-range values collapse to 0 and fail the domain's
                // bound check with the proper message.
                rating: u8::try_from(rating).unwrap_or(0),
                comment: body.comment.unwrap_or_default(),
                user_id: session.user_id,
            },
        )
        .await?;

    Ok(Json(ProductMutatedResponse {
        success: true,
        message: "Review added successfully".to_string(),
        product: ProductDto::from(product),
    }))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|_| ApiError::Validation("Malformed multipart request".to_string()))
}
