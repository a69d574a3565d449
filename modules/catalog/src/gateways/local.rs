//! In-process implementation of the `CatalogApi` contract, wrapping the
//! domain service and translating domain errors into contract errors.

use async_trait::async_trait;
use paging::{Page, PageRequest};
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::client::CatalogApi;
use crate::contract::error::CatalogError;
use crate::contract::model::{
    NewProduct, NewReview, Product, ProductDetails, ProductSummary, ReviewSheet,
};
use crate::domain::error::DomainError;
use crate::domain::service::CatalogService;

#[derive(Clone)]
pub struct CatalogLocalClient {
    service: Arc<CatalogService>,
}

impl CatalogLocalClient {
    pub fn new(service: Arc<CatalogService>) -> Self {
        Self { service }
    }
}

fn to_contract_error(e: DomainError) -> CatalogError {
    match e {
        DomainError::ProductNotFound { id } => CatalogError::NotFound { id },
        DomainError::Validation { message } => CatalogError::Validation { message },
        DomainError::MediaStore { message } => CatalogError::Upstream { message },
        DomainError::Database { .. } => CatalogError::Internal,
    }
}

#[async_trait]
impl CatalogApi for CatalogLocalClient {
    async fn list(&self, page: PageRequest) -> Result<Page<ProductSummary>, CatalogError> {
        self.service.list(page).await.map_err(to_contract_error)
    }

    async fn search(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Page<ProductSummary>, CatalogError> {
        self.service
            .search(query, page)
            .await
            .map_err(to_contract_error)
    }

    async fn filter(
        &self,
        category: &str,
        page: PageRequest,
    ) -> Result<Page<ProductSummary>, CatalogError> {
        self.service
            .filter(category, page)
            .await
            .map_err(to_contract_error)
    }

    async fn get(&self, id: Uuid) -> Result<ProductDetails, CatalogError> {
        self.service.get(id).await.map_err(to_contract_error)
    }

    async fn create(&self, new_product: NewProduct) -> Result<Product, CatalogError> {
        self.service
            .create(new_product)
            .await
            .map_err(to_contract_error)
    }

    async fn delete(&self, id: Uuid) -> Result<(), CatalogError> {
        self.service.delete(id).await.map_err(to_contract_error)
    }

    async fn add_review(&self, id: Uuid, review: NewReview) -> Result<Product, CatalogError> {
        self.service
            .add_review(id, review)
            .await
            .map_err(to_contract_error)
    }

    async fn reviews(&self, id: Uuid) -> Result<ReviewSheet, CatalogError> {
        self.service.reviews(id).await.map_err(to_contract_error)
    }
}
