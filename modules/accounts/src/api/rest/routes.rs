use axum::{
    routing::{get, patch, post},
    Extension, Router,
};
use std::sync::Arc;

use crate::api::rest::handlers;
use crate::domain::service::AccountsService;

/// Router for the accounts surface, mounted under `/api/v1/users`.
pub fn router(service: Arc<AccountsService>) -> Router {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/me", get(handlers::me))
        .route("/me/avatar", patch(handlers::update_avatar))
        .layer(Extension(service))
}
