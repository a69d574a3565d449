use axum::{
    extract::Multipart,
    http::{header, HeaderMap, StatusCode},
    response::Json,
    Extension,
};
use std::sync::Arc;

use catalog::api::rest::dto::MessageResponse;
use catalog::api::rest::error::ApiError;

use crate::api::rest::dto::{
    AuthResponse, LoginRequest, ProfileResponse, RegisterRequest, UserDto,
};
use crate::contract::model::NewAccount;
use crate::domain::service::AccountsService;

fn session_cookie(token: &str, max_age: i64) -> String {
    format!("token={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}")
}

fn cleared_cookie() -> String {
    "token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0".to_string()
}

fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        if let Ok(value) = value.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }
    }
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == "token" && !value.is_empty()).then(|| value.to_string())
    })
}

fn require_token(headers: &HeaderMap) -> Result<String, ApiError> {
    token_from_headers(headers)
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
}

/// Register a new account and sign it in.
pub async fn register(
    Extension(svc): Extension<Arc<AccountsService>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<AuthResponse>), ApiError> {
    let (Some(name), Some(email), Some(password)) = (body.name, body.email, body.password) else {
        return Err(ApiError::Validation("All fields are required".to_string()));
    };

    let issued = svc
        .register(NewAccount {
            name,
            email,
            password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        [(
            header::SET_COOKIE,
            session_cookie(&issued.token, svc.session_cookie_max_age()),
        )],
        Json(AuthResponse {
            success: true,
            message: "User created successfully".to_string(),
            user: UserDto::from(issued.account),
        }),
    ))
}

/// Verify credentials and issue a session.
pub async fn login(
    Extension(svc): Extension<Arc<AccountsService>>,
    Json(body): Json<LoginRequest>,
) -> Result<([(header::HeaderName, String); 1], Json<AuthResponse>), ApiError> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(ApiError::Validation("All fields are required".to_string()));
    };

    let issued = svc.login(&email, &password).await?;

    Ok((
        [(
            header::SET_COOKIE,
            session_cookie(&issued.token, svc.session_cookie_max_age()),
        )],
        Json(AuthResponse {
            success: true,
            message: "User logged in successfully".to_string(),
            user: UserDto::from(issued.account),
        }),
    ))
}

/// Revoke the caller's session and clear the cookie. Succeeds even without a
/// valid token.
pub async fn logout(
    Extension(svc): Extension<Arc<AccountsService>>,
    headers: HeaderMap,
) -> Result<([(header::HeaderName, String); 1], Json<MessageResponse>), ApiError> {
    if let Some(token) = token_from_headers(&headers) {
        svc.logout(&token).await?;
    }
    Ok((
        [(header::SET_COOKIE, cleared_cookie())],
        Json(MessageResponse {
            success: true,
            message: "User logged out successfully".to_string(),
        }),
    ))
}

/// The caller's own profile.
pub async fn me(
    Extension(svc): Extension<Arc<AccountsService>>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, ApiError> {
    let token = require_token(&headers)?;
    let account = svc.profile(&token).await?;
    Ok(Json(ProfileResponse {
        success: true,
        user: UserDto::from(account),
    }))
}

/// Replace the caller's avatar from a multipart upload.
pub async fn update_avatar(
    Extension(svc): Extension<Arc<AccountsService>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<AuthResponse>, ApiError> {
    let token = require_token(&headers)?;
    let account = svc.profile(&token).await?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("Malformed multipart request".to_string()))?
    {
        if field.name() == Some("avatar") {
            let filename = field.file_name().unwrap_or("avatar").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|_| ApiError::Validation("Malformed image upload".to_string()))?;
            upload = Some((filename, bytes.to_vec()));
        }
    }

    let Some((filename, bytes)) = upload else {
        return Err(ApiError::Validation(
            "Please upload a profile picture".to_string(),
        ));
    };

    let updated = svc.update_avatar(account.id, &filename, bytes).await?;
    Ok(Json(AuthResponse {
        success: true,
        message: "Profile photo changed successfully".to_string(),
        user: UserDto::from(updated),
    }))
}
