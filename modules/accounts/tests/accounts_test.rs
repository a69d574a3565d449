use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use accounts::api::rest::routes;
use accounts::config::BootstrapAdmin;
use accounts::contract::client::AccountsApi;
use accounts::contract::error::AccountsError;
use accounts::contract::model::{NewAccount, Role};
use accounts::domain::error::DomainError;
use accounts::gateways::{AccountsLocalClient, ReviewerGate, SessionGate};
use accounts::infra::storage::SeaOrmAccountsRepository;
use accounts::{AccountsConfig, AccountsService, Migrator};
use catalog::domain::ports::{ReviewerDirectory, Role as PortRole, SessionVerifier};
use catalog::infra::media::MemoryMediaStore;

async fn test_service_with(config: AccountsConfig) -> Arc<AccountsService> {
    let mut opts = sea_orm::ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1);
    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    Arc::new(AccountsService::new(
        Arc::new(SeaOrmAccountsRepository::new(db)),
        Arc::new(MemoryMediaStore::new()),
        config,
    ))
}

async fn test_service() -> Arc<AccountsService> {
    test_service_with(AccountsConfig::default()).await
}

fn jane() -> NewAccount {
    NewAccount {
        name: "Jane Doe".into(),
        email: "Jane@Example.com".into(),
        password: "hunter42".into(),
    }
}

#[tokio::test]
async fn register_login_profile_roundtrip() {
    let service = test_service().await;

    let issued = service.register(jane()).await.unwrap();
    assert_eq!(issued.account.name, "jane doe");
    assert_eq!(issued.account.email, "jane@example.com");
    assert_eq!(issued.account.role, Role::User);

    // the registration token is immediately usable
    let profile = service.profile(&issued.token).await.unwrap();
    assert_eq!(profile.id, issued.account.id);

    // login issues a fresh session, case-insensitive on email
    let session = service.login("JANE@example.com", "hunter42").await.unwrap();
    assert_ne!(session.token, issued.token);
    assert_eq!(session.account.id, issued.account.id);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let service = test_service().await;
    service.register(jane()).await.unwrap();

    let err = service.register(jane()).await.unwrap_err();
    assert!(matches!(err, DomainError::EmailAlreadyExists { .. }));
}

#[tokio::test]
async fn wrong_email_and_wrong_password_look_identical() {
    let service = test_service().await;
    service.register(jane()).await.unwrap();

    let unknown = service
        .login("nobody@example.com", "hunter42")
        .await
        .unwrap_err();
    let wrong = service
        .login("jane@example.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(unknown.to_string(), wrong.to_string());
}

#[tokio::test]
async fn registration_input_is_validated() {
    let service = test_service().await;

    for (account, field) in [
        (
            NewAccount {
                name: "ab".into(),
                ..jane()
            },
            "name",
        ),
        (
            NewAccount {
                email: "not-an-email".into(),
                ..jane()
            },
            "email",
        ),
        (
            NewAccount {
                password: "short".into(),
                ..jane()
            },
            "password",
        ),
    ] {
        let err = service.register(account).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }), "{field}");
    }
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let service = test_service().await;
    let issued = service.register(jane()).await.unwrap();

    service.logout(&issued.token).await.unwrap();
    assert!(service.verify(&issued.token).await.unwrap().is_none());

    // revoking twice is fine
    service.logout(&issued.token).await.unwrap();
}

#[tokio::test]
async fn expired_sessions_do_not_verify() {
    let service = test_service_with(AccountsConfig {
        session_ttl_hours: 0,
        ..Default::default()
    })
    .await;

    let issued = service.register(jane()).await.unwrap();
    assert!(service.verify(&issued.token).await.unwrap().is_none());
}

#[tokio::test]
async fn bootstrap_admin_is_created_once() {
    let config = AccountsConfig {
        bootstrap_admin: Some(BootstrapAdmin {
            name: "Admin".into(),
            email: "admin@example.com".into(),
            password: "s3cretpw".into(),
        }),
        ..Default::default()
    };
    let service = test_service_with(config).await;

    service.ensure_bootstrap_admin().await.unwrap();
    service.ensure_bootstrap_admin().await.unwrap(); // idempotent

    let issued = service.login("admin@example.com", "s3cretpw").await.unwrap();
    assert_eq!(issued.account.role, Role::Admin);

    // the catalog-facing gate reports the admin role
    let gate = SessionGate::new(service);
    let session = gate.verify(&issued.token).await.unwrap().unwrap();
    assert_eq!(session.role, PortRole::Admin);
    assert!(gate.verify("bogus").await.unwrap().is_none());
}

#[tokio::test]
async fn reviewer_gate_resolves_profiles() {
    let service = test_service().await;
    let issued = service.register(jane()).await.unwrap();

    let gate = ReviewerGate::new(service);
    let resolved = gate
        .resolve(&[issued.account.id, Uuid::new_v4()])
        .await
        .unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[&issued.account.id].name, "jane doe");
    assert_eq!(resolved[&issued.account.id].email, "jane@example.com");
}

#[tokio::test]
async fn local_client_speaks_the_contract() {
    let service = test_service().await;
    let client = AccountsLocalClient::new(service);

    let issued = client.register(jane()).await.unwrap();
    assert_eq!(issued.account.role, Role::User);

    let err = client.register(jane()).await.unwrap_err();
    assert!(matches!(err, AccountsError::Conflict { .. }));

    let err = client.login("jane@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, AccountsError::InvalidCredentials));

    let (id, role) = client.verify(&issued.token).await.unwrap().unwrap();
    assert_eq!(id, issued.account.id);
    assert_eq!(role, Role::User);

    let profile = client.profile(&issued.token).await.unwrap();
    assert_eq!(profile.email, "jane@example.com");

    client.logout(&issued.token).await.unwrap();
    assert!(client.verify(&issued.token).await.unwrap().is_none());
}

#[tokio::test]
async fn avatar_update_replaces_the_reference() {
    let service = test_service().await;
    let issued = service.register(jane()).await.unwrap();

    let updated = service
        .update_avatar(issued.account.id, "me.png", vec![1, 2, 3])
        .await
        .unwrap();
    let first = updated.avatar.clone().unwrap();

    let updated = service
        .update_avatar(issued.account.id, "me2.png", vec![4, 5, 6])
        .await
        .unwrap();
    let second = updated.avatar.unwrap();
    assert_ne!(first.storage_id, second.storage_id);
}

// ---- HTTP surface ----

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn http_register_sets_cookie_and_me_reads_it() {
    let service = test_service().await;
    let router = routes::router(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "/register",
            r#"{"name": "Jane Doe", "email": "jane@example.com", "password": "hunter42"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["user"]["name"], "jane doe");
    // the credential never appears in read paths
    assert!(json["user"].get("password").is_none());
    assert!(json["user"].get("passwordHash").is_none());

    let token_pair = cookie.split(';').next().unwrap().to_string();
    let response = router
        .oneshot(
            Request::get("/me")
                .header(header::COOKIE, token_pair)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["email"], "jane@example.com");
}

#[tokio::test]
async fn http_duplicate_email_is_conflict() {
    let service = test_service().await;
    let router = routes::router(service);
    let body = r#"{"name": "Jane Doe", "email": "jane@example.com", "password": "hunter42"}"#;

    let response = router
        .clone()
        .oneshot(json_request("/register", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .oneshot(json_request("/register", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Email already exists");
}

#[tokio::test]
async fn http_login_rejects_missing_fields_and_bad_credentials() {
    let service = test_service().await;
    let router = routes::router(service);

    let response = router
        .clone()
        .oneshot(json_request("/login", r#"{"email": "jane@example.com"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(json_request(
            "/login",
            r#"{"email": "jane@example.com", "password": "nope"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid username or password");
}

#[tokio::test]
async fn http_me_without_token_is_unauthorized() {
    let service = test_service().await;
    let router = routes::router(service);

    let response = router
        .oneshot(Request::get("/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
