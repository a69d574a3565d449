//! In-process adapters: the `AccountsApi` contract plus the two catalog
//! ports (session verification, reviewer directory) implemented over the
//! domain service.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use catalog::contract::model::ReviewerProfile;
use catalog::domain::ports::{ReviewerDirectory, Role as PortRole, Session, SessionVerifier};

use crate::contract::client::AccountsApi;
use crate::contract::error::AccountsError;
use crate::contract::model::{Account, IssuedSession, NewAccount, Role};
use crate::domain::error::DomainError;
use crate::domain::service::AccountsService;

fn to_contract_error(e: DomainError) -> AccountsError {
    match e {
        DomainError::AccountNotFound { id } => AccountsError::NotFound { id },
        DomainError::EmailAlreadyExists { email } => AccountsError::Conflict { email },
        DomainError::InvalidCredentials => AccountsError::InvalidCredentials,
        DomainError::InvalidSession => AccountsError::InvalidCredentials,
        DomainError::Validation { message } => AccountsError::Validation { message },
        DomainError::MediaStore { .. } | DomainError::Database { .. } => AccountsError::Internal,
    }
}

#[derive(Clone)]
pub struct AccountsLocalClient {
    service: Arc<AccountsService>,
}

impl AccountsLocalClient {
    pub fn new(service: Arc<AccountsService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl AccountsApi for AccountsLocalClient {
    async fn register(&self, new_account: NewAccount) -> Result<IssuedSession, AccountsError> {
        self.service
            .register(new_account)
            .await
            .map_err(to_contract_error)
    }

    async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AccountsError> {
        self.service
            .login(email, password)
            .await
            .map_err(to_contract_error)
    }

    async fn logout(&self, token: &str) -> Result<(), AccountsError> {
        self.service.logout(token).await.map_err(to_contract_error)
    }

    async fn profile(&self, token: &str) -> Result<Account, AccountsError> {
        self.service
            .profile(token)
            .await
            .map_err(to_contract_error)
    }

    async fn verify(&self, token: &str) -> Result<Option<(Uuid, Role)>, AccountsError> {
        self.service.verify(token).await.map_err(to_contract_error)
    }
}

/// Session port for the catalog's auth extractors.
#[derive(Clone)]
pub struct SessionGate {
    service: Arc<AccountsService>,
}

impl SessionGate {
    pub fn new(service: Arc<AccountsService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl SessionVerifier for SessionGate {
    async fn verify(&self, token: &str) -> anyhow::Result<Option<Session>> {
        let resolved = self
            .service
            .verify(token)
            .await
            .map_err(|e| anyhow::anyhow!(e.to_string()))?;
        Ok(resolved.map(|(user_id, role)| Session {
            user_id,
            role: match role {
                Role::Admin => PortRole::Admin,
                Role::User => PortRole::User,
            },
        }))
    }
}

/// Reviewer directory port for the catalog's review read paths.
#[derive(Clone)]
pub struct ReviewerGate {
    service: Arc<AccountsService>,
}

impl ReviewerGate {
    pub fn new(service: Arc<AccountsService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ReviewerDirectory for ReviewerGate {
    async fn resolve(&self, ids: &[Uuid]) -> anyhow::Result<HashMap<Uuid, ReviewerProfile>> {
        self.service
            .resolve_reviewers(ids)
            .await
            .map_err(|e| anyhow::anyhow!(e.to_string()))
    }
}
