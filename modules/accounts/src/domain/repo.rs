use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use catalog::contract::model::{ImageRef, ReviewerProfile};

use crate::contract::model::Account;

/// A stored account together with its credential digest. Only the login path
/// sees this; everything else works with `Account`.
#[derive(Debug, Clone)]
pub struct AccountWithCredential {
    pub account: Account,
    pub password_hash: String,
}

/// A stored session row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Persistence port for the accounts domain.
#[async_trait]
pub trait AccountsRepository: Send + Sync {
    /// Insert a fully-formed account with its credential digest.
    async fn insert(&self, account: Account, password_hash: String) -> anyhow::Result<()>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Account>>;

    /// Lookup for login; includes the credential digest.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<AccountWithCredential>>;

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool>;

    /// Replace the avatar reference, returning the updated account. None if
    /// the account vanished.
    async fn set_avatar(
        &self,
        id: Uuid,
        avatar: ImageRef,
        updated_at: DateTime<Utc>,
    ) -> anyhow::Result<Option<Account>>;

    async fn insert_session(&self, session: SessionRecord) -> anyhow::Result<()>;

    async fn find_session(&self, token: &str) -> anyhow::Result<Option<SessionRecord>>;

    /// Delete a session. Deleting an unknown token is not an error.
    async fn delete_session(&self, token: &str) -> anyhow::Result<()>;

    /// Display projections for review read paths; unknown ids are absent.
    async fn resolve_profiles(
        &self,
        ids: &[Uuid],
    ) -> anyhow::Result<HashMap<Uuid, ReviewerProfile>>;
}
