use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use catalog::contract::model::ReviewerProfile;
use catalog::domain::ports::MediaStore;

use crate::config::AccountsConfig;
use crate::contract::model::{Account, IssuedSession, NewAccount, Role};
use crate::domain::error::DomainError;
use crate::domain::password;
use crate::domain::repo::{AccountsRepository, SessionRecord};

const MIN_NAME_LENGTH: usize = 3;
const MAX_NAME_LENGTH: usize = 100;

/// Domain service for registration, login, sessions, and profiles.
#[derive(Clone)]
pub struct AccountsService {
    repo: Arc<dyn AccountsRepository>,
    media: Arc<dyn MediaStore>,
    config: AccountsConfig,
}

impl AccountsService {
    pub fn new(
        repo: Arc<dyn AccountsRepository>,
        media: Arc<dyn MediaStore>,
        config: AccountsConfig,
    ) -> Self {
        Self {
            repo,
            media,
            config,
        }
    }

    #[instrument(name = "accounts.service.register", skip(self, new_account), fields(email = %new_account.email))]
    pub async fn register(&self, new_account: NewAccount) -> Result<IssuedSession, DomainError> {
        info!("Registering account");

        let name = new_account.name.trim().to_lowercase();
        let email = new_account.email.trim().to_lowercase();

        if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&name.chars().count()) {
            return Err(DomainError::validation(format!(
                "Name must be between {MIN_NAME_LENGTH} and {MAX_NAME_LENGTH} characters"
            )));
        }
        if email.is_empty() || !email.contains('@') || !email.contains('.') {
            return Err(DomainError::validation("A valid email is required"));
        }
        if new_account.password.len() < self.config.min_password_length {
            return Err(DomainError::validation(format!(
                "Password must be at least {} characters",
                self.config.min_password_length
            )));
        }

        if self
            .repo
            .email_exists(&email)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            return Err(DomainError::email_already_exists(email));
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            name,
            email,
            role: Role::User,
            avatar: None,
            created_at: now,
            updated_at: now,
        };

        self.repo
            .insert(account.clone(), password::hash_password(&new_account.password))
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!(account_id = %account.id, "Successfully registered account");
        self.issue_session(account).await
    }

    #[instrument(name = "accounts.service.login", skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, DomainError> {
        debug!("Attempting login");

        let email = email.trim().to_lowercase();
        let stored = self
            .repo
            .find_by_email(&email)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or(DomainError::InvalidCredentials)?;

        if !password::verify_password(&stored.password_hash, password) {
            return Err(DomainError::InvalidCredentials);
        }

        info!(account_id = %stored.account.id, "Login succeeded");
        self.issue_session(stored.account).await
    }

    #[instrument(name = "accounts.service.logout", skip_all)]
    pub async fn logout(&self, token: &str) -> Result<(), DomainError> {
        self.repo
            .delete_session(token)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Resolve a token to (account id, role). None for unknown or expired
    /// tokens; expired rows are reaped on sight.
    #[instrument(name = "accounts.service.verify", skip_all)]
    pub async fn verify(&self, token: &str) -> Result<Option<(Uuid, Role)>, DomainError> {
        let Some(session) = self
            .repo
            .find_session(token)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        else {
            return Ok(None);
        };

        if session.expires_at <= Utc::now() {
            if let Err(e) = self.repo.delete_session(token).await {
                warn!(error = %e, "Failed to reap expired session");
            }
            return Ok(None);
        }

        let account = self
            .repo
            .find_by_id(session.user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        Ok(account.map(|a| (a.id, a.role)))
    }

    #[instrument(name = "accounts.service.profile", skip_all)]
    pub async fn profile(&self, token: &str) -> Result<Account, DomainError> {
        let (id, _) = self
            .verify(token)
            .await?
            .ok_or(DomainError::InvalidSession)?;
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::account_not_found(id))
    }

    #[instrument(name = "accounts.service.update_avatar", skip(self, bytes), fields(account_id = %id))]
    pub async fn update_avatar(
        &self,
        id: Uuid,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<Account, DomainError> {
        info!("Updating avatar");

        let current = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::account_not_found(id))?;

        let avatar = self.media.upload(filename, bytes).await.map_err(|e| {
            warn!(error = %e, "Avatar upload failed");
            DomainError::media_store("Failed to upload image")
        })?;

        let updated = self
            .repo
            .set_avatar(id, avatar, Utc::now())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::account_not_found(id))?;

        // Old avatar release is best-effort, after the record update landed.
        if let Some(old) = current.avatar {
            let media = Arc::clone(&self.media);
            tokio::spawn(async move {
                if let Err(e) = media.release(&old.storage_id).await {
                    warn!(storage_id = %old.storage_id, error = %e, "Failed to release old avatar");
                }
            });
        }

        Ok(updated)
    }

    /// Display projections for the catalog's review read paths.
    pub async fn resolve_reviewers(
        &self,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, ReviewerProfile>, DomainError> {
        self.repo
            .resolve_profiles(ids)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Create the configured admin account if it does not exist yet.
    #[instrument(name = "accounts.service.bootstrap_admin", skip(self))]
    pub async fn ensure_bootstrap_admin(&self) -> Result<(), DomainError> {
        let Some(admin) = self.config.bootstrap_admin.clone() else {
            return Ok(());
        };
        let email = admin.email.trim().to_lowercase();

        if self
            .repo
            .email_exists(&email)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            return Ok(());
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            name: admin.name.trim().to_lowercase(),
            email,
            role: Role::Admin,
            avatar: None,
            created_at: now,
            updated_at: now,
        };
        self.repo
            .insert(account.clone(), password::hash_password(&admin.password))
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!(account_id = %account.id, "Bootstrapped admin account");
        Ok(())
    }

    pub fn session_cookie_max_age(&self) -> i64 {
        (self.config.session_ttl_hours * 3600) as i64
    }

    async fn issue_session(&self, account: Account) -> Result<IssuedSession, DomainError> {
        let token = password::generate_token();
        let expires_at = Utc::now() + Duration::hours(self.config.session_ttl_hours as i64);

        self.repo
            .insert_session(SessionRecord {
                token: token.clone(),
                user_id: account.id,
                expires_at,
            })
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        Ok(IssuedSession {
            token,
            account,
            expires_at,
        })
    }
}
