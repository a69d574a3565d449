use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use std::collections::HashMap;
use uuid::Uuid;

use catalog::contract::model::{ImageRef, ReviewerProfile};

use crate::contract::model::Account;
use crate::domain::repo::{AccountWithCredential, AccountsRepository, SessionRecord};
use crate::infra::storage::{mapper, session, user};

pub struct SeaOrmAccountsRepository {
    db: DatabaseConnection,
}

impl SeaOrmAccountsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountsRepository for SeaOrmAccountsRepository {
    async fn insert(&self, account: Account, password_hash: String) -> anyhow::Result<()> {
        let model = user::ActiveModel {
            id: Set(account.id),
            name: Set(account.name),
            email: Set(account.email),
            password_hash: Set(password_hash),
            role: Set(account.role.as_str().to_string()),
            avatar: Set(account.avatar.as_ref().map(mapper::ref_to_avatar)),
            created_at: Set(account.created_at),
            updated_at: Set(account.updated_at),
        };
        model.insert(&self.db).await.context("insert user failed")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Account>> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user failed")?
            .map(mapper::user_to_account)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<AccountWithCredential>> {
        let Some(model) = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email failed")?
        else {
            return Ok(None);
        };
        let password_hash = model.password_hash.clone();
        Ok(Some(AccountWithCredential {
            account: mapper::user_to_account(model)?,
            password_hash,
        }))
    }

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await
            .context("email_exists failed")?;
        Ok(count > 0)
    }

    async fn set_avatar(
        &self,
        id: Uuid,
        avatar: ImageRef,
        updated_at: DateTime<Utc>,
    ) -> anyhow::Result<Option<Account>> {
        let Some(model) = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user failed")?
        else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = model.into();
        active.avatar = Set(Some(mapper::ref_to_avatar(&avatar)));
        active.updated_at = Set(updated_at);
        let updated = active
            .update(&self.db)
            .await
            .context("set avatar failed")?;
        mapper::user_to_account(updated).map(Some)
    }

    async fn insert_session(&self, record: SessionRecord) -> anyhow::Result<()> {
        let model = session::ActiveModel {
            token: Set(record.token),
            user_id: Set(record.user_id),
            expires_at: Set(record.expires_at),
            created_at: Set(Utc::now()),
        };
        model
            .insert(&self.db)
            .await
            .context("insert session failed")?;
        Ok(())
    }

    async fn find_session(&self, token: &str) -> anyhow::Result<Option<SessionRecord>> {
        Ok(session::Entity::find_by_id(token)
            .one(&self.db)
            .await
            .context("find session failed")?
            .map(|m| SessionRecord {
                token: m.token,
                user_id: m.user_id,
                expires_at: m.expires_at,
            }))
    }

    async fn delete_session(&self, token: &str) -> anyhow::Result<()> {
        session::Entity::delete_by_id(token)
            .exec(&self.db)
            .await
            .context("delete session failed")?;
        Ok(())
    }

    async fn resolve_profiles(
        &self,
        ids: &[Uuid],
    ) -> anyhow::Result<HashMap<Uuid, ReviewerProfile>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = user::Entity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("resolve profiles failed")?;
        Ok(rows
            .into_iter()
            .map(|m| (m.id, mapper::user_to_profile(m)))
            .collect())
    }
}
