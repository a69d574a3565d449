//! Ports the catalog domain needs from the outside world: media storage,
//! reviewer display projections, and session verification for the HTTP
//! layer's auth decisions. Implementations live in `infra` and in the
//! accounts module's gateways.

use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use crate::contract::model::{ImageRef, ReviewerProfile};

/// External media host. Upload is a blocking step of create/update; release
/// is best-effort on delete paths.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store raw image bytes, returning the (storage id, url) pair.
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> anyhow::Result<ImageRef>;

    /// Release a stored asset. Callers log and ignore failures.
    async fn release(&self, storage_id: &str) -> anyhow::Result<()>;
}

/// Resolves reviewing users to their small display projections. Ids that no
/// longer resolve are simply absent from the result.
#[async_trait]
pub trait ReviewerDirectory: Send + Sync {
    async fn resolve(&self, ids: &[Uuid]) -> anyhow::Result<HashMap<Uuid, ReviewerProfile>>;
}

/// Caller roles as the catalog cares about them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

/// An authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub role: Role,
}

/// Credential/session collaborator: resolves an opaque token to a session,
/// or None when the token is missing, expired, or revoked.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> anyhow::Result<Option<Session>>;
}
