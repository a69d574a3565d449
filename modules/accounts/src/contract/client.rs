use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::error::AccountsError;
use crate::contract::model::{Account, IssuedSession, NewAccount, Role};

/// Accounts operations as consumed by other crates. The catalog's auth
/// extractors go through the narrower `SessionVerifier` port instead.
#[async_trait]
pub trait AccountsApi: Send + Sync {
    /// Register and immediately issue a session.
    async fn register(&self, new_account: NewAccount) -> Result<IssuedSession, AccountsError>;

    /// Verify credentials and issue a session.
    async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AccountsError>;

    /// Revoke a session token. Unknown tokens revoke to the same end state.
    async fn logout(&self, token: &str) -> Result<(), AccountsError>;

    /// Resolve a session token to its account.
    async fn profile(&self, token: &str) -> Result<Account, AccountsError>;

    /// Resolve a token to (account id, role), None when invalid or expired.
    async fn verify(&self, token: &str) -> Result<Option<(Uuid, Role)>, AccountsError>;
}
