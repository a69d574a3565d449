use serde::{Deserialize, Serialize};

/// Configuration for the accounts module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountsConfig {
    /// Session lifetime in hours.
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u64,
    /// Minimum accepted password length.
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
    /// Optional admin account ensured at startup.
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl_hours(),
            min_password_length: default_min_password_length(),
            bootstrap_admin: None,
        }
    }
}

fn default_session_ttl_hours() -> u64 {
    7 * 24
}

fn default_min_password_length() -> usize {
    6
}
