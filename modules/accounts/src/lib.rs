//! Accounts module: registration, login, opaque session tokens, and profile
//! management. The catalog consumes this module only through its ports
//! (session verification and reviewer projections), wired up by the server.

pub mod api;
pub mod config;
pub mod contract;
pub mod domain;
pub mod gateways;
pub mod infra;

pub use config::AccountsConfig;
pub use domain::service::AccountsService;
pub use infra::storage::migrations::Migrator;
