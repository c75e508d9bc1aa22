//! Core domain logic for the studyhall account-settings feature.
//! This crate is the single source of truth for settings invariants.

pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::{Argon2Hasher, HashError, PasswordHasher};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::account::{Account, AccountId, AccountValidationError, MAX_BIO_CHARS};
pub use model::tag::Tag;
pub use repo::account_repo::{AccountRepository, SqliteAccountRepository};
pub use repo::tag_repo::{SqliteTagRepository, TagRepository};
pub use repo::{RepoError, RepoResult};
pub use service::settings_service::{SettingsError, SettingsService, ValidationError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
