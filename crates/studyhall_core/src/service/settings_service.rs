//! Account settings use-case service.
//!
//! # Responsibility
//! - Orchestrate the profile, tag and password settings operations.
//! - Validate user input before any persistence happens.
//!
//! # Invariants
//! - Each operation is a single validate-then-persist step; nothing is
//!   written on the failure path.
//! - Tag add/remove are idempotent; repeating a call leaves the same
//!   stored state.
//! - Plaintext passwords reach only the hasher, never storage or logs.

use crate::auth::{HashError, PasswordHasher};
use crate::model::account::{Account, MAX_BIO_CHARS};
use crate::repo::account_repo::AccountRepository;
use crate::repo::tag_repo::TagRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Recoverable user-input constraint violation.
///
/// Callers map these to form feedback via the stable `field()`/`reason()`
/// pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Candidate bio exceeds the maximum length.
    BioTooLong { length: usize, max: usize },
    /// New password and its confirmation differ.
    PasswordMismatch,
}

impl ValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::BioTooLong { .. } => "bio",
            Self::PasswordMismatch => "new_password_confirm",
        }
    }

    /// Stable constraint identifier for the violation.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::BioTooLong { .. } => "length",
            Self::PasswordMismatch => "mismatch",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BioTooLong { length, max } => {
                write!(f, "bio is {length} characters, maximum is {max}")
            }
            Self::PasswordMismatch => write!(f, "new password and confirmation do not match"),
        }
    }
}

impl Error for ValidationError {}

/// Service error for settings use-cases.
#[derive(Debug)]
pub enum SettingsError {
    /// User input violated a constraint; recoverable, nothing persisted.
    Validation(ValidationError),
    /// No account exists for the given nickname.
    AccountNotFound(String),
    /// Password hashing backend failure.
    Hash(HashError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::AccountNotFound(nickname) => write!(f, "account not found: {nickname}"),
            Self::Hash(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::AccountNotFound(_) => None,
            Self::Hash(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ValidationError> for SettingsError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<HashError> for SettingsError {
    fn from(value: HashError) -> Self {
        Self::Hash(value)
    }
}

impl From<RepoError> for SettingsError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Settings service facade over account/tag stores and the hasher.
pub struct SettingsService<A, T, H> {
    accounts: A,
    tags: T,
    hasher: H,
}

impl<A, T, H> SettingsService<A, T, H>
where
    A: AccountRepository,
    T: TagRepository,
    H: PasswordHasher,
{
    /// Creates a service over the provided store and hasher implementations.
    pub fn new(accounts: A, tags: T, hasher: H) -> Self {
        Self {
            accounts,
            tags,
            hasher,
        }
    }

    /// Replaces the account bio after validating its length.
    ///
    /// # Contract
    /// - Bio longer than [`MAX_BIO_CHARS`] characters fails with
    ///   `ValidationError::BioTooLong`; the stored bio stays untouched.
    /// - Re-applying the same bio yields the same stored state.
    pub fn update_profile(&self, nickname: &str, bio: &str) -> Result<(), SettingsError> {
        let length = bio.chars().count();
        if length > MAX_BIO_CHARS {
            warn!(
                "event=profile_update module=service status=rejected nickname={nickname} \
                 field=bio reason=length length={length}"
            );
            return Err(ValidationError::BioTooLong {
                length,
                max: MAX_BIO_CHARS,
            }
            .into());
        }

        let mut account = self.load_account(nickname)?;
        account.bio = Some(bio.to_string());
        self.accounts.save(&account)?;

        info!("event=profile_update module=service status=ok nickname={nickname}");
        Ok(())
    }

    /// Associates a tag with the account, creating the tag when absent.
    ///
    /// # Contract
    /// - No validation failure path; idempotent under repeated calls.
    /// - The tag record exists in the tag store after this returns.
    pub fn add_tag(&self, nickname: &str, tag_title: &str) -> Result<(), SettingsError> {
        // Resolve the account before touching the tag store: an unknown
        // nickname must not leave a freshly created tag row behind.
        let mut account = self.load_account(nickname)?;
        let tag = self.tags.get_or_create(tag_title)?;

        if account.add_tag(tag.title) {
            self.accounts.save(&account)?;
        }

        info!("event=tag_add module=service status=ok nickname={nickname}");
        Ok(())
    }

    /// Dissociates a tag from the account.
    ///
    /// # Contract
    /// - Unknown title or tag not on the account is a no-op success.
    /// - Idempotent; the shared tag record itself is never deleted.
    pub fn remove_tag(&self, nickname: &str, tag_title: &str) -> Result<(), SettingsError> {
        let Some(tag) = self.tags.find_by_title(tag_title)? else {
            info!("event=tag_remove module=service status=noop nickname={nickname}");
            return Ok(());
        };

        let mut account = self.load_account(nickname)?;
        if account.remove_tag(&tag.title) {
            self.accounts.save(&account)?;
        }

        info!("event=tag_remove module=service status=ok nickname={nickname}");
        Ok(())
    }

    /// Replaces the stored credential after confirming the new password.
    ///
    /// # Contract
    /// - `new_password` must equal `confirm_password` byte-for-byte;
    ///   otherwise `ValidationError::PasswordMismatch` and the stored
    ///   credential stays unchanged.
    /// - On success the previous credential is immediately invalidated.
    pub fn update_password(
        &self,
        nickname: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), SettingsError> {
        if new_password != confirm_password {
            warn!(
                "event=password_update module=service status=rejected nickname={nickname} \
                 field=new_password_confirm reason=mismatch"
            );
            return Err(ValidationError::PasswordMismatch.into());
        }

        let mut account = self.load_account(nickname)?;
        account.password_hash = self.hasher.hash(new_password)?;
        self.accounts.save(&account)?;

        info!("event=password_update module=service status=ok nickname={nickname}");
        Ok(())
    }

    /// Returns the tag titles currently associated with the account.
    pub fn account_tags(&self, nickname: &str) -> Result<BTreeSet<String>, SettingsError> {
        Ok(self.load_account(nickname)?.tags)
    }

    /// Returns every known tag title, the whitelist offered by the tags
    /// form.
    pub fn tag_whitelist(&self) -> Result<Vec<String>, SettingsError> {
        Ok(self.tags.list_titles()?)
    }

    fn load_account(&self, nickname: &str) -> Result<Account, SettingsError> {
        self.accounts
            .find_by_nickname(nickname)?
            .ok_or_else(|| SettingsError::AccountNotFound(nickname.to_string()))
    }
}
