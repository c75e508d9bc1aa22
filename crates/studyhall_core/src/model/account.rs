//! Account domain model.
//!
//! # Responsibility
//! - Define the canonical account record mutated by settings operations.
//! - Provide set semantics for the account/tag association.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another account.
//! - `nickname` is unique across accounts and immutable after creation.
//! - `bio` never exceeds [`MAX_BIO_CHARS`] characters.
//! - `password_hash` holds a one-way hash, never a plaintext password.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for an account record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type AccountId = Uuid;

/// Maximum bio length in characters (Unicode scalar values).
pub const MAX_BIO_CHARS: usize = 35;

/// Model-level invariant violations for account records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountValidationError {
    /// Account id must not be the nil uuid.
    NilUuid,
    /// Bio exceeds [`MAX_BIO_CHARS`] characters.
    BioTooLong { length: usize, max: usize },
}

impl Display for AccountValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "account id must not be nil"),
            Self::BioTooLong { length, max } => {
                write!(f, "bio is {length} characters, maximum is {max}")
            }
        }
    }
}

impl Error for AccountValidationError {}

/// Canonical account record.
///
/// The tag association is an owned set of tag titles resolved through the
/// tag store, not a live object graph; the repository persists it as join
/// rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Stable global ID used for persistence and auditing.
    pub uuid: AccountId,
    /// Unique login handle. Immutable after registration.
    pub nickname: String,
    /// Salted one-way hash of the current password.
    pub password_hash: String,
    /// Short self-description, at most [`MAX_BIO_CHARS`] characters.
    pub bio: Option<String>,
    /// Titles of tags this account is interested in. Unordered,
    /// duplicate-free.
    pub tags: BTreeSet<String>,
}

impl Account {
    /// Creates a new account with a generated stable ID.
    ///
    /// `password_hash` must already be hashed; this constructor never sees
    /// plaintext.
    pub fn new(nickname: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            nickname: nickname.into(),
            password_hash: password_hash.into(),
            bio: None,
            tags: BTreeSet::new(),
        }
    }

    /// Creates an account with a caller-provided stable ID.
    ///
    /// Used by read paths where identity already exists in storage.
    pub fn with_id(
        uuid: AccountId,
        nickname: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Result<Self, AccountValidationError> {
        if uuid.is_nil() {
            return Err(AccountValidationError::NilUuid);
        }
        Ok(Self {
            uuid,
            nickname: nickname.into(),
            password_hash: password_hash.into(),
            bio: None,
            tags: BTreeSet::new(),
        })
    }

    /// Checks model invariants prior to persistence.
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.uuid.is_nil() {
            return Err(AccountValidationError::NilUuid);
        }
        if let Some(bio) = &self.bio {
            let length = bio.chars().count();
            if length > MAX_BIO_CHARS {
                return Err(AccountValidationError::BioTooLong {
                    length,
                    max: MAX_BIO_CHARS,
                });
            }
        }
        Ok(())
    }

    /// Adds a tag title to the association set.
    ///
    /// Returns `false` when the title was already present (no-op).
    pub fn add_tag(&mut self, title: impl Into<String>) -> bool {
        self.tags.insert(title.into())
    }

    /// Removes a tag title from the association set.
    ///
    /// Returns `false` when the title was absent (no-op).
    pub fn remove_tag(&mut self, title: &str) -> bool {
        self.tags.remove(title)
    }

    /// Returns whether this account is associated with the given title.
    pub fn has_tag(&self, title: &str) -> bool {
        self.tags.contains(title)
    }
}

#[cfg(test)]
mod tests {
    use super::{Account, AccountValidationError, MAX_BIO_CHARS};
    use uuid::Uuid;

    #[test]
    fn new_account_starts_without_bio_or_tags() {
        let account = Account::new("jordan", "$argon2id$stub");

        assert!(!account.uuid.is_nil());
        assert_eq!(account.nickname, "jordan");
        assert_eq!(account.bio, None);
        assert!(account.tags.is_empty());
    }

    #[test]
    fn with_id_rejects_nil_uuid() {
        let err = Account::with_id(Uuid::nil(), "jordan", "hash").unwrap_err();
        assert_eq!(err, AccountValidationError::NilUuid);
    }

    #[test]
    fn validate_accepts_bio_at_the_limit() {
        let mut account = Account::new("jordan", "hash");
        account.bio = Some("x".repeat(MAX_BIO_CHARS));
        assert!(account.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bio_over_the_limit() {
        let mut account = Account::new("jordan", "hash");
        account.bio = Some("x".repeat(MAX_BIO_CHARS + 1));

        let err = account.validate().unwrap_err();
        assert_eq!(
            err,
            AccountValidationError::BioTooLong {
                length: MAX_BIO_CHARS + 1,
                max: MAX_BIO_CHARS,
            }
        );
    }

    #[test]
    fn bio_limit_counts_characters_not_bytes() {
        let mut account = Account::new("jordan", "hash");
        // 35 multibyte characters are within the limit even though the
        // UTF-8 byte length is far larger.
        account.bio = Some("가".repeat(MAX_BIO_CHARS));
        assert!(account.validate().is_ok());
    }

    #[test]
    fn tag_set_is_duplicate_free_and_case_sensitive() {
        let mut account = Account::new("jordan", "hash");

        assert!(account.add_tag("spring"));
        assert!(!account.add_tag("spring"));
        assert!(account.add_tag("Spring"));
        assert_eq!(account.tags.len(), 2);

        assert!(account.remove_tag("spring"));
        assert!(!account.remove_tag("spring"));
        assert!(account.has_tag("Spring"));
    }
}
