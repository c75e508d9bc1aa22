//! Password hashing seam for the settings core.
//!
//! # Responsibility
//! - Provide a one-way, salted transform from plaintext to stored hash.
//! - Verify candidate plaintexts against stored hashes.
//!
//! # Invariants
//! - Hashing the same plaintext twice may produce different stored hashes;
//!   verification must go through `matches`, never string comparison.
//! - Plaintext passwords never leave this module in logs or errors.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure to produce a stored hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashError(String);

impl Display for HashError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "password hashing failed: {}", self.0)
    }
}

impl Error for HashError {}

/// One-way credential transform consumed by the settings service.
pub trait PasswordHasher {
    /// Hashes a plaintext password into its stored representation.
    fn hash(&self, plaintext: &str) -> Result<String, HashError>;

    /// Verifies a plaintext candidate against a stored hash.
    ///
    /// Returns `false` for both wrong passwords and malformed stored
    /// hashes.
    fn matches(&self, plaintext: &str, stored: &str) -> bool;
}

/// Argon2id hasher producing salted PHC-format strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| HashError(err.to_string()))
    }

    fn matches(&self, plaintext: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::{Argon2Hasher, PasswordHasher};

    #[test]
    fn hash_then_matches_roundtrip() {
        let hasher = Argon2Hasher;
        let stored = hasher.hash("correct horse").unwrap();

        assert!(stored.starts_with("$argon2"));
        assert!(hasher.matches("correct horse", &stored));
        assert!(!hasher.matches("wrong horse", &stored));
    }

    #[test]
    fn equal_plaintexts_produce_distinct_salted_hashes() {
        let hasher = Argon2Hasher;
        let first = hasher.hash("12345678").unwrap();
        let second = hasher.hash("12345678").unwrap();

        assert_ne!(first, second);
        assert!(hasher.matches("12345678", &first));
        assert!(hasher.matches("12345678", &second));
    }

    #[test]
    fn matches_rejects_malformed_stored_hash() {
        let hasher = Argon2Hasher;
        assert!(!hasher.matches("anything", "not-a-phc-string"));
    }
}
