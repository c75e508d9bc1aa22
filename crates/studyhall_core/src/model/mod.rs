//! Domain model for account settings.
//!
//! # Responsibility
//! - Define the canonical account and tag records used by core logic.
//! - Keep business invariants close to the data they constrain.
//!
//! # Invariants
//! - Every account is identified by a stable `AccountId` and a unique,
//!   immutable nickname.
//! - The account `password_hash` field always holds a hash, never plaintext.
//! - Tags are shared by title; the account owns only a set of title
//!   references, not tag objects.

pub mod account;
pub mod tag;
