//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and hasher calls into settings operations.
//! - Keep request-handling layers decoupled from storage details.

pub mod settings_service;
