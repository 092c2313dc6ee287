//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`token`] -- signed session-credential issuing and verification.
//! - [`session`] -- session lifecycle orchestration over the store.

pub mod password;
pub mod session;
pub mod token;
