//! Domain layer shared by the database and API crates.
//!
//! Holds the common id/timestamp aliases, the domain error enum, and the
//! password policy used by signup, password change, and password reset.

pub mod error;
pub mod password_policy;
pub mod types;
