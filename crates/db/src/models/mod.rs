//! Row models and Create/Update DTOs, one module per table.

pub mod password_reset;
pub mod session;
pub mod user;
