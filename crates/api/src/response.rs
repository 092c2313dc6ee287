//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope per project
//! conventions; operations without a payload use [`MessageResponse`].

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// Wraps any serializable payload in the project's standard response format.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: user }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Standard `{ "message": ... }` envelope for payload-less outcomes
/// (logout, password reset confirmations, and the like).
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
