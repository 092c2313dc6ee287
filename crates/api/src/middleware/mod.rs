//! Request middleware.
//!
//! - [`gatekeeper`] -- page-navigation guard (redirects by route class).
//! - [`auth`] -- authoritative session extractor for API handlers.

pub mod auth;
pub mod gatekeeper;
