//! Request handlers, one module per resource.

pub mod auth;
pub mod pages;
pub mod profile;
