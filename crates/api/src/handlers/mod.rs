//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers validate their inputs, delegate to the corresponding repository
//! in `sourcedesk_db`, and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod analytics;
pub mod auth;
pub mod project;
pub mod user;
