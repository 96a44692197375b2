//! Shared domain primitives for the sourcedesk backend.
//!
//! This crate holds the pieces every other crate agrees on: ID and timestamp
//! aliases, the error taxonomy, well-known role names, and the CSV rendering
//! helpers used by the analytics export. No I/O happens here.

pub mod csv;
pub mod error;
pub mod roles;
pub mod types;
