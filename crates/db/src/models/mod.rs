//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Enum columns are stored as TEXT and decoded through `sqlx::Type` string
//! enums, so an invalid value in the database surfaces as a decode error
//! instead of a silent fallback.

pub mod analytics;
pub mod audit;
pub mod project;
pub mod user;
