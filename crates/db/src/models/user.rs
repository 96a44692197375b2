//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sourcedesk_core::roles;
use sourcedesk_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// Role granted to a user. Gates destructive and bulk project operations
/// (admin, manager) and user management (admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    User,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => roles::ROLE_ADMIN,
            UserRole::Manager => roles::ROLE_MANAGER,
            UserRole::User => roles::ROLE_USER,
        }
    }
}

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for creating a new user. The password is already hashed by the
/// caller; repositories never see plaintext credentials.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub role: Option<UserRole>,
}
