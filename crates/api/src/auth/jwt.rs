//! JWT access/refresh token generation and validation.
//!
//! Both tokens are HS256-signed JWTs carrying the same [`Claims`] payload
//! but signed with independent secrets and lifetimes: a short-lived access
//! token and a longer-lived refresh token. No token state is kept server
//! side; a refresh token stays valid until it expires or the referenced
//! user disappears, and logout is client-side discard.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sourcedesk_core::types::DbId;
use uuid::Uuid;

/// JWT claims embedded in every access and refresh token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's email at issue time.
    pub email: String,
    /// The user's role name (e.g. `"admin"`, `"manager"`, `"user"`).
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret for access tokens.
    pub access_secret: String,
    /// HMAC-SHA256 secret for refresh tokens. Must differ from
    /// `access_secret` so the two token kinds are not interchangeable.
    pub refresh_secret: String,
    /// Access token lifetime in minutes (default: 15).
    pub access_expiry_mins: i64,
    /// Refresh token lifetime in days (default: 7).
    pub refresh_expiry_days: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_REFRESH_SECRET`       | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `15`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if either secret is not set or is empty.
    pub fn from_env() -> Self {
        let access_secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!access_secret.is_empty(), "JWT_SECRET must not be empty");

        let refresh_secret = std::env::var("JWT_REFRESH_SECRET")
            .expect("JWT_REFRESH_SECRET must be set in the environment");
        assert!(
            !refresh_secret.is_empty(),
            "JWT_REFRESH_SECRET must not be empty"
        );

        let access_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let refresh_expiry_days: i64 = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        Self {
            access_secret,
            refresh_secret,
            access_expiry_mins,
            refresh_expiry_days,
        }
    }
}

/// An access + refresh token pair issued together.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Generate a fresh access + refresh token pair for the given user.
pub fn generate_token_pair(
    user_id: DbId,
    email: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<TokenPair, jsonwebtoken::errors::Error> {
    let access_token = generate_token(
        user_id,
        email,
        role,
        &config.access_secret,
        config.access_expiry_mins * 60,
    )?;
    let refresh_token = generate_token(
        user_id,
        email,
        role,
        &config.refresh_secret,
        config.refresh_expiry_days * 24 * 60 * 60,
    )?;
    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically.
pub fn validate_access_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    validate_token(token, &config.access_secret)
}

/// Validate and decode a refresh token, returning the embedded [`Claims`].
///
/// An access token presented here fails signature validation because the
/// two token kinds use different secrets.
pub fn validate_refresh_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    validate_token(token, &config.refresh_secret)
}

fn generate_token(
    user_id: DbId,
    email: &str,
    role: &str,
    secret: &str,
    lifetime_secs: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        role: role.to_string(),
        exp: now + lifetime_secs,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn validate_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    /// Helper to build a test config with known secrets.
    fn test_config() -> JwtConfig {
        JwtConfig {
            access_secret: "access-secret-long-enough-for-hmac".to_string(),
            refresh_secret: "refresh-secret-long-enough-for-hmac".to_string(),
            access_expiry_mins: 15,
            refresh_expiry_days: 7,
        }
    }

    #[test]
    fn test_generate_and_validate_pair() {
        let config = test_config();
        let pair = generate_token_pair(42, "dana@example.com", "admin", &config)
            .expect("token generation should succeed");

        let access = validate_access_token(&pair.access_token, &config)
            .expect("access validation should succeed");
        assert_eq!(access.sub, 42);
        assert_eq!(access.email, "dana@example.com");
        assert_eq!(access.role, "admin");
        assert!(access.exp > access.iat);

        let refresh = validate_refresh_token(&pair.refresh_token, &config)
            .expect("refresh validation should succeed");
        assert_eq!(refresh.sub, 42);
        assert!(
            refresh.exp > access.exp,
            "refresh token must outlive the access token"
        );
    }

    #[test]
    fn test_tokens_are_not_interchangeable() {
        let config = test_config();
        let pair = generate_token_pair(1, "a@b.c", "user", &config)
            .expect("token generation should succeed");

        assert!(
            validate_refresh_token(&pair.access_token, &config).is_err(),
            "access token must not validate as a refresh token"
        );
        assert!(
            validate_access_token(&pair.refresh_token, &config).is_err(),
            "refresh token must not validate as an access token"
        );
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Manually create an already-expired token.
        // Use a margin well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            email: "a@b.c".to_string(),
            role: "user".to_string(),
            exp: now - 300, // expired 5 minutes ago (well past leeway)
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.access_secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert_matches!(
            validate_access_token(&token, &config),
            Err(_),
            "expired token must fail validation"
        );
    }

    #[test]
    fn test_different_secrets_fail() {
        let config_a = test_config();
        let mut config_b = test_config();
        config_b.access_secret = "a-completely-different-secret".to_string();

        let pair = generate_token_pair(1, "a@b.c", "user", &config_a)
            .expect("token generation should succeed");

        assert!(
            validate_access_token(&pair.access_token, &config_b).is_err(),
            "token signed with a different secret must fail"
        );
    }
}
