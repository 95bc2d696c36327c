//! JWT issuing and validation.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use waypoint_core::error::CoreError;
use waypoint_core::types::DbId;

/// JWT signing configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC signing secret.
    pub secret: String,
    /// Token lifetime in hours.
    pub expiry_hours: i64,
}

impl JwtConfig {
    /// Load from `JWT_SECRET` / `JWT_EXPIRY_HOURS` with dev defaults.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
        let expiry_hours: i64 = std::env::var("JWT_EXPIRY_HOURS")
            .unwrap_or_else(|_| "24".into())
            .parse()
            .expect("JWT_EXPIRY_HOURS must be a valid i64");
        Self {
            secret,
            expiry_hours,
        }
    }
}

/// Claims carried by every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The user's internal database id.
    pub sub: DbId,
    /// The user's role name.
    pub role: String,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

/// Issue a signed access token for a user.
pub fn issue_token(user_id: DbId, role: &str, config: &JwtConfig) -> Result<String, CoreError> {
    let exp = (chrono::Utc::now() + chrono::Duration::hours(config.expiry_hours)).timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| CoreError::Internal(format!("Failed to issue token: {e}")))
}

/// Validate a token's signature and expiry, returning its claims.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, CoreError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| CoreError::Unauthorized("Invalid or expired token".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-secret".into(),
            expiry_hours: 1,
        }
    }

    #[test]
    fn issued_token_round_trips() {
        let config = test_config();
        let token = issue_token(42, "member", &config).unwrap();
        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "member");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue_token(1, "admin", &test_config()).unwrap();
        let other = JwtConfig {
            secret: "different".into(),
            expiry_hours: 1,
        };
        assert!(validate_token(&token, &other).is_err());
    }
}
