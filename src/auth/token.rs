use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: i64,
    /// Email address of the user at the time the token was issued.
    pub email: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issues a signed HS256 token for a user.
///
/// The token expires `ttl_hours` after issuance.
pub fn generate_token(
    user_id: i64,
    email: &str,
    secret: &str,
    ttl_hours: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(ttl_hours))
        .ok_or_else(|| AppError::InternalServerError("Token expiry overflow".into()))?;

    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        iat: now.timestamp(),
        exp: expiration.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies a token's signature and expiry and returns its claims.
///
/// Any failure (malformed, bad signature, expired) maps to `AppError::Unauthorized`.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?
    .claims;
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_for_tokens";

    #[test]
    fn test_token_generation_and_verification() {
        let token = generate_token(1, "jean@example.com", SECRET, 24).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, 1);
        assert_eq!(claims.email, "jean@example.com");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_token_expiration() {
        let issued = Utc::now() - Duration::hours(26);
        let claims = Claims {
            sub: 2,
            email: "old@example.com".into(),
            iat: issued.timestamp(),
            exp: (issued + Duration::hours(24)).timestamp(),
        };
        let expired_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        match verify_token(&expired_token, SECRET) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid token"),
            other => panic!("expired token should be rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_token_signature() {
        let token = generate_token(3, "x@example.com", "a_completely_different_secret", 24)
            .unwrap();

        assert!(matches!(
            verify_token(&token, SECRET),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_garbage_token() {
        assert!(matches!(
            verify_token("not.a.jwt", SECRET),
            Err(AppError::Unauthorized(_))
        ));
    }
}
