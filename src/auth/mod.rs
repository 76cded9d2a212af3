pub mod extractors;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

/// Secrets and work factors shared by the handlers that hash passwords or sign tokens.
///
/// Registered once as `web::Data<AuthSettings>`.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
}

/// Represents the payload for a user login request.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User's email address.
    #[validate(email)]
    #[schema(example = "jean@example.com")]
    pub email: String,
    /// User's password, 6 to 100 characters.
    #[validate(length(min = 6, max = 100))]
    #[schema(example = "password123")]
    pub password: String,
}

/// Returned on successful login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Bearer token carrying the user's id and email.
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_login_request_validation() {
        let valid_login = LoginRequest {
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid_login.validate().is_ok());

        let invalid_email_login = LoginRequest {
            email: "testexample.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(invalid_email_login.validate().is_err());

        let short_password_login = LoginRequest {
            email: "test@example.com".to_string(),
            password: "123".to_string(),
        };
        assert!(short_password_login.validate().is_err());

        let long_password_login = LoginRequest {
            email: "test@example.com".to_string(),
            password: "p".repeat(101),
        };
        assert!(long_password_login.validate().is_err());
    }
}
