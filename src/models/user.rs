use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A row of the `users` table, including the password hash.
///
/// Never serialized directly; handlers convert it into [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub nom: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// The public view of a user. It has no password field at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    /// Display name.
    pub nom: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            nom: user.nom,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Body of `POST /users/register` and `POST /users`.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    /// Display name, 1 to 100 characters.
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Jean Test")]
    pub nom: String,
    #[validate(email)]
    #[schema(example = "jean@example.com")]
    pub email: String,
    /// Plain-text password, 6 to 100 characters. Stored only as a bcrypt hash.
    #[validate(length(min = 6, max = 100))]
    #[schema(example = "password123")]
    pub password: String,
}

/// Body of `PATCH /users/{id}`. Only supplied fields change.
#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct PatchUser {
    #[validate(length(min = 1, max = 100))]
    pub nom: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 6, max = 100))]
    pub password: Option<String>,
}

impl PatchUser {
    pub fn is_empty(&self) -> bool {
        self.nom.is_none() && self.email.is_none() && self.password.is_none()
    }
}
