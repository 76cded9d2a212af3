//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every error is rendered with the same JSON envelope:
//!
//! ```json
//! { "success": false, "message": "Not Found" }
//! ```
//!
//! Validation failures additionally carry the list of issues that caused them:
//!
//! ```json
//! { "success": false, "message": "Unprocessable Entity",
//!   "error": { "name": "ValidationError",
//!              "issues": [{ "code": "too_small", "path": ["nom"], "message": "..." }] } }
//! ```
//!
//! `AppError` implements `actix_web::error::ResponseError`, and `From` conversions for
//! `sqlx::Error`, `validator::ValidationErrors`, `jsonwebtoken::errors::Error` and
//! `bcrypt::BcryptError` allow handlers to use the `?` operator.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors};

pub const NOT_FOUND: &str = "Not Found";
pub const UNPROCESSABLE_ENTITY: &str = "Unprocessable Entity";
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Issue codes shared with API clients.
pub mod codes {
    pub const INVALID_TYPE: &str = "invalid_type";
    pub const INVALID_STRING: &str = "invalid_string";
    pub const TOO_SMALL: &str = "too_small";
    pub const TOO_BIG: &str = "too_big";
    pub const INVALID_UPDATES: &str = "invalid_updates";
    pub const CUSTOM: &str = "custom";
}

/// Issue messages shared with API clients.
pub mod messages {
    pub const REQUIRED: &str = "Required";
    pub const NO_UPDATES: &str = "No updates provided";
    pub const INVALID_EMAIL: &str = "Invalid email";
    pub const EMAIL_TAKEN: &str = "Email already in use";
    pub const EXPECTED_NUMBER: &str = "Expected number, received nan";
}

/// A single validation problem: what went wrong, and where in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Issue {
    pub code: String,
    /// Location of the offending value. Empty when the issue concerns the whole input.
    pub path: Vec<String>,
    pub message: String,
}

impl Issue {
    pub fn new(code: &str, path: &[&str], message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            path: path.iter().map(|p| p.to_string()).collect(),
            message: message.into(),
        }
    }

    /// The issue reported when a patch request carries no field to update.
    pub fn no_updates() -> Self {
        Self::new(codes::INVALID_UPDATES, &[], messages::NO_UPDATES)
    }
}

/// Details attached to validation failures.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetails {
    /// Always `"ValidationError"`.
    pub name: String,
    pub issues: Vec<Issue>,
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failed or a bearer token is missing (HTTP 401).
    Unauthorized(String),
    /// The request payload could not be read at all (HTTP 400).
    BadRequest(String),
    /// The requested row does not exist (HTTP 404).
    NotFound(String),
    /// Input failed schema validation (HTTP 422).
    Validation(Vec<Issue>),
    /// A well-formed request could not be processed, e.g. an insert returned no row (HTTP 422).
    UnprocessableEntity(String),
    /// Unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// Error originating from the database driver (HTTP 500).
    DatabaseError(String),
}

impl AppError {
    pub fn not_found() -> Self {
        AppError::NotFound(NOT_FOUND.into())
    }

    pub fn invalid_credentials() -> Self {
        AppError::Unauthorized(INVALID_CREDENTIALS.into())
    }

    fn body(&self) -> ErrorBody {
        let (message, error) = match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::UnprocessableEntity(msg) => (msg.clone(), None),
            AppError::Validation(issues) => (
                UNPROCESSABLE_ENTITY.to_string(),
                Some(ErrorDetails {
                    name: "ValidationError".into(),
                    issues: issues.clone(),
                }),
            ),
            // Internal details are logged, never returned.
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                (INTERNAL_SERVER_ERROR.to_string(), None)
            }
        };
        ErrorBody {
            success: false,
            message,
            error,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Validation(issues) => {
                let summary: Vec<String> = issues
                    .iter()
                    .map(|issue| format!("[{}] {}", issue.path.join("."), issue.message))
                    .collect();
                write!(f, "Validation Error: {}", summary.join("; "))
            }
            AppError::UnprocessableEntity(msg) => write!(f, "Unprocessable Entity: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::UnprocessableEntity(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(self.body())
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes a 404. A unique-constraint violation becomes a
/// validation issue on the offending column.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::not_found(),
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                let column = unique_violation_column(db_err.message());
                let message = if column == "email" {
                    messages::EMAIL_TAKEN.to_string()
                } else {
                    format!("{} already in use", column)
                };
                AppError::Validation(vec![Issue::new(codes::CUSTOM, &[column], message)])
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Extracts the column name from SQLite's `UNIQUE constraint failed: users.email`.
fn unique_violation_column(message: &str) -> &str {
    message
        .rsplit(':')
        .next()
        .and_then(|target| target.trim().rsplit('.').next())
        .unwrap_or("")
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`.
///
/// Issues are ordered by field name so responses are stable.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        let issues = fields
            .into_iter()
            .flat_map(|(field, errs)| errs.iter().map(move |err| issue_from(field, err)))
            .collect();
        AppError::Validation(issues)
    }
}

fn issue_from(field: &str, err: &ValidationError) -> Issue {
    match &*err.code {
        "email" => Issue::new(codes::INVALID_STRING, &[field], messages::INVALID_EMAIL),
        "length" => {
            let param = |name: &str| err.params.get(name).and_then(|v| v.as_u64());
            let len = err
                .params
                .get("value")
                .and_then(|v| v.as_str())
                .map(|s| s.chars().count() as u64);
            match (len, param("min"), param("max")) {
                (Some(len), Some(min), _) if len < min => Issue::new(
                    codes::TOO_SMALL,
                    &[field],
                    format!("String must contain at least {} character(s)", min),
                ),
                (Some(len), _, Some(max)) if len > max => Issue::new(
                    codes::TOO_BIG,
                    &[field],
                    format!("String must contain at most {} character(s)", max),
                ),
                _ => Issue::new(codes::CUSTOM, &[field], "Invalid length"),
            }
        }
        other => Issue::new(
            codes::CUSTOM,
            &[field],
            err.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| other.to_string()),
        ),
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("token rejected: {}", error);
        AppError::Unauthorized("Invalid token".into())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
