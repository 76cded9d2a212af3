use crate::error::AppError;
use bcrypt::{hash, verify};

/// Hashes a password with bcrypt at the given cost.
///
/// bcrypt is CPU-bound, so the work runs on tokio's blocking pool instead of
/// stalling the actix worker.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hash(password, cost))
        .await
        .map_err(|e| AppError::InternalServerError(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

pub async fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let hashed_password = hashed_password.to_owned();
    tokio::task::spawn_blocking(move || verify(password, &hashed_password))
        .await
        .map_err(|e| AppError::InternalServerError(format!("Verification task failed: {}", e)))?
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}
