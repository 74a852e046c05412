pub mod appointments;
pub mod contact;
pub mod gallery;
pub mod health;
pub mod services;

use axum::http::HeaderMap;

use crate::errors::AppError;

/// Static bearer-credential gate for the admin panel's API.
pub(crate) fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}
