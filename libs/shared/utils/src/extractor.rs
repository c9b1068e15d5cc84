use axum::http::HeaderMap;
use headers::{authorization::Bearer, Authorization, HeaderMapExt};

use shared_models::error::AppError;

/// Pull the bearer token out of the `Authorization` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let Authorization(bearer) = headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| AppError::Auth("Missing or malformed authorization header".to_string()))?;

    Ok(bearer.token().to_string())
}
