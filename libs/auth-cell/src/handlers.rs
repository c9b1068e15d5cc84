use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::HeaderMap,
};
use tracing::debug;

use shared_models::auth::{LoginRequest, LoginResponse, Role, TokenResponse};
use shared_models::error::AppError;
use shared_utils::extractor::extract_bearer_token;

use crate::error::AuthError;
use crate::services::AuthService;

pub async fn login(
    State(auth): State<Arc<AuthService>>,
    Path(role): Path<String>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let role: Role = role
        .parse()
        .map_err(|_| AuthError::UnknownRole(role.clone()))?;
    debug!("Login attempt for role {}", role);

    let token = auth.login(role, &request.identifier, &request.password).await?;

    Ok(Json(LoginResponse {
        token,
        expires_in: auth.tokens().ttl().num_seconds(),
        message: "Login successful".to_string(),
    }))
}

pub async fn verify_token(
    State(auth): State<Arc<AuthService>>,
    Path(role): Path<String>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Verifying token");

    let token = extract_bearer_token(&headers)?;

    // Unknown roles fail closed as an invalid token.
    let valid = match role.parse::<Role>() {
        Ok(role) => auth.verify(&token, role).await,
        Err(_) => false,
    };

    Ok(Json(TokenResponse { valid }))
}
