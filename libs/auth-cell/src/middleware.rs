use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::extractor::extract_bearer_token;

use crate::services::AuthService;

// Role guards: verify the bearer token, confirm the subject under the role,
// and hand the resulting Principal to handlers through request extensions.

/// Any verified admin, doctor or patient.
pub async fn require_any_role(
    State(auth): State<Arc<AuthService>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers())?;
    let principal = auth.verify_any_role(&token).await?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

pub async fn require_doctor(
    State(auth): State<Arc<AuthService>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&auth, Role::Doctor, request, next).await
}

pub async fn require_patient(
    State(auth): State<Arc<AuthService>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&auth, Role::Patient, request, next).await
}

async fn authorize(
    auth: &AuthService,
    role: Role,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers())?;
    let principal = auth.verify_for_role(&token, role).await?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
