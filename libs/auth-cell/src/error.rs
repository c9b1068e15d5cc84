use thiserror::Error;

use shared_models::error::AppError;
use shared_utils::jwt::InvalidToken;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Bad signature, expired, malformed, or subject missing from the claimed
    /// role's store. Deliberately undifferentiated.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Failed to issue token: {0}")]
    TokenIssue(String),
}

impl From<InvalidToken> for AuthError {
    fn from(_: InvalidToken) -> Self {
        AuthError::InvalidToken
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken | AuthError::InvalidCredentials => AppError::Auth(err.to_string()),
            AuthError::UnknownRole(_) => AppError::BadRequest(err.to_string()),
            AuthError::TokenIssue(_) => AppError::Internal(err.to_string()),
        }
    }
}
