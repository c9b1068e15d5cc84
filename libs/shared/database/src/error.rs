use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// A unique constraint rejected the write (Postgres 23505).
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// The write referenced a row that does not exist (Postgres 23503).
    #[error("Foreign key violated: {0}")]
    ForeignKeyViolation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Error body PostgREST returns for rejected statements.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    code: Option<String>,
}

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

impl DbError {
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            409 => Self::from_conflict(message),
            401 | 403 => DbError::Auth(message),
            404 => DbError::NotFound(message),
            _ => DbError::Api { status, message },
        }
    }

    // PostgREST answers 409 for several constraint classes; only the
    // Postgres error code tells them apart.
    fn from_conflict(message: String) -> Self {
        let code = serde_json::from_str::<PostgrestError>(&message)
            .ok()
            .and_then(|body| body.code);

        match code.as_deref() {
            Some(UNIQUE_VIOLATION) => DbError::UniqueViolation(message),
            Some(FOREIGN_KEY_VIOLATION) => DbError::ForeignKeyViolation(message),
            _ => DbError::Api { status: 409, message },
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation(_))
    }
}
