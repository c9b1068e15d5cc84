use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use shared_config::AppConfig;
use shared_utils::jwt::{self, InvalidToken, TokenIssueError};

/// Issues and verifies the service's signed session tokens with the
/// process-wide secret.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            secret: config.token_secret.clone(),
            ttl: config.token_ttl(),
        }
    }

    pub fn issue(&self, subject: &str) -> Result<String, TokenIssueError> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: &str, issued_at: DateTime<Utc>) -> Result<String, TokenIssueError> {
        debug!("Issuing token valid for {} days", self.ttl.num_days());
        jwt::issue_token_at(subject, &self.secret, issued_at, self.ttl)
    }

    /// Returns the token's subject.
    pub fn verify(&self, token: &str) -> Result<String, InvalidToken> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, InvalidToken> {
        jwt::validate_token_at(token, &self.secret, now).map(|claims| claims.sub)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
