use std::sync::Arc;

use tracing::{debug, info};

use shared_config::AppConfig;
use shared_models::auth::{Principal, Role};

use crate::error::AuthError;
use crate::services::identity::IdentityResolver;
use crate::services::password::verify_password;
use crate::services::token::TokenService;
use crate::store::IdentityStore;

/// Token verification followed by role membership: the gate in front of every
/// scheduling operation.
#[derive(Clone)]
pub struct AuthService {
    tokens: TokenService,
    resolver: IdentityResolver,
}

impl AuthService {
    pub fn new(config: &AppConfig, store: Arc<dyn IdentityStore>) -> Self {
        Self {
            tokens: TokenService::new(config),
            resolver: IdentityResolver::new(store),
        }
    }

    pub fn from_parts(tokens: TokenService, resolver: IdentityResolver) -> Self {
        Self { tokens, resolver }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub async fn verify_for_role(&self, token: &str, role: Role) -> Result<Principal, AuthError> {
        let subject = self.tokens.verify(token)?;

        let record = self
            .resolver
            .resolve(&subject, role)
            .await
            .ok_or(AuthError::InvalidToken)?;

        debug!("Token accepted for role {}", role);
        Ok(Principal {
            id: record.id,
            identity: subject,
            role,
        })
    }

    /// Accepts a token whose subject exists under any role. Roles are tried
    /// patient first, then doctor, then admin.
    pub async fn verify_any_role(&self, token: &str) -> Result<Principal, AuthError> {
        let subject = self.tokens.verify(token)?;

        for role in [Role::Patient, Role::Doctor, Role::Admin] {
            if let Some(record) = self.resolver.resolve(&subject, role).await {
                debug!("Token accepted for role {}", role);
                return Ok(Principal {
                    id: record.id,
                    identity: subject,
                    role,
                });
            }
        }

        Err(AuthError::InvalidToken)
    }

    pub async fn verify(&self, token: &str, role: Role) -> bool {
        self.verify_for_role(token, role).await.is_ok()
    }

    /// Check credentials against the role's identity store and issue a token
    /// bound to the stored identifier.
    pub async fn login(&self, role: Role, identifier: &str, password: &str) -> Result<String, AuthError> {
        if identifier.trim().is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let record = self
            .resolver
            .resolve(identifier, role)
            .await
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &record.password_hash) {
            debug!("Password mismatch for {} login", role);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(&record.identifier)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))?;

        info!("Issued {} token for identity {}", role, record.id);
        Ok(token)
    }
}
