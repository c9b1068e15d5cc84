use std::sync::Arc;

use tracing::{debug, warn};

use shared_models::auth::Role;

use crate::models::IdentityRecord;
use crate::store::IdentityStore;

/// Maps a verified token subject to a role-scoped identity.
///
/// Tokens do not embed a role, so the same token format serves admins,
/// doctors and patients; the price is one store read per verification.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn IdentityStore>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Look up `subject` in the store for `claimed_role`. Store failures
    /// resolve to `None`.
    pub async fn resolve(&self, subject: &str, claimed_role: Role) -> Option<IdentityRecord> {
        match self.store.find_identity(claimed_role, subject).await {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                debug!("Subject not found under role {}", claimed_role);
                None
            }
            Err(e) => {
                warn!("Identity lookup failed for role {}, denying: {}", claimed_role, e);
                None
            }
        }
    }

    pub async fn resolve_role(&self, subject: &str, claimed_role: Role) -> bool {
        self.resolve(subject, claimed_role).await.is_some()
    }
}
