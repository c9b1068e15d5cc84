use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use shared_database::DbError;
use shared_models::auth::Role;

use crate::models::IdentityRecord;
use crate::store::IdentityStore;

/// In-process identity store for local runs and tests.
#[derive(Default)]
pub struct MemoryIdentityStore {
    identities: RwLock<HashMap<(Role, String), IdentityRecord>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(mut self, role: Role, record: IdentityRecord) -> Self {
        self.identities
            .get_mut()
            .insert((role, record.identifier.clone()), record);
        self
    }

    pub async fn insert(&self, role: Role, record: IdentityRecord) {
        self.identities
            .write()
            .await
            .insert((role, record.identifier.clone()), record);
    }

    pub async fn remove(&self, role: Role, identifier: &str) -> Option<IdentityRecord> {
        self.identities
            .write()
            .await
            .remove(&(role, identifier.to_string()))
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_identity(&self, role: Role, identifier: &str) -> Result<Option<IdentityRecord>, DbError> {
        Ok(self
            .identities
            .read()
            .await
            .get(&(role, identifier.to_string()))
            .cloned())
    }
}
