use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{DbError, SupabaseClient};
use shared_models::auth::Role;

use crate::models::IdentityRecord;
use crate::store::IdentityStore;

pub struct SupabaseIdentityStore {
    supabase: SupabaseClient,
}

impl SupabaseIdentityStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    fn table_and_column(role: Role) -> (&'static str, &'static str) {
        match role {
            Role::Admin => ("admins", "username"),
            Role::Doctor => ("doctors", "email"),
            Role::Patient => ("patients", "email"),
        }
    }
}

#[async_trait]
impl IdentityStore for SupabaseIdentityStore {
    async fn find_identity(&self, role: Role, identifier: &str) -> Result<Option<IdentityRecord>, DbError> {
        let (table, column) = Self::table_and_column(role);
        debug!("Looking up {} identity in {}", role, table);

        let path = format!(
            "/rest/v1/{}?{}=eq.{}&select=id,identifier:{},password_hash&limit=1",
            table,
            column,
            urlencoding::encode(identifier),
            column
        );

        let mut rows: Vec<IdentityRecord> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.pop())
    }
}
