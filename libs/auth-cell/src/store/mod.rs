use async_trait::async_trait;

use shared_database::DbError;
use shared_models::auth::Role;

use crate::models::IdentityRecord;

pub mod memory;
pub mod supabase;

pub use memory::MemoryIdentityStore;
pub use supabase::SupabaseIdentityStore;

/// Existence lookup across the admin, doctor and patient identity stores.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_identity(&self, role: Role, identifier: &str) -> Result<Option<IdentityRecord>, DbError>;
}
