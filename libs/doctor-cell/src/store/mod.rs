use async_trait::async_trait;
use uuid::Uuid;

use shared_database::DbError;

use crate::models::Doctor;

pub mod memory;
pub mod supabase;

pub use memory::MemoryDoctorStore;
pub use supabase::SupabaseDoctorStore;

#[async_trait]
pub trait DoctorStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>, DbError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Doctor>, DbError>;
}
