use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{DbError, SupabaseClient};

use crate::models::Doctor;
use crate::store::DoctorStore;

// Schedule windows live in `doctor_schedules` and are embedded by PostgREST.
const DOCTOR_SELECT: &str =
    "id,name,email,specialty,password_hash,available_times:doctor_schedules(start_time,end_time)";

pub struct SupabaseDoctorStore {
    supabase: SupabaseClient,
}

impl SupabaseDoctorStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    async fn find_one(&self, filter: String) -> Result<Option<Doctor>, DbError> {
        let path = format!("/rest/v1/doctors?{}&select={}&limit=1", filter, DOCTOR_SELECT);
        let mut rows: Vec<Doctor> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.pop())
    }
}

#[async_trait]
impl DoctorStore for SupabaseDoctorStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>, DbError> {
        debug!("Fetching doctor {}", id);
        self.find_one(format!("id=eq.{}", id)).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Doctor>, DbError> {
        debug!("Fetching doctor by email");
        self.find_one(format!("email=eq.{}", urlencoding::encode(email))).await
    }
}
