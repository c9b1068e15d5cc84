use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use shared_database::DbError;

use crate::models::Doctor;
use crate::store::DoctorStore;

#[derive(Default)]
pub struct MemoryDoctorStore {
    doctors: RwLock<HashMap<Uuid, Doctor>>,
}

impl MemoryDoctorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_doctor(mut self, doctor: Doctor) -> Self {
        self.doctors.get_mut().insert(doctor.id, doctor);
        self
    }

    pub async fn insert(&self, doctor: Doctor) {
        self.doctors.write().await.insert(doctor.id, doctor);
    }
}

#[async_trait]
impl DoctorStore for MemoryDoctorStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>, DbError> {
        Ok(self.doctors.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Doctor>, DbError> {
        Ok(self
            .doctors
            .read()
            .await
            .values()
            .find(|doctor| doctor.email == email)
            .cloned())
    }
}
