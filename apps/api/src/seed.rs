//! Accounts and schedules for the in-memory backend, read from a JSON file:
//!
//! ```json
//! {
//!   "admins":   [{ "identifier": "root", "password": "..." }],
//!   "patients": [{ "identifier": "pat@example.com", "name": "Pat Doe", "password": "..." }],
//!   "doctors":  [{ "name": "Dr. Who", "email": "who@example.com", "password": "...",
//!                  "available_times": [{ "start_time": "09:00:00", "end_time": "17:00:00" }] }]
//! }
//! ```

use anyhow::Context;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use appointment_cell::store::MemoryAppointmentStore;
use auth_cell::services::password::hash_password;
use auth_cell::store::MemoryIdentityStore;
use auth_cell::IdentityRecord;
use doctor_cell::store::MemoryDoctorStore;
use doctor_cell::{Doctor, ScheduleWindow};
use shared_models::auth::Role;

#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub admins: Vec<SeedAccount>,
    #[serde(default)]
    pub patients: Vec<SeedAccount>,
    #[serde(default)]
    pub doctors: Vec<SeedDoctor>,
}

#[derive(Debug, Deserialize)]
pub struct SeedAccount {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub identifier: String,
    /// Display name, used by the doctor's day listing filter.
    pub name: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SeedDoctor {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub specialty: Option<String>,
    pub password: String,
    #[serde(default)]
    pub available_times: Vec<ScheduleWindow>,
}

pub async fn load(path: &str) -> anyhow::Result<SeedData> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading seed file {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing seed file {}", path))
}

fn record(id: Uuid, identifier: &str, password: &str) -> anyhow::Result<IdentityRecord> {
    let password_hash =
        hash_password(password).map_err(|e| anyhow::anyhow!("hashing password for {}: {}", identifier, e))?;
    Ok(IdentityRecord {
        id,
        identifier: identifier.to_string(),
        password_hash,
    })
}

impl SeedData {
    pub async fn apply(
        self,
        identities: &MemoryIdentityStore,
        doctors: &MemoryDoctorStore,
        appointments: &MemoryAppointmentStore,
    ) -> anyhow::Result<()> {
        for account in &self.admins {
            identities
                .insert(Role::Admin, record(account.id, &account.identifier, &account.password)?)
                .await;
        }
        for account in &self.patients {
            identities
                .insert(Role::Patient, record(account.id, &account.identifier, &account.password)?)
                .await;
            if let Some(name) = &account.name {
                appointments.register_patient(account.id, name.clone()).await;
            }
        }
        for doctor in self.doctors.iter() {
            let identity = record(doctor.id, &doctor.email, &doctor.password)?;
            doctors
                .insert(Doctor {
                    id: doctor.id,
                    name: doctor.name.clone(),
                    email: doctor.email.clone(),
                    specialty: doctor.specialty.clone(),
                    password_hash: identity.password_hash.clone(),
                    available_times: doctor.available_times.clone(),
                })
                .await;
            identities.insert(Role::Doctor, identity).await;
        }

        info!(
            "Seeded {} admins, {} patients, {} doctors",
            self.admins.len(),
            self.patients.len(),
            self.doctors.len()
        );
        Ok(())
    }
}
