use std::sync::Arc;

use tracing::{info, warn};

use appointment_cell::store::{AppointmentStore, MemoryAppointmentStore, SupabaseAppointmentStore};
use auth_cell::store::{IdentityStore, MemoryIdentityStore, SupabaseIdentityStore};
use doctor_cell::store::{DoctorStore, MemoryDoctorStore, SupabaseDoctorStore};
use shared_config::{AppConfig, StoreBackend};

use crate::seed;

pub struct Stores {
    pub identities: Arc<dyn IdentityStore>,
    pub doctors: Arc<dyn DoctorStore>,
    pub appointments: Arc<dyn AppointmentStore>,
}

pub async fn build(config: &AppConfig) -> anyhow::Result<Stores> {
    match config.store_backend {
        StoreBackend::Supabase => {
            info!("Using Supabase stores at {}", config.supabase_url);
            Ok(Stores {
                identities: Arc::new(SupabaseIdentityStore::new(config)),
                doctors: Arc::new(SupabaseDoctorStore::new(config)),
                appointments: Arc::new(SupabaseAppointmentStore::new(config)),
            })
        }
        StoreBackend::Memory => {
            info!("Using in-memory stores");
            let identities = MemoryIdentityStore::new();
            let doctors = MemoryDoctorStore::new();
            let appointments = MemoryAppointmentStore::new();

            match &config.memory_seed_path {
                Some(path) => {
                    let data = seed::load(path).await?;
                    data.apply(&identities, &doctors, &appointments).await?;
                }
                None => warn!("MEMORY_SEED_PATH not set; no accounts can log in"),
            }

            Ok(Stores {
                identities: Arc::new(identities),
                doctors: Arc::new(doctors),
                appointments: Arc::new(appointments),
            })
        }
    }
}
