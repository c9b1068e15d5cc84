use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use shared_database::DbError;

use crate::models::{Appointment, AppointmentStatus, NewAppointment};

pub mod memory;
pub mod supabase;

pub use memory::MemoryAppointmentStore;
pub use supabase::SupabaseAppointmentStore;

/// Persistence for appointments.
///
/// Implementations must reject a second row for the same
/// `(doctor_id, appointment_time)` with [`DbError::UniqueViolation`], on both
/// insert and update. That rejection is what keeps two racing bookings from
/// both landing.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, DbError>;

    /// Appointments for one doctor with `start <= appointment_time < end`,
    /// ordered by time.
    async fn find_by_doctor_and_range(
        &self,
        doctor_id: Uuid,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Appointment>, DbError>;

    /// Same window, keeping only appointments whose patient name contains
    /// `patient_name`, ignoring case.
    async fn find_by_doctor_range_and_patient_name(
        &self,
        doctor_id: Uuid,
        start: NaiveDateTime,
        end: NaiveDateTime,
        patient_name: &str,
    ) -> Result<Vec<Appointment>, DbError>;

    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment, DbError>;

    /// Overwrites doctor, time and status if the stored status is still
    /// `expected`. Returns false when no row matched.
    async fn update(&self, appointment: &Appointment, expected: AppointmentStatus) -> Result<bool, DbError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DbError>;

    /// Compare-and-set on the status column.
    async fn update_status(
        &self,
        id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<bool, DbError>;
}
