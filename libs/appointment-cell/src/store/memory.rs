use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use shared_database::DbError;

use crate::models::{Appointment, AppointmentStatus, NewAppointment};
use crate::store::AppointmentStore;

/// In-process appointment table. The slot uniqueness check and the write
/// happen under one lock, matching the database's unique index.
#[derive(Default)]
pub struct MemoryAppointmentStore {
    appointments: Mutex<HashMap<Uuid, Appointment>>,
    /// Patient names for the name-filtered day listing.
    patient_names: Mutex<HashMap<Uuid, String>>,
}

fn slot_in_use(
    appointments: &HashMap<Uuid, Appointment>,
    doctor_id: Uuid,
    time: NaiveDateTime,
    except: Option<Uuid>,
) -> bool {
    appointments.values().any(|existing| {
        existing.doctor_id == doctor_id
            && existing.appointment_time == time
            && Some(existing.id) != except
    })
}

fn duplicate_slot(doctor_id: Uuid, time: NaiveDateTime) -> DbError {
    DbError::UniqueViolation(format!(
        "Key (doctor_id, appointment_time)=({}, {}) already exists",
        doctor_id, time
    ))
}

impl MemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register_patient(&self, patient_id: Uuid, name: impl Into<String>) {
        self.patient_names.lock().await.insert(patient_id, name.into());
    }

    pub async fn len(&self) -> usize {
        self.appointments.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AppointmentStore for MemoryAppointmentStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, DbError> {
        Ok(self.appointments.lock().await.get(&id).cloned())
    }

    async fn find_by_doctor_and_range(
        &self,
        doctor_id: Uuid,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Appointment>, DbError> {
        let mut rows: Vec<Appointment> = self
            .appointments
            .lock()
            .await
            .values()
            .filter(|a| a.doctor_id == doctor_id && a.appointment_time >= start && a.appointment_time < end)
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.appointment_time);
        Ok(rows)
    }

    async fn find_by_doctor_range_and_patient_name(
        &self,
        doctor_id: Uuid,
        start: NaiveDateTime,
        end: NaiveDateTime,
        patient_name: &str,
    ) -> Result<Vec<Appointment>, DbError> {
        let needle = patient_name.to_lowercase();
        let mut rows = self.find_by_doctor_and_range(doctor_id, start, end).await?;

        let names = self.patient_names.lock().await;
        rows.retain(|a| {
            names
                .get(&a.patient_id)
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        });
        Ok(rows)
    }

    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment, DbError> {
        let mut appointments = self.appointments.lock().await;

        if slot_in_use(&appointments, appointment.doctor_id, appointment.appointment_time, None) {
            return Err(duplicate_slot(appointment.doctor_id, appointment.appointment_time));
        }

        let row = Appointment {
            id: Uuid::new_v4(),
            doctor_id: appointment.doctor_id,
            patient_id: appointment.patient_id,
            appointment_time: appointment.appointment_time,
            status: appointment.status,
        };
        appointments.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, appointment: &Appointment, expected: AppointmentStatus) -> Result<bool, DbError> {
        let mut appointments = self.appointments.lock().await;

        match appointments.get(&appointment.id) {
            Some(row) if row.status == expected => {}
            _ => return Ok(false),
        }
        if slot_in_use(
            &appointments,
            appointment.doctor_id,
            appointment.appointment_time,
            Some(appointment.id),
        ) {
            return Err(duplicate_slot(appointment.doctor_id, appointment.appointment_time));
        }

        if let Some(row) = appointments.get_mut(&appointment.id) {
            row.doctor_id = appointment.doctor_id;
            row.appointment_time = appointment.appointment_time;
            row.status = appointment.status;
        }
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        Ok(self.appointments.lock().await.remove(&id).is_some())
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<bool, DbError> {
        match self.appointments.lock().await.get_mut(&id) {
            Some(row) if row.status == from => {
                row.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
