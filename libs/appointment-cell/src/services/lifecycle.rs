use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::AppointmentError;
use crate::models::{Appointment, AppointmentStatus, BookingOutcome, NewAppointment, UpdateAppointment};
use crate::services::availability::day_bounds;
use crate::services::conflict::BookingValidator;
use crate::store::AppointmentStore;

fn check_transition(from: AppointmentStatus, to: AppointmentStatus) -> Result<(), AppointmentError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(AppointmentError::InvalidStatusTransition { from, to })
    }
}

fn patient_name_filter(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|name| !name.is_empty() && !name.eq_ignore_ascii_case("null"))
}

/// Create, update, cancel and status changes for stored appointments, with
/// ownership checks for patient-initiated changes.
pub struct AppointmentLifecycle {
    store: Arc<dyn AppointmentStore>,
    validator: Arc<BookingValidator>,
}

impl AppointmentLifecycle {
    pub fn new(store: Arc<dyn AppointmentStore>, validator: Arc<BookingValidator>) -> Self {
        Self { store, validator }
    }

    /// Inserts without re-validating. A duplicate (doctor, time) comes back as
    /// `SlotTaken`.
    pub async fn create(&self, appointment: NewAppointment) -> Result<Uuid, AppointmentError> {
        let created = self.store.insert(appointment).await?;

        info!(
            "Appointment {} created for doctor {} at {}",
            created.id, created.doctor_id, created.appointment_time
        );
        Ok(created.id)
    }

    /// Moves or edits an appointment. The write is conditional on the status
    /// that was validated; if a concurrent status change lands first the
    /// checks run again against the fresh row.
    pub async fn update(&self, request: UpdateAppointment) -> Result<Appointment, AppointmentError> {
        loop {
            let current = self.owned_by(request.appointment_id, request.patient_id).await?;
            let expected = current.status;
            check_transition(expected, request.status)?;

            let outcome = self
                .validator
                .validate_excluding(
                    request.doctor_id,
                    request.appointment_time.date(),
                    request.appointment_time.time(),
                    Some(current.id),
                )
                .await?;

            match outcome {
                BookingOutcome::Valid => {}
                BookingOutcome::SlotTaken => return Err(AppointmentError::SlotTaken),
                BookingOutcome::DoctorNotFound => return Err(AppointmentError::DoctorNotFound),
            }

            let updated = Appointment {
                doctor_id: request.doctor_id,
                appointment_time: request.appointment_time,
                status: request.status,
                ..current
            };

            if self.store.update(&updated, expected).await? {
                info!("Appointment {} updated", updated.id);
                return Ok(updated);
            }
            debug!("Appointment {} changed during update, re-checking", updated.id);
        }
    }

    /// Hard delete; the slot becomes available again immediately.
    pub async fn cancel(&self, appointment_id: Uuid, patient_id: Uuid) -> Result<(), AppointmentError> {
        self.owned_by(appointment_id, patient_id).await?;

        if !self.store.delete(appointment_id).await? {
            return Err(AppointmentError::NotFound);
        }

        info!("Appointment {} cancelled", appointment_id);
        Ok(())
    }

    pub async fn change_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        loop {
            let current = self
                .store
                .find_by_id(appointment_id)
                .await?
                .ok_or(AppointmentError::NotFound)?;

            check_transition(current.status, status)?;

            if self.store.update_status(appointment_id, current.status, status).await? {
                info!("Appointment {} marked {}", appointment_id, status);
                return Ok(());
            }
            debug!("Appointment {} changed during status update, re-checking", appointment_id);
        }
    }

    /// A doctor's appointments on one date, ordered by time. A blank or
    /// `"null"` patient name means no name filter.
    pub async fn list_for_doctor_day(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        patient_name: Option<&str>,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let (start, end) = day_bounds(date);

        match patient_name_filter(patient_name) {
            Some(name) => Ok(self
                .store
                .find_by_doctor_range_and_patient_name(doctor_id, start, end, name)
                .await?),
            None => Ok(self.store.find_by_doctor_and_range(doctor_id, start, end).await?),
        }
    }

    async fn owned_by(&self, appointment_id: Uuid, patient_id: Uuid) -> Result<Appointment, AppointmentError> {
        let appointment = self
            .store
            .find_by_id(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        if appointment.patient_id != patient_id {
            warn!(
                "Patient {} attempted to modify appointment {} owned by another patient",
                patient_id, appointment_id
            );
            return Err(AppointmentError::Unauthorized);
        }

        Ok(appointment)
    }
}
