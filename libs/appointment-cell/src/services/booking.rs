use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppointmentError;
use crate::models::{BookingOutcome, NewAppointment};
use crate::services::conflict::BookingValidator;
use crate::services::lifecycle::AppointmentLifecycle;

/// Patient booking: validate the requested slot, then create. The insert can
/// still lose a race, which surfaces as `SlotTaken` as well.
pub struct BookingService {
    validator: Arc<BookingValidator>,
    lifecycle: Arc<AppointmentLifecycle>,
}

impl BookingService {
    pub fn new(validator: Arc<BookingValidator>, lifecycle: Arc<AppointmentLifecycle>) -> Self {
        Self { validator, lifecycle }
    }

    pub async fn book(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        appointment_time: NaiveDateTime,
    ) -> Result<Uuid, AppointmentError> {
        debug!("Patient {} booking doctor {} at {}", patient_id, doctor_id, appointment_time);

        let outcome = self
            .validator
            .validate(doctor_id, appointment_time.date(), appointment_time.time())
            .await?;

        match outcome {
            BookingOutcome::Valid => {
                self.lifecycle
                    .create(NewAppointment::scheduled(doctor_id, patient_id, appointment_time))
                    .await
            }
            BookingOutcome::SlotTaken => Err(AppointmentError::SlotTaken),
            BookingOutcome::DoctorNotFound => Err(AppointmentError::DoctorNotFound),
        }
    }
}
