use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;
use uuid::Uuid;

use crate::error::AppointmentError;
use crate::models::BookingOutcome;
use crate::services::availability::AvailabilityEngine;

/// Decides whether a requested (doctor, date, time) can be booked.
///
/// This is advisory: two requests may both see `Valid`, and the store's
/// unique constraint settles which one lands.
pub struct BookingValidator {
    engine: Arc<AvailabilityEngine>,
}

impl BookingValidator {
    pub fn new(engine: Arc<AvailabilityEngine>) -> Self {
        Self { engine }
    }

    pub async fn validate(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<BookingOutcome, AppointmentError> {
        self.validate_excluding(doctor_id, date, time, None).await
    }

    /// Validation on behalf of an existing appointment, which must not block
    /// itself when it keeps or reclaims its own slot.
    pub async fn validate_excluding(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        exclude: Option<Uuid>,
    ) -> Result<BookingOutcome, AppointmentError> {
        let Some(doctor) = self.engine.find_doctor(doctor_id).await? else {
            debug!("Booking check for unknown doctor {}", doctor_id);
            return Ok(BookingOutcome::DoctorNotFound);
        };

        let slots = self.engine.slots_for(&doctor, date, exclude).await?;

        // Exact match only: 09:30 is not inside the 09:00 slot.
        if slots.contains(&time) {
            Ok(BookingOutcome::Valid)
        } else {
            debug!("Slot {} {} unavailable for doctor {}", date, time, doctor_id);
            Ok(BookingOutcome::SlotTaken)
        }
    }
}
