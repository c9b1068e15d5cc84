use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;
use uuid::Uuid;

use doctor_cell::schedule::expand_windows;
use doctor_cell::{Doctor, DoctorStore};

use crate::error::AppointmentError;
use crate::store::AppointmentStore;

/// `[midnight, next midnight)` for a calendar date.
pub fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::MIN);
    let end = start
        .checked_add_signed(Duration::days(1))
        .unwrap_or(NaiveDateTime::MAX);
    (start, end)
}

/// Free one-hour slots for a doctor on a date: the schedule expansion minus
/// every time already held by an appointment, whatever its status.
pub struct AvailabilityEngine {
    doctors: Arc<dyn DoctorStore>,
    appointments: Arc<dyn AppointmentStore>,
}

impl AvailabilityEngine {
    pub fn new(doctors: Arc<dyn DoctorStore>, appointments: Arc<dyn AppointmentStore>) -> Self {
        Self { doctors, appointments }
    }

    pub async fn find_doctor(&self, doctor_id: Uuid) -> Result<Option<Doctor>, AppointmentError> {
        Ok(self.doctors.find_by_id(doctor_id).await?)
    }

    /// Ascending free slot times. An unknown doctor has no slots.
    pub async fn compute_slots(&self, doctor_id: Uuid, date: NaiveDate) -> Result<Vec<NaiveTime>, AppointmentError> {
        self.compute_slots_excluding(doctor_id, date, None).await
    }

    /// As [`compute_slots`](Self::compute_slots), but the excluded
    /// appointment does not occupy its own slot.
    pub async fn compute_slots_excluding(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        exclude: Option<Uuid>,
    ) -> Result<Vec<NaiveTime>, AppointmentError> {
        match self.find_doctor(doctor_id).await? {
            Some(doctor) => self.slots_for(&doctor, date, exclude).await,
            None => {
                debug!("No doctor {}, no availability", doctor_id);
                Ok(Vec::new())
            }
        }
    }

    pub async fn slots_for(
        &self,
        doctor: &Doctor,
        date: NaiveDate,
        exclude: Option<Uuid>,
    ) -> Result<Vec<NaiveTime>, AppointmentError> {
        let mut candidates = expand_windows(&doctor.available_times);
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let (start, end) = day_bounds(date);
        let booked = self
            .appointments
            .find_by_doctor_and_range(doctor.id, start, end)
            .await?;

        for appointment in booked.iter().filter(|a| Some(a.id) != exclude) {
            candidates.remove(&appointment.appointment_time.time());
        }

        debug!(
            "Doctor {} has {} free slots on {} ({} booked)",
            doctor.id,
            candidates.len(),
            date,
            booked.len()
        );
        Ok(candidates.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bounds_cover_one_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let (start, end) = day_bounds(date);

        assert_eq!(start.to_string(), "2025-03-10 00:00:00");
        assert_eq!(end.to_string(), "2025-03-11 00:00:00");
    }

    #[test]
    fn test_day_bounds_saturate_at_max_date() {
        let (start, end) = day_bounds(NaiveDate::MAX);
        assert!(end > start);
    }
}
