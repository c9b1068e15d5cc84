use std::sync::Arc;

use auth_cell::AuthService;
use doctor_cell::DoctorStore;

use crate::services::{AppointmentLifecycle, AvailabilityEngine, BookingService, BookingValidator};
use crate::store::AppointmentStore;

/// Everything the appointment routes need, wired over one pair of stores.
pub struct AppointmentState {
    pub auth: Arc<AuthService>,
    pub availability: Arc<AvailabilityEngine>,
    pub validator: Arc<BookingValidator>,
    pub lifecycle: Arc<AppointmentLifecycle>,
    pub booking: BookingService,
}

impl AppointmentState {
    pub fn new(
        auth: Arc<AuthService>,
        doctors: Arc<dyn DoctorStore>,
        appointments: Arc<dyn AppointmentStore>,
    ) -> Self {
        let availability = Arc::new(AvailabilityEngine::new(doctors, appointments.clone()));
        let validator = Arc::new(BookingValidator::new(availability.clone()));
        let lifecycle = Arc::new(AppointmentLifecycle::new(appointments, validator.clone()));
        let booking = BookingService::new(validator.clone(), lifecycle.clone());

        Self {
            auth,
            availability,
            validator,
            lifecycle,
            booking,
        }
    }
}
