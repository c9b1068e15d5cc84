pub mod availability;
pub mod booking;
pub mod conflict;
pub mod lifecycle;

pub use availability::AvailabilityEngine;
pub use booking::BookingService;
pub use conflict::BookingValidator;
pub use lifecycle::AppointmentLifecycle;
