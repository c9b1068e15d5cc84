// libs/appointment-cell/src/models.rs
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    /// Local wall-clock start of the one-hour slot.
    pub appointment_time: NaiveDateTime,
    pub status: AppointmentStatus,
}

/// Stored as a small integer: 0 scheduled, 1 completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Unknown appointment status code: {0}")]
pub struct UnknownStatus(pub i16);

impl AppointmentStatus {
    pub fn code(self) -> i16 {
        match self {
            AppointmentStatus::Scheduled => 0,
            AppointmentStatus::Completed => 1,
        }
    }

    /// A completed appointment never returns to scheduled. Writing the same
    /// status again is allowed.
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        !matches!(
            (self, next),
            (AppointmentStatus::Completed, AppointmentStatus::Scheduled)
        )
    }
}

impl From<AppointmentStatus> for i16 {
    fn from(status: AppointmentStatus) -> Self {
        status.code()
    }
}

impl TryFrom<i16> for AppointmentStatus {
    type Error = UnknownStatus;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(AppointmentStatus::Scheduled),
            1 => Ok(AppointmentStatus::Completed),
            other => Err(UnknownStatus(other)),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Row to insert; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAppointment {
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub appointment_time: NaiveDateTime,
    pub status: AppointmentStatus,
}

impl NewAppointment {
    pub fn scheduled(doctor_id: Uuid, patient_id: Uuid, appointment_time: NaiveDateTime) -> Self {
        Self {
            doctor_id,
            patient_id,
            appointment_time,
            status: AppointmentStatus::Scheduled,
        }
    }
}

/// A patient's request to move or edit an existing appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateAppointment {
    pub appointment_id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_time: NaiveDateTime,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingOutcome {
    Valid,
    SlotTaken,
    DoctorNotFound,
}

// ==============================================================================
// REQUEST / RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub slots: Vec<NaiveTime>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DoctorDayQuery {
    pub patient_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateSlotQuery {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateSlotResponse {
    pub outcome: BookingOutcome,
}

#[derive(Debug, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    pub appointment_time: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub doctor_id: Uuid,
    pub appointment_time: NaiveDateTime,
    #[serde(default)]
    pub status: AppointmentStatus,
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: AppointmentStatus,
}
