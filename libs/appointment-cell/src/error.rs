use thiserror::Error;

use shared_database::DbError;
use shared_models::error::AppError;

use crate::models::AppointmentStatus;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    /// The caller does not own the appointment.
    #[error("Not authorized to modify this appointment")]
    Unauthorized,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Selected slot is not available")]
    SlotTaken,

    #[error("Cannot change status from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl From<DbError> for AppointmentError {
    fn from(err: DbError) -> Self {
        match err {
            // Lost a race for the same (doctor, time) pair.
            DbError::UniqueViolation(_) => AppointmentError::SlotTaken,
            // The doctor row went away after validation.
            DbError::ForeignKeyViolation(ref message) if message.contains("doctor_id") => {
                AppointmentError::DoctorNotFound
            }
            other => AppointmentError::Persistence(other.to_string()),
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        let message = err.to_string();
        match err {
            AppointmentError::NotFound => AppError::NotFound(message),
            AppointmentError::Unauthorized => AppError::Forbidden(message),
            AppointmentError::DoctorNotFound => AppError::BadRequest(message),
            AppointmentError::SlotTaken => AppError::Conflict(message),
            AppointmentError::InvalidStatusTransition { .. } => AppError::Unprocessable(message),
            AppointmentError::Persistence(_) => AppError::Database(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::StatusCode;

    #[test]
    fn test_unique_violation_becomes_slot_taken() {
        let err: AppointmentError = DbError::UniqueViolation("duplicate key".to_string()).into();
        assert_eq!(err, AppointmentError::SlotTaken);

        let err: AppointmentError = DbError::Api {
            status: 503,
            message: "down".to_string(),
        }
        .into();
        assert_matches!(err, AppointmentError::Persistence(_));
    }

    #[test]
    fn test_foreign_key_violation_is_not_slot_taken() {
        let err: AppointmentError = DbError::ForeignKeyViolation(
            r#"{"code":"23503","details":"Key (doctor_id)=(42) is not present in table \"doctors\"."}"#.to_string(),
        )
        .into();
        assert_eq!(err, AppointmentError::DoctorNotFound);

        let err: AppointmentError = DbError::ForeignKeyViolation(
            r#"{"code":"23503","details":"Key (patient_id)=(7) is not present in table \"patients\"."}"#.to_string(),
        )
        .into();
        assert_matches!(err, AppointmentError::Persistence(_));
    }

    #[test]
    fn test_http_status_mapping() {
        let cases = [
            (AppointmentError::NotFound, StatusCode::NOT_FOUND),
            (AppointmentError::Unauthorized, StatusCode::FORBIDDEN),
            (AppointmentError::DoctorNotFound, StatusCode::BAD_REQUEST),
            (AppointmentError::SlotTaken, StatusCode::CONFLICT),
            (
                AppointmentError::InvalidStatusTransition {
                    from: AppointmentStatus::Completed,
                    to: AppointmentStatus::Scheduled,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppointmentError::Persistence("x".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }
}
