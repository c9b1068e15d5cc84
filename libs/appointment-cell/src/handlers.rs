// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::Principal;
use shared_models::error::AppError;

use crate::models::{
    Appointment, AvailabilityQuery, AvailabilityResponse, BookAppointmentRequest,
    ChangeStatusRequest, DoctorDayQuery, UpdateAppointment, UpdateAppointmentRequest, ValidateSlotQuery,
    ValidateSlotResponse,
};
use crate::state::AppointmentState;

// ==============================================================================
// SHARED HANDLERS
// ==============================================================================

pub async fn get_available_slots(
    State(state): State<Arc<AppointmentState>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let slots = state.availability.compute_slots(doctor_id, query.date).await?;

    Ok(Json(AvailabilityResponse {
        doctor_id,
        date: query.date,
        slots,
    }))
}

pub async fn validate_slot(
    State(state): State<Arc<AppointmentState>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<ValidateSlotQuery>,
) -> Result<Json<ValidateSlotResponse>, AppError> {
    let outcome = state
        .validator
        .validate(doctor_id, query.date, query.time)
        .await?;

    Ok(Json(ValidateSlotResponse { outcome }))
}

// ==============================================================================
// PATIENT HANDLERS
// ==============================================================================

pub async fn book_appointment(
    State(state): State<Arc<AppointmentState>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let id = state
        .booking
        .book(principal.id, request.doctor_id, request.appointment_time)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "message": "Appointment booked successfully"
        })),
    ))
}

pub async fn update_appointment(
    State(state): State<Arc<AppointmentState>>,
    Extension(principal): Extension<Principal>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    let updated = state
        .lifecycle
        .update(UpdateAppointment {
            appointment_id,
            patient_id: principal.id,
            doctor_id: request.doctor_id,
            appointment_time: request.appointment_time,
            status: request.status,
        })
        .await?;

    Ok(Json(updated))
}

pub async fn cancel_appointment(
    State(state): State<Arc<AppointmentState>>,
    Extension(principal): Extension<Principal>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.lifecycle.cancel(appointment_id, principal.id).await?;

    Ok(Json(json!({
        "message": "Appointment cancelled successfully"
    })))
}

// ==============================================================================
// DOCTOR HANDLERS
// ==============================================================================

pub async fn change_status(
    State(state): State<Arc<AppointmentState>>,
    Extension(principal): Extension<Principal>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<ChangeStatusRequest>,
) -> Result<Json<Value>, AppError> {
    debug!("Doctor {} setting appointment {} to {}", principal.id, appointment_id, request.status);

    state
        .lifecycle
        .change_status(appointment_id, request.status)
        .await?;

    Ok(Json(json!({
        "message": "Appointment status updated",
        "status": request.status
    })))
}

pub async fn get_doctor_appointments(
    State(state): State<Arc<AppointmentState>>,
    Extension(principal): Extension<Principal>,
    Path(date): Path<NaiveDate>,
    Query(query): Query<DoctorDayQuery>,
) -> Result<Json<Value>, AppError> {
    let appointments = state
        .lifecycle
        .list_for_doctor_day(principal.id, date, query.patient_name.as_deref())
        .await?;

    Ok(Json(json!({
        "date": date,
        "appointments": appointments,
        "total": appointments.len()
    })))
}
