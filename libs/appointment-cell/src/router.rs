// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};

use auth_cell::middleware::{require_any_role, require_doctor, require_patient};

use crate::handlers;
use crate::state::AppointmentState;

pub fn appointment_routes(state: Arc<AppointmentState>) -> Router {
    let shared_routes = Router::new()
        .route("/availability/{doctor_id}", get(handlers::get_available_slots))
        .route("/validate/{doctor_id}", get(handlers::validate_slot))
        .layer(middleware::from_fn_with_state(state.auth.clone(), require_any_role));

    let patient_routes = Router::new()
        .route("/", post(handlers::book_appointment))
        .route(
            "/{appointment_id}",
            put(handlers::update_appointment).delete(handlers::cancel_appointment),
        )
        .layer(middleware::from_fn_with_state(state.auth.clone(), require_patient));

    let doctor_routes = Router::new()
        .route("/{appointment_id}/status", patch(handlers::change_status))
        .route("/doctor/{date}", get(handlers::get_doctor_appointments))
        .layer(middleware::from_fn_with_state(state.auth.clone(), require_doctor));

    Router::new()
        .merge(shared_routes)
        .merge(patient_routes)
        .merge(doctor_routes)
        .with_state(state)
}
