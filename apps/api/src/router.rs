use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use appointment_cell::AppointmentState;
use auth_cell::router::auth_routes;
use auth_cell::AuthService;
use shared_config::AppConfig;

use crate::stores::Stores;

pub fn create_router(config: &AppConfig, stores: Stores) -> Router {
    let auth = Arc::new(AuthService::new(config, stores.identities));
    let appointments = Arc::new(AppointmentState::new(
        auth.clone(),
        stores.doctors,
        stores.appointments,
    ));

    Router::new()
        .route("/", get(|| async { "Clinic scheduler API is running!" }))
        .nest("/auth", auth_routes(auth))
        .nest("/appointments", appointment_routes(appointments))
}
