use std::sync::Arc;

use axum::{
    Router,
    routing::post,
};

use crate::handlers;
use crate::services::AuthService;

pub fn auth_routes(state: Arc<AuthService>) -> Router {
    Router::new()
        .route("/login/{role}", post(handlers::login))
        .route("/verify/{role}", post(handlers::verify_token))
        .with_state(state)
}
