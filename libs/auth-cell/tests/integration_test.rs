use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use auth_cell::router::auth_routes;
use auth_cell::services::password::hash_password;
use auth_cell::store::MemoryIdentityStore;
use auth_cell::{AuthService, IdentityRecord};
use shared_models::auth::Role;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

fn create_test_app(store: MemoryIdentityStore) -> Router {
    let config = TestConfig::default().to_app_config();
    auth_routes(Arc::new(AuthService::new(&config, Arc::new(store))))
}

fn store_with(role: Role, identifier: &str, password: &str) -> MemoryIdentityStore {
    MemoryIdentityStore::new().with_identity(
        role,
        IdentityRecord {
            id: Uuid::new_v4(),
            identifier: identifier.to_string(),
            password_hash: hash_password(password).unwrap(),
        },
    )
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn verify_request(role: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/verify/{}", role))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_login_endpoint_issues_usable_token() {
    let app = create_test_app(store_with(Role::Patient, "patient@example.com", "pa55word"));

    let request = Request::builder()
        .method("POST")
        .uri("/login/patient")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "identifier": "patient@example.com", "password": "pa55word" }).to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json_response = body_json(response).await;
    assert_eq!(json_response["message"], "Login successful");
    assert_eq!(json_response["expires_in"], 7 * 24 * 60 * 60);
    let token = json_response["token"].as_str().unwrap().to_string();

    let response = app.oneshot(verify_request("patient", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["valid"], true);
}

#[tokio::test]
async fn test_login_endpoint_wrong_password() {
    let app = create_test_app(store_with(Role::Admin, "root", "pa55word"));

    let request = Request::builder()
        .method("POST")
        .uri("/login/admin")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "identifier": "root", "password": "guess" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_endpoint_unknown_role() {
    let app = create_test_app(MemoryIdentityStore::new());

    let request = Request::builder()
        .method("POST")
        .uri("/login/nurse")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "identifier": "x", "password": "y" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_verify_endpoint_rejects_role_mismatch() {
    let config = TestConfig::default();
    let app = create_test_app(store_with(Role::Doctor, "doctor@example.com", "pw"));

    let user = TestUser::doctor("doctor@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(24));

    let response = app.clone().oneshot(verify_request("doctor", &token)).await.unwrap();
    assert_eq!(body_json(response).await["valid"], true);

    let response = app.clone().oneshot(verify_request("patient", &token)).await.unwrap();
    assert_eq!(body_json(response).await["valid"], false);

    let response = app.oneshot(verify_request("nurse", &token)).await.unwrap();
    assert_eq!(body_json(response).await["valid"], false);
}

#[tokio::test]
async fn test_verify_endpoint_invalid_tokens() {
    let config = TestConfig::default();
    let app = create_test_app(store_with(Role::Patient, "patient@example.com", "pw"));
    let user = TestUser::patient("patient@example.com");

    let tokens = [
        JwtTestUtils::create_expired_token(&user, &config.jwt_secret),
        JwtTestUtils::create_invalid_signature_token(&user),
        JwtTestUtils::create_malformed_token(),
    ];

    for token in tokens {
        let response = app.clone().oneshot(verify_request("patient", &token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["valid"], false);
    }
}

#[tokio::test]
async fn test_verify_endpoint_missing_header() {
    let app = create_test_app(MemoryIdentityStore::new());

    let request = Request::builder()
        .method("POST")
        .uri("/verify/patient")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
