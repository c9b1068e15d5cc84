use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, NaiveDateTime, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use shared_config::{AppConfig, StoreBackend};
use shared_models::auth::{Principal, Role};

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_supabase_url(url: impl Into<String>) -> Self {
        Self {
            supabase_url: url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            token_secret: self.jwt_secret.clone(),
            token_ttl_days: 7,
            store_timeout_secs: 5,
            store_backend: StoreBackend::Supabase,
            memory_seed_path: None,
            port: 3000,
        }
    }
}

pub struct TestUser {
    pub id: Uuid,
    /// Email for doctors and patients, username for admins.
    pub identity: String,
    pub role: Role,
}

impl TestUser {
    pub fn new(identity: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity: identity.to_string(),
            role,
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, Role::Doctor)
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, Role::Patient)
    }

    pub fn admin(username: &str) -> Self {
        Self::new(username, Role::Admin)
    }

    pub fn to_principal(&self) -> Principal {
        Principal {
            id: self.id,
            identity: self.identity.clone(),
            role: self.role,
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.identity,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        Self::sign(&header, &payload, secret)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }

    fn sign(header: &serde_json::Value, payload: &serde_json::Value, secret: &str) -> String {
        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn identity_response(id: Uuid, identifier: &str, password_hash: &str) -> serde_json::Value {
        json!({
            "id": id,
            "identifier": identifier,
            "password_hash": password_hash
        })
    }

    pub fn doctor_response(id: Uuid, email: &str, windows: &[(&str, &str)]) -> serde_json::Value {
        let available_times: Vec<serde_json::Value> = windows
            .iter()
            .map(|(start, end)| json!({ "start_time": start, "end_time": end }))
            .collect();

        json!({
            "id": id,
            "name": "Dr. Test",
            "email": email,
            "specialty": "General Practice",
            "password_hash": "",
            "available_times": available_times
        })
    }

    pub fn appointment_response(
        id: Uuid,
        doctor_id: Uuid,
        patient_id: Uuid,
        appointment_time: NaiveDateTime,
        status: i16,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "patient_id": patient_id,
            "appointment_time": appointment_time.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "status": status
        })
    }

    pub fn unique_violation_response() -> serde_json::Value {
        json!({
            "code": "23505",
            "details": "Key (doctor_id, appointment_time) already exists.",
            "hint": null,
            "message": "duplicate key value violates unique constraint \"appointments_doctor_slot_key\""
        })
    }

    pub fn foreign_key_violation_response(column: &str, table: &str) -> serde_json::Value {
        json!({
            "code": "23503",
            "details": format!("Key ({})=(00000000-0000-0000-0000-000000000000) is not present in table \"{}\".", column, table),
            "hint": null,
            "message": format!("insert or update on table \"appointments\" violates foreign key constraint \"appointments_{}_fkey\"", column)
        })
    }
}
