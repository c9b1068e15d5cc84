use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::store::{AppointmentStore, SupabaseAppointmentStore};
use appointment_cell::{
    AppointmentError, AppointmentLifecycle, AppointmentStatus, AvailabilityEngine,
    BookingService, BookingValidator, NewAppointment,
};
use doctor_cell::store::SupabaseDoctorStore;
use shared_database::DbError;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

fn at(h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 10)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn store_for(server: &MockServer) -> SupabaseAppointmentStore {
    SupabaseAppointmentStore::new(&TestConfig::with_supabase_url(server.uri()).to_app_config())
}

#[tokio::test]
async fn test_range_query_uses_half_open_day() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let row = MockSupabaseResponses::appointment_response(Uuid::new_v4(), doctor_id, Uuid::new_v4(), at(9), 0);

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
        .and(query_param("order", "appointment_time.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let rows = store_for(&mock_server)
        .find_by_doctor_and_range(doctor_id, at(0), at(0) + chrono::Duration::days(1))
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].appointment_time, at(9));

    let requests = mock_server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default().to_string();
    assert!(query.contains("appointment_time=gte.2025-03-10T00:00:00"));
    assert!(query.contains("appointment_time=lt.2025-03-11T00:00:00"));
}

#[tokio::test]
async fn test_insert_returns_stored_row() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();
    let patient_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!({
            "doctor_id": doctor_id,
            "appointment_time": "2025-03-10T09:00:00",
            "status": 0
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::appointment_response(id, doctor_id, patient_id, at(9), 0)
        ])))
        .mount(&mock_server)
        .await;

    let created = store_for(&mock_server)
        .insert(NewAppointment::scheduled(doctor_id, patient_id, at(9)))
        .await
        .unwrap();

    assert_eq!(created.id, id);
    assert_eq!(created.status, AppointmentStatus::Scheduled);
}

#[tokio::test]
async fn test_insert_conflict_is_unique_violation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(409).set_body_json(MockSupabaseResponses::unique_violation_response()))
        .mount(&mock_server)
        .await;

    let result = store_for(&mock_server)
        .insert(NewAppointment::scheduled(Uuid::new_v4(), Uuid::new_v4(), at(9)))
        .await;

    assert_matches!(result, Err(DbError::UniqueViolation(_)));
}

#[tokio::test]
async fn test_mutations_report_whether_a_row_matched() {
    let mock_server = MockServer::start().await;
    let present = Uuid::new_v4();
    let row = MockSupabaseResponses::appointment_response(present, Uuid::new_v4(), Uuid::new_v4(), at(9), 1);

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", present)))
        .and(query_param("status", "eq.0"))
        .and(body_partial_json(json!({ "status": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row.clone()])))
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", present)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);

    assert!(store
        .update_status(present, AppointmentStatus::Scheduled, AppointmentStatus::Completed)
        .await
        .unwrap());
    assert!(store.delete(present).await.unwrap());
    assert!(!store.delete(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn test_stale_status_write_matches_no_row() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    // The row is already completed, so the status filter matches nothing.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", id)))
        .and(query_param("status", "eq.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let appointment = appointment_cell::Appointment {
        id,
        doctor_id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        appointment_time: at(11),
        status: AppointmentStatus::Scheduled,
    };

    assert!(!store.update(&appointment, AppointmentStatus::Scheduled).await.unwrap());
    assert!(!store
        .update_status(id, AppointmentStatus::Scheduled, AppointmentStatus::Completed)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_patient_name_filter_uses_embedded_ilike() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let mut row = MockSupabaseResponses::appointment_response(Uuid::new_v4(), doctor_id, Uuid::new_v4(), at(9), 0);
    row["patients"] = json!({ "name": "Alice Liddell" });

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
        .and(query_param("patients.name", "ilike.*ali ce*"))
        .and(query_param("select", "id,doctor_id,patient_id,appointment_time,status,patients!inner(name)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
        .mount(&mock_server)
        .await;

    let rows = store_for(&mock_server)
        .find_by_doctor_range_and_patient_name(doctor_id, at(0), at(23), "ali ce")
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].appointment_time, at(9));
}

#[tokio::test]
async fn test_foreign_key_conflict_is_not_slot_taken() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();
    let ghost_doctor = Uuid::new_v4();
    let ghost_patient = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({ "doctor_id": ghost_doctor })))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(MockSupabaseResponses::foreign_key_violation_response("doctor_id", "doctors")),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({ "patient_id": ghost_patient })))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(MockSupabaseResponses::foreign_key_violation_response("patient_id", "patients")),
        )
        .mount(&mock_server)
        .await;

    let store = Arc::new(SupabaseAppointmentStore::new(&config));
    let raw = store
        .insert(NewAppointment::scheduled(ghost_doctor, Uuid::new_v4(), at(9)))
        .await;
    assert_matches!(raw, Err(DbError::ForeignKeyViolation(_)));

    let engine = Arc::new(AvailabilityEngine::new(
        Arc::new(SupabaseDoctorStore::new(&config)),
        store.clone(),
    ));
    let lifecycle = AppointmentLifecycle::new(store, Arc::new(BookingValidator::new(engine)));

    assert_matches!(
        lifecycle
            .create(NewAppointment::scheduled(ghost_doctor, Uuid::new_v4(), at(9)))
            .await,
        Err(AppointmentError::DoctorNotFound)
    );
    assert_matches!(
        lifecycle
            .create(NewAppointment::scheduled(Uuid::new_v4(), ghost_patient, at(9)))
            .await,
        Err(AppointmentError::Persistence(_))
    );
}

#[tokio::test]
async fn test_lost_race_surfaces_as_slot_taken() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::doctor_response(doctor_id, "doc@clinic.test", &[("09:00:00", "12:00:00")])
        ])))
        .mount(&mock_server)
        .await;
    // The read sees a free day; the write loses to a concurrent booking.
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(409).set_body_json(MockSupabaseResponses::unique_violation_response()))
        .mount(&mock_server)
        .await;

    let appointments = Arc::new(SupabaseAppointmentStore::new(&config));
    let engine = Arc::new(AvailabilityEngine::new(
        Arc::new(SupabaseDoctorStore::new(&config)),
        appointments.clone(),
    ));
    let validator = Arc::new(BookingValidator::new(engine));
    let lifecycle = Arc::new(AppointmentLifecycle::new(appointments, validator.clone()));
    let booking = BookingService::new(validator, lifecycle);

    let result = booking.book(Uuid::new_v4(), doctor_id, at(10)).await;

    assert_matches!(result, Err(AppointmentError::SlotTaken));
}

#[tokio::test]
async fn test_store_outage_is_persistence_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();
    let engine = AvailabilityEngine::new(
        Arc::new(SupabaseDoctorStore::new(&config)),
        Arc::new(SupabaseAppointmentStore::new(&config)),
    );

    let result = engine.compute_slots(Uuid::new_v4(), at(0).date()).await;

    assert_matches!(result, Err(AppointmentError::Persistence(_)));
}
