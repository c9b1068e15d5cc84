use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Method;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{DbError, SupabaseClient};

use crate::models::{Appointment, AppointmentStatus, NewAppointment};
use crate::store::AppointmentStore;

const APPOINTMENT_SELECT: &str = "id,doctor_id,patient_id,appointment_time,status";

// `timestamp without time zone` columns compare against naive literals.
fn timestamp(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S").to_string()
}

pub struct SupabaseAppointmentStore {
    supabase: SupabaseClient,
}

impl SupabaseAppointmentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    async fn mutate(&self, method: Method, filter: String, body: Option<serde_json::Value>) -> Result<bool, DbError> {
        let path = format!("/rest/v1/appointments?{}&select={}", filter, APPOINTMENT_SELECT);
        let rows: Vec<Appointment> = self
            .supabase
            .request_with_headers(method, &path, body, Some(SupabaseClient::return_representation()))
            .await?;
        Ok(!rows.is_empty())
    }
}

#[async_trait]
impl AppointmentStore for SupabaseAppointmentStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, DbError> {
        let path = format!(
            "/rest/v1/appointments?id=eq.{}&select={}&limit=1",
            id, APPOINTMENT_SELECT
        );
        let mut rows: Vec<Appointment> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.pop())
    }

    async fn find_by_doctor_and_range(
        &self,
        doctor_id: Uuid,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Appointment>, DbError> {
        debug!("Fetching appointments for doctor {} in [{}, {})", doctor_id, start, end);

        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&appointment_time=gte.{}&appointment_time=lt.{}&select={}&order=appointment_time.asc",
            doctor_id,
            timestamp(start),
            timestamp(end),
            APPOINTMENT_SELECT
        );
        self.supabase.request(Method::GET, &path, None).await
    }

    async fn find_by_doctor_range_and_patient_name(
        &self,
        doctor_id: Uuid,
        start: NaiveDateTime,
        end: NaiveDateTime,
        patient_name: &str,
    ) -> Result<Vec<Appointment>, DbError> {
        debug!("Fetching appointments for doctor {} matching patient '{}'", doctor_id, patient_name);

        // The inner join drops appointments whose patient does not match.
        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&appointment_time=gte.{}&appointment_time=lt.{}&patients.name=ilike.*{}*&select={},patients!inner(name)&order=appointment_time.asc",
            doctor_id,
            timestamp(start),
            timestamp(end),
            urlencoding::encode(patient_name),
            APPOINTMENT_SELECT
        );
        self.supabase.request(Method::GET, &path, None).await
    }

    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment, DbError> {
        let body = json!({
            "doctor_id": appointment.doctor_id,
            "patient_id": appointment.patient_id,
            "appointment_time": timestamp(appointment.appointment_time),
            "status": appointment.status.code(),
        });

        let path = format!("/rest/v1/appointments?select={}", APPOINTMENT_SELECT);
        let mut rows: Vec<Appointment> = self
            .supabase
            .request_with_headers(Method::POST, &path, Some(body), Some(SupabaseClient::return_representation()))
            .await?;

        rows.pop()
            .ok_or_else(|| DbError::NotFound("Insert returned no appointment row".to_string()))
    }

    async fn update(&self, appointment: &Appointment, expected: AppointmentStatus) -> Result<bool, DbError> {
        let body = json!({
            "doctor_id": appointment.doctor_id,
            "appointment_time": timestamp(appointment.appointment_time),
            "status": appointment.status.code(),
        });
        let filter = format!("id=eq.{}&status=eq.{}", appointment.id, expected.code());
        self.mutate(Method::PATCH, filter, Some(body)).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        self.mutate(Method::DELETE, format!("id=eq.{}", id), None).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<bool, DbError> {
        let filter = format!("id=eq.{}&status=eq.{}", id, from.code());
        self.mutate(Method::PATCH, filter, Some(json!({ "status": to.code() })))
            .await
    }
}
