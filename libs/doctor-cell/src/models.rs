use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub specialty: Option<String>,
    #[serde(default, skip_serializing)]
    pub password_hash: String,
    /// Recurring availability. Applied to every date; no weekday filter.
    #[serde(default)]
    pub available_times: Vec<ScheduleWindow>,
}

/// A recurring interval of availability, time-of-day only. Rows with a
/// missing bound are tolerated and produce no slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl ScheduleWindow {
    pub fn new(start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            start_time: Some(start_time),
            end_time: Some(end_time),
        }
    }

    /// Both bounds, when present and ordered.
    pub fn bounds(&self) -> Option<(NaiveTime, NaiveTime)> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if start < end => Some((start, end)),
            _ => None,
        }
    }
}
