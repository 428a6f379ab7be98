use super::{attendance_status::AttendanceStatus, coordinates::Coordinates};
use chrono::{DateTime, Local};
use serde::Serialize;

/// A persisted clock event.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceEvent {
    pub id: i64,                  // ⇔ attendance_records.id (insert sequence)
    pub user_id: String,          // ⇔ attendance_records.user_id
    pub status: AttendanceStatus, // ⇔ attendance_records.status ('clock_in' | 'clock_out')
    pub location: Coordinates,    // ⇔ location_lat / location_lng
    pub device_info: serde_json::Value, // ⇔ device_info (JSON text)
    pub is_within_geofence: bool, // ⇔ is_within_geofence (INT 0/1)
    pub created_at: String,       // ⇔ created_at (TEXT, RFC 3339 UTC, set by SQLite)
}

/// Fields supplied by the recorder; `id` and `created_at` come from the store.
#[derive(Debug, Clone)]
pub struct NewAttendanceEvent {
    pub user_id: String,
    pub status: AttendanceStatus,
    pub location: Coordinates,
    pub device_info: serde_json::Value,
    pub is_within_geofence: bool,
}

impl AttendanceEvent {
    /// `created_at` rendered in the local timezone, falling back to the raw text.
    pub fn local_time_str(&self) -> String {
        DateTime::parse_from_rfc3339(&self.created_at)
            .map(|dt| {
                dt.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|_| self.created_at.clone())
    }
}
