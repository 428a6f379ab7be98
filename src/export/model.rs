// src/export/model.rs

use crate::models::attendance_event::AttendanceEvent;
use serde::Serialize;

/// Flat, audit-oriented view of one attendance event.
#[derive(Serialize, Clone, Debug)]
pub struct EventExport {
    pub id: i64,
    pub user_id: String,
    pub status: String,
    pub created_at: String,
    pub location_lat: f64,
    pub location_lng: f64,
    pub is_within_geofence: bool,
    /// Raw JSON payload, kept as text so CSV stays one column.
    pub device_info: String,
}

impl From<&AttendanceEvent> for EventExport {
    fn from(ev: &AttendanceEvent) -> Self {
        Self {
            id: ev.id,
            user_id: ev.user_id.clone(),
            status: ev.status.to_db_str().to_string(),
            created_at: ev.created_at.clone(),
            location_lat: ev.location.lat,
            location_lng: ev.location.lng,
            is_within_geofence: ev.is_within_geofence,
            device_info: ev.device_info.to_string(),
        }
    }
}
