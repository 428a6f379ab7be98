use super::coordinates::Coordinates;
use serde::Serialize;

/// Row of `geofence_settings`: a circular zone around `center`.
#[derive(Debug, Clone, Serialize)]
pub struct GeofenceSetting {
    pub id: i64,
    pub label: String,
    pub center: Coordinates,
    pub radius_meters: f64,
    pub is_active: bool,
    pub created_at: String,
}

/// Outcome of evaluating one point against the active geofence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofenceCheck {
    pub inside: bool,
    /// Distance from the zone center; `None` when no geofence is active.
    pub distance_m: Option<f64>,
    pub radius_m: Option<f64>,
}

impl GeofenceCheck {
    /// Result used when no active setting exists.
    pub fn open() -> Self {
        Self {
            inside: true,
            distance_m: None,
            radius_m: None,
        }
    }
}
