//! Geofence evaluation: is a point inside the active zone?

use crate::db::queries::active_geofence;
use crate::errors::AppResult;
use crate::models::coordinates::Coordinates;
use crate::models::geofence::{GeofenceCheck, GeofenceSetting};
use rusqlite::Connection;

/// Mean earth radius used by the spherical model, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two points (haversine formula).
pub fn haversine_distance(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Evaluate `point` against a given setting. The boundary is inclusive.
pub fn evaluate(point: Coordinates, setting: &GeofenceSetting) -> GeofenceCheck {
    let distance = haversine_distance(point, setting.center);
    GeofenceCheck {
        inside: distance <= setting.radius_meters,
        distance_m: Some(distance),
        radius_m: Some(setting.radius_meters),
    }
}

pub struct GeofenceEvaluator;

impl GeofenceEvaluator {
    /// Evaluate `point` against the active geofence.
    ///
    /// Without an active setting every point is inside: a missing configuration
    /// must not lock every user out.
    pub fn check(conn: &Connection, point: Coordinates) -> AppResult<GeofenceCheck> {
        match active_geofence(conn)? {
            Some(setting) => Ok(evaluate(point, &setting)),
            None => Ok(GeofenceCheck::open()),
        }
    }

    pub fn is_within_geofence(conn: &Connection, lat: f64, lng: f64) -> AppResult<bool> {
        let point = Coordinates::new(lat, lng)?;
        Ok(Self::check(conn, point)?.inside)
    }
}
