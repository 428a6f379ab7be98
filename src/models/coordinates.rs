use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Build a validated point: both values finite, lat in [-90, 90], lng in [-180, 180].
    pub fn new(lat: f64, lng: f64) -> AppResult<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::InvalidCoordinates(format!(
                "latitude {lat} is outside [-90, 90]"
            )));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(AppError::InvalidCoordinates(format!(
                "longitude {lng} is outside [-180, 180]"
            )));
        }
        Ok(Self { lat, lng })
    }

    /// Parse the CLI form `LAT,LNG` (spaces around the comma are allowed).
    pub fn parse(s: &str) -> AppResult<Self> {
        let (lat_str, lng_str) = s
            .split_once(',')
            .ok_or_else(|| AppError::InvalidCoordinates(format!("expected LAT,LNG, got '{s}'")))?;

        let lat = lat_str
            .trim()
            .parse::<f64>()
            .map_err(|_| AppError::InvalidCoordinates(format!("invalid latitude '{lat_str}'")))?;
        let lng = lng_str
            .trim()
            .parse::<f64>()
            .map_err(|_| AppError::InvalidCoordinates(format!("invalid longitude '{lng_str}'")))?;

        Self::new(lat, lng)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}
