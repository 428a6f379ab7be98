//! Single-shot device location lookup.
//!
//! A [`GeolocationProvider`] answers one question, "where is the device now?",
//! and reports failures without retrying. The CLI picks an implementation from
//! the command line (`--at`) or the configuration (`geolocation.command`).

use crate::models::coordinates::Coordinates;
use serde_json::Value;
use std::io;
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("geolocation is not available on this device: {0}")]
    CapabilityUnavailable(String),

    #[error("location permission denied: {0}")]
    PermissionDenied(String),

    #[error("location request timed out: {0}")]
    Timeout(String),

    #[error("position unavailable: {0}")]
    PositionUnavailable(String),
}

pub trait GeolocationProvider {
    /// Fetch the current position once.
    fn current_location(&self) -> Result<Coordinates, LocationError>;
}

impl<T: GeolocationProvider + ?Sized> GeolocationProvider for Box<T> {
    fn current_location(&self) -> Result<Coordinates, LocationError> {
        (**self).current_location()
    }
}

impl<T: GeolocationProvider + ?Sized> GeolocationProvider for &T {
    fn current_location(&self) -> Result<Coordinates, LocationError> {
        (**self).current_location()
    }
}

/// A position supplied explicitly by the user.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

impl GeolocationProvider for FixedLocation {
    fn current_location(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// No location source at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl GeolocationProvider for NoLocation {
    fn current_location(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::CapabilityUnavailable(
            "no location source configured (use --at LAT,LNG or set geolocation.command)".into(),
        ))
    }
}

/// Asks an external location helper (e.g. `termux-location`, `CoreLocationCLI`).
///
/// The helper must print either `LAT,LNG`, `LAT LNG`, or a JSON object carrying
/// `latitude`/`longitude`, optionally nested under `coords`.
#[derive(Debug, Clone)]
pub struct CommandLocation {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLocation {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl GeolocationProvider for CommandLocation {
    fn current_location(&self) -> Result<Coordinates, LocationError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => LocationError::CapabilityUnavailable(format!(
                    "location helper '{}' not found",
                    self.program
                )),
                io::ErrorKind::PermissionDenied => LocationError::PermissionDenied(format!(
                    "cannot execute location helper '{}': {}",
                    self.program, e
                )),
                _ => LocationError::PositionUnavailable(e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let msg = if stderr.is_empty() {
                format!("'{}' exited with {}", self.program, output.status)
            } else {
                stderr
            };
            return Err(classify_failure(&msg));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_position(&stdout)
    }
}

/// Map a helper's failure message onto the error taxonomy; the text is kept as is.
pub fn classify_failure(msg: &str) -> LocationError {
    let lower = msg.to_lowercase();

    if lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized")
    {
        LocationError::PermissionDenied(msg.to_string())
    } else if lower.contains("timeout") || lower.contains("timed out") {
        LocationError::Timeout(msg.to_string())
    } else {
        LocationError::PositionUnavailable(msg.to_string())
    }
}

/// Parse a helper's stdout into coordinates.
pub fn parse_position(raw: &str) -> Result<Coordinates, LocationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(LocationError::PositionUnavailable(
            "location helper printed nothing".into(),
        ));
    }

    let (lat, lng) = if text.starts_with('{') {
        let json: Value = serde_json::from_str(text)
            .map_err(|e| LocationError::PositionUnavailable(format!("invalid JSON: {e}")))?;
        let coords = json.get("coords").unwrap_or(&json);

        let lat = coords.get("latitude").and_then(Value::as_f64);
        let lng = coords.get("longitude").and_then(Value::as_f64);
        match (lat, lng) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => {
                return Err(LocationError::PositionUnavailable(
                    "JSON output has no latitude/longitude".into(),
                ));
            }
        }
    } else {
        let parts: Vec<&str> = if text.contains(',') {
            text.split(',').map(str::trim).collect()
        } else {
            text.split_whitespace().collect()
        };

        match parts.as_slice() {
            [lat, lng] => {
                let lat = lat.parse::<f64>().map_err(|_| {
                    LocationError::PositionUnavailable(format!("invalid latitude '{lat}'"))
                })?;
                let lng = lng.parse::<f64>().map_err(|_| {
                    LocationError::PositionUnavailable(format!("invalid longitude '{lng}'"))
                })?;
                (lat, lng)
            }
            _ => {
                return Err(LocationError::PositionUnavailable(format!(
                    "unrecognised position '{text}'"
                )));
            }
        }
    };

    Coordinates::new(lat, lng).map_err(|e| LocationError::PositionUnavailable(e.to_string()))
}
