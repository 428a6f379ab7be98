//! Unified application error type.
//! All modules (db, core, cli, export) return AppError to keep the error
//! handling consistent and easy to manage.

use crate::core::geolocation::LocationError;
use crate::models::attendance_status::AttendanceStatus;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Storage
    // ---------------------------
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Session
    // ---------------------------
    #[error("No active session: run `geoclock login <USER>` first")]
    Unauthenticated,

    #[error("Invalid user id: {0:?}")]
    InvalidUser(String),

    // ---------------------------
    // Location / geofence
    // ---------------------------
    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    #[error(
        "You are outside the allowed area ({distance_m:.0} m from the zone center, allowed radius {radius_m:.0} m)"
    )]
    GeofenceViolation { distance_m: f64, radius_m: f64 },

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid geofence radius: {0}")]
    InvalidRadius(String),

    // ---------------------------
    // Attendance state
    // ---------------------------
    #[error("A clock action is already in progress, wait for it to finish")]
    ToggleInProgress,

    #[error(
        "Status changed elsewhere: expected {displayed}, but the last recorded event is {persisted}. Retry the action."
    )]
    StaleStatus {
        displayed: AttendanceStatus,
        persisted: AttendanceStatus,
    },

    #[error("Invalid attendance status: {0}")]
    InvalidStatus(String),

    #[error("Attendance history broken for user {user}: {detail}")]
    AlternationViolation { user: String, detail: String },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
