use crate::errors::{AppError, AppResult};
use crate::models::attendance_event::{AttendanceEvent, NewAttendanceEvent};
use crate::models::attendance_status::AttendanceStatus;
use crate::models::coordinates::Coordinates;
use crate::models::geofence::GeofenceSetting;
use crate::models::session::Session;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

/// SQL fragment for "now" in the same format as the `created_at` defaults,
/// so that timestamps compare correctly as text.
const SQL_NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ','now')";

// ------------------------------------------------
// attendance_records
// ------------------------------------------------

pub fn map_event_row(row: &Row) -> Result<AttendanceEvent> {
    let status_str: String = row.get("status")?;
    let status = AttendanceStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidStatus(status_str.clone())),
        )
    })?;

    // device_info is opaque: keep unparsable payloads as plain strings
    let device_raw: String = row.get("device_info")?;
    let device_info = serde_json::from_str(&device_raw)
        .unwrap_or_else(|_| serde_json::Value::String(device_raw.clone()));

    Ok(AttendanceEvent {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        status,
        location: Coordinates {
            lat: row.get("location_lat")?,
            lng: row.get("location_lng")?,
        },
        device_info,
        is_within_geofence: row.get::<_, i32>("is_within_geofence")? == 1,
        created_at: row.get("created_at")?,
    })
}

/// Insert an event and return it as stored (id and timestamp assigned by SQLite).
pub fn insert_attendance_event(conn: &Connection, ev: &NewAttendanceEvent) -> AppResult<AttendanceEvent> {
    let device_json = serde_json::to_string(&ev.device_info)?;

    conn.execute(
        "INSERT INTO attendance_records
            (user_id, status, location_lat, location_lng, device_info, is_within_geofence)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            ev.user_id,
            ev.status.to_db_str(),
            ev.location.lat,
            ev.location.lng,
            device_json,
            if ev.is_within_geofence { 1 } else { 0 },
        ],
    )?;

    let id = conn.last_insert_rowid();
    let stored = conn.query_row(
        "SELECT * FROM attendance_records WHERE id = ?1",
        [id],
        map_event_row,
    )?;
    Ok(stored)
}

/// Most recent event of a user. Insert order is the authoritative timeline.
pub fn latest_event_for_user(conn: &Connection, user_id: &str) -> AppResult<Option<AttendanceEvent>> {
    let ev = conn
        .query_row(
            "SELECT * FROM attendance_records
             WHERE user_id = ?1
             ORDER BY id DESC
             LIMIT 1",
            [user_id],
            map_event_row,
        )
        .optional()?;
    Ok(ev)
}

/// Events of a user, oldest first. With `limit`, only the newest `limit` events.
pub fn load_events_for_user(
    conn: &Connection,
    user_id: &str,
    limit: Option<usize>,
) -> AppResult<Vec<AttendanceEvent>> {
    let limit = limit.map(|l| l as i64).unwrap_or(-1);

    let mut stmt = conn.prepare(
        "SELECT * FROM (
            SELECT * FROM attendance_records
            WHERE user_id = ?1
            ORDER BY id DESC
            LIMIT ?2
         ) ORDER BY id ASC",
    )?;

    let rows = stmt.query_map(params![user_id, limit], map_event_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_events_for_user(conn: &Connection, user_id: &str) -> AppResult<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM attendance_records WHERE user_id = ?1",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(n)
}

/// Every user that owns at least one event, sorted.
pub fn distinct_users(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT DISTINCT user_id FROM attendance_records ORDER BY user_id ASC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ------------------------------------------------
// geofence_settings
// ------------------------------------------------

fn map_geofence_row(row: &Row) -> Result<GeofenceSetting> {
    Ok(GeofenceSetting {
        id: row.get("id")?,
        label: row.get("label")?,
        center: Coordinates {
            lat: row.get("center_lat")?,
            lng: row.get("center_lng")?,
        },
        radius_meters: row.get("radius_meters")?,
        is_active: row.get::<_, i32>("is_active")? == 1,
        created_at: row.get("created_at")?,
    })
}

/// The single active geofence, if any.
pub fn active_geofence(conn: &Connection) -> AppResult<Option<GeofenceSetting>> {
    let g = conn
        .query_row(
            "SELECT * FROM geofence_settings WHERE is_active = 1",
            [],
            map_geofence_row,
        )
        .optional()?;
    Ok(g)
}

/// Deactivate the current zone and activate a new one atomically.
pub fn replace_active_geofence(
    conn: &mut Connection,
    label: &str,
    center: Coordinates,
    radius_meters: f64,
) -> AppResult<GeofenceSetting> {
    let tx = conn.transaction()?;

    tx.execute("UPDATE geofence_settings SET is_active = 0 WHERE is_active = 1", [])?;
    tx.execute(
        "INSERT INTO geofence_settings (label, center_lat, center_lng, radius_meters, is_active)
         VALUES (?1, ?2, ?3, ?4, 1)",
        params![label, center.lat, center.lng, radius_meters],
    )?;

    let id = tx.last_insert_rowid();
    let stored = tx.query_row(
        "SELECT * FROM geofence_settings WHERE id = ?1",
        [id],
        map_geofence_row,
    )?;

    tx.commit()?;
    Ok(stored)
}

/// Deactivate every zone. Returns the number of rows changed.
pub fn disable_geofences(conn: &Connection) -> AppResult<usize> {
    let n = conn.execute("UPDATE geofence_settings SET is_active = 0 WHERE is_active = 1", [])?;
    Ok(n)
}

// ------------------------------------------------
// sessions
// ------------------------------------------------

fn map_session_row(row: &Row) -> Result<Session> {
    Ok(Session {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        created_at: row.get("created_at")?,
        expires_at: row.get("expires_at")?,
    })
}

/// Start a session for `user_id`, revoking any other active session.
pub fn create_session(conn: &mut Connection, user_id: &str, ttl_hours: i64) -> AppResult<Session> {
    let tx = conn.transaction()?;

    tx.execute(
        &format!("UPDATE sessions SET revoked_at = {SQL_NOW} WHERE revoked_at IS NULL"),
        [],
    )?;

    let modifier = format!("+{} hours", ttl_hours);
    tx.execute(
        "INSERT INTO sessions (user_id, expires_at)
         VALUES (?1, strftime('%Y-%m-%dT%H:%M:%fZ', 'now', ?2))",
        params![user_id, modifier],
    )?;

    let id = tx.last_insert_rowid();
    let session = tx.query_row("SELECT * FROM sessions WHERE id = ?1", [id], map_session_row)?;

    tx.commit()?;
    Ok(session)
}

/// The most recent session that is neither revoked nor expired.
pub fn active_session(conn: &Connection) -> AppResult<Option<Session>> {
    let s = conn
        .query_row(
            &format!(
                "SELECT * FROM sessions
                 WHERE revoked_at IS NULL AND expires_at > {SQL_NOW}
                 ORDER BY id DESC
                 LIMIT 1"
            ),
            [],
            map_session_row,
        )
        .optional()?;
    Ok(s)
}

/// Revoke every active session. Returns the number of sessions closed.
pub fn revoke_sessions(conn: &Connection) -> AppResult<usize> {
    let n = conn.execute(
        &format!("UPDATE sessions SET revoked_at = {SQL_NOW} WHERE revoked_at IS NULL"),
        [],
    )?;
    Ok(n)
}
