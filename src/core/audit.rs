use crate::db::queries::{distinct_users, load_events_for_user};
use crate::errors::{AppError, AppResult};
use crate::models::attendance_event::AttendanceEvent;
use crate::models::attendance_status::AttendanceStatus;
use rusqlite::Connection;

/// Verify that `events` (oldest first) strictly alternate, starting with a
/// clock-in after the implicit clock-out, and that none was written from
/// outside the geofence.
pub fn check_alternation(user_id: &str, events: &[AttendanceEvent]) -> AppResult<()> {
    let mut expected = AttendanceStatus::ClockOut.toggled();

    for ev in events {
        if ev.status != expected {
            return Err(AppError::AlternationViolation {
                user: user_id.to_string(),
                detail: format!(
                    "event {} at {} is {}, expected {}",
                    ev.id,
                    ev.created_at,
                    ev.status.to_db_str(),
                    expected.to_db_str()
                ),
            });
        }
        if !ev.is_within_geofence {
            return Err(AppError::AlternationViolation {
                user: user_id.to_string(),
                detail: format!("event {} was recorded outside the geofence", ev.id),
            });
        }
        expected = expected.toggled();
    }

    Ok(())
}

/// Run [`check_alternation`] for every user. Returns (users checked, failures).
pub fn audit_all(conn: &Connection) -> AppResult<(usize, Vec<AppError>)> {
    let users = distinct_users(conn)?;
    let mut failures = Vec::new();

    for user in &users {
        let events = load_events_for_user(conn, user, None)?;
        if let Err(e) = check_alternation(user, &events) {
            failures.push(e);
        }
    }

    Ok((users.len(), failures))
}
