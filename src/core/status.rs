use crate::db::queries::latest_event_for_user;
use crate::errors::AppResult;
use crate::models::attendance_status::AttendanceStatus;
use rusqlite::Connection;

pub struct AttendanceStateResolver;

impl AttendanceStateResolver {
    /// Current status of `user_id`, taken from their latest event.
    ///
    /// A user without events is clocked out. Storage failures are returned,
    /// never turned into the default.
    pub fn resolve_current_status(conn: &Connection, user_id: &str) -> AppResult<AttendanceStatus> {
        let status = latest_event_for_user(conn, user_id)?
            .map(|ev| ev.status)
            .unwrap_or_default();
        Ok(status)
    }
}
