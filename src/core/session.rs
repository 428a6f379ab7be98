use crate::db::log::ttlog_quiet;
use crate::db::queries::{active_session, create_session, revoke_sessions};
use crate::errors::{AppError, AppResult};
use crate::models::session::Session;
use rusqlite::Connection;

pub struct SessionGuard;

impl SessionGuard {
    /// Return the active session or fail with `Unauthenticated`.
    ///
    /// Callers must run this before touching attendance data.
    pub fn require_session(conn: &Connection) -> AppResult<Session> {
        active_session(conn)?.ok_or(AppError::Unauthenticated)
    }

    /// Open a new session for `user_id`; previous sessions are revoked.
    pub fn login(conn: &mut Connection, user_id: &str, ttl_hours: i64) -> AppResult<Session> {
        let user = user_id.trim();
        if user.is_empty() || user.chars().any(char::is_control) {
            return Err(AppError::InvalidUser(user_id.to_string()));
        }
        if ttl_hours <= 0 {
            return Err(AppError::Config(format!(
                "session_ttl_hours must be positive, got {ttl_hours}"
            )));
        }

        let session = create_session(conn, user, ttl_hours)?;
        ttlog_quiet(
            conn,
            "login",
            user,
            &format!("Session {} opened until {}", session.id, session.expires_at),
        );
        Ok(session)
    }

    /// Close every active session. Returns how many were closed.
    pub fn logout(conn: &Connection) -> AppResult<usize> {
        let current = active_session(conn)?;
        let n = revoke_sessions(conn)?;
        if let Some(s) = current {
            ttlog_quiet(conn, "logout", &s.user_id, &format!("Session {} closed", s.id));
        }
        Ok(n)
    }
}
