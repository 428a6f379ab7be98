use crate::config::Config;
use crate::core::session::SessionGuard;
use crate::core::status::AttendanceStateResolver;
use crate::db::pool::DbPool;
use crate::db::queries::{active_geofence, latest_event_for_user};
use crate::errors::AppResult;
use crate::utils::colors::colorize_status;
use crate::utils::format_distance;
use crate::utils::formatting::bold;

/// Show who is logged in, their status and the next available action.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let pool = DbPool::open_initialized(&cfg.database)?;

    // No attendance query before the session is confirmed.
    let session = SessionGuard::require_session(&pool.conn)?;

    let status = AttendanceStateResolver::resolve_current_status(&pool.conn, &session.user_id)?;
    let last = latest_event_for_user(&pool.conn, &session.user_id)?;

    println!("👤 User     : {}", session.user_id);
    println!("🕒 Status   : {}", colorize_status(status));
    if let Some(ev) = &last {
        println!("📍 Last     : {} at {}", ev.local_time_str(), ev.location);
    }
    match active_geofence(&pool.conn)? {
        Some(g) => println!(
            "🗺️  Geofence : {} ({}, radius {})",
            if g.label.is_empty() { "active" } else { g.label.as_str() },
            g.center,
            format_distance(g.radius_meters)
        ),
        None => println!("🗺️  Geofence : none (all locations accepted)"),
    }
    println!("\n▶ Next action: {}", bold(status.action_label()));

    Ok(())
}
