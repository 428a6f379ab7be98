use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::SessionGuard;
use crate::core::status::AttendanceStateResolver;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::colors::colorize_status;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Login { user } = cmd {
        let mut pool = DbPool::open_initialized(&cfg.database)?;

        let session = SessionGuard::login(&mut pool.conn, user, cfg.session_ttl_hours)?;
        success(format!(
            "Logged in as '{}' (session valid until {}).",
            session.user_id, session.expires_at
        ));

        let status =
            AttendanceStateResolver::resolve_current_status(&pool.conn, &session.user_id)?;
        info(format!("You are currently {}.", colorize_status(status)));
    }
    Ok(())
}
