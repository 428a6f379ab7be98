use crate::config::Config;
use crate::core::session::SessionGuard;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cfg: &Config) -> AppResult<()> {
    let pool = DbPool::open_initialized(&cfg.database)?;

    match SessionGuard::logout(&pool.conn)? {
        0 => info("No active session."),
        _ => success("Logged out."),
    }
    Ok(())
}
