use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::SessionGuard;
use crate::db::pool::DbPool;
use crate::db::queries::{count_events_for_user, load_events_for_user};
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::History { limit } = cmd {
        let pool = DbPool::open_initialized(&cfg.database)?;
        let session = SessionGuard::require_session(&pool.conn)?;

        let events = load_events_for_user(&pool.conn, &session.user_id, *limit)?;
        if events.is_empty() {
            info(format!("No attendance events for '{}'.", session.user_id));
            return Ok(());
        }

        header(format!("Attendance history for {}", session.user_id));

        let mut table = Table::new(vec![
            Column::new("ID").right(),
            Column::new("WHEN"),
            Column::new("STATUS"),
            Column::new("LOCATION"),
            Column::new("IN ZONE"),
        ]);

        for ev in &events {
            table.add_row(vec![
                ev.id.to_string(),
                ev.local_time_str(),
                ev.status.to_db_str().to_string(),
                ev.location.to_string(),
                if ev.is_within_geofence { "yes" } else { "no" }.to_string(),
            ]);
        }

        print!("{}", table.render());

        let total = count_events_for_user(&pool.conn, &session.user_id)?;
        if (events.len() as i64) < total {
            info(format!("Showing {} of {} events.", events.len(), total));
        }
    }
    Ok(())
}
