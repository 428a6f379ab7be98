// src/export/logic.rs

use crate::core::session::SessionGuard;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::load_events_for_user;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::EventExport;
use crate::ui::messages::warning;
use std::path::Path;

/// High-level export of the logged-in user's attendance events.
pub struct ExportLogic;

impl ExportLogic {
    /// Export every event of the session user, oldest first.
    ///
    /// - `format`: csv | json
    /// - `file`: absolute path of the output file
    /// - `force`: overwrite without asking
    ///
    /// Returns the number of exported events.
    pub fn export(
        pool: &mut DbPool,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<usize> {
        let session = SessionGuard::require_session(&pool.conn)?;

        let path = Path::new(file);
        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        let events: Vec<EventExport> = load_events_for_user(&pool.conn, &session.user_id, None)?
            .iter()
            .map(EventExport::from)
            .collect();

        if events.is_empty() {
            warning(format!("No attendance events for user '{}'.", session.user_id));
            return Ok(0);
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => export_csv(&events, path)?,
            ExportFormat::Json => export_json(&events, path)?,
        }

        ttlog_quiet(
            &pool.conn,
            "export",
            &session.user_id,
            &format!(
                "{} events exported as {} to {}",
                events.len(),
                format.as_str(),
                path.display()
            ),
        );

        Ok(events.len())
    }
}
