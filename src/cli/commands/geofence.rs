use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::{active_geofence, disable_geofences, replace_active_geofence};
use crate::errors::{AppError, AppResult};
use crate::models::coordinates::Coordinates;
use crate::models::geofence::GeofenceSetting;
use crate::ui::messages::{info, success, warning};
use crate::utils::format_distance;

fn print_setting(g: &GeofenceSetting) {
    println!("🗺️  Zone #{} {}", g.id, g.label);
    println!("   center : {}", g.center);
    println!("   radius : {}", format_distance(g.radius_meters));
    println!("   since  : {}", g.created_at);
}

/// Radius must be a finite, strictly positive number of meters.
pub fn validate_radius(radius: f64) -> AppResult<f64> {
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(AppError::InvalidRadius(format!(
            "{radius} (must be a positive number of meters)"
        )))
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Geofence {
        set,
        radius,
        label,
        show,
        disable,
    } = cmd
    {
        let mut pool = DbPool::open_initialized(&cfg.database)?;

        if let Some(center_raw) = set {
            let center = Coordinates::parse(center_raw)?;
            let radius = radius
                .ok_or_else(|| AppError::InvalidRadius("--radius is required with --set".into()))
                .and_then(validate_radius)?;
            let label = label.clone().unwrap_or_default();

            let g = replace_active_geofence(&mut pool.conn, label.trim(), center, radius)?;
            ttlog_quiet(
                &pool.conn,
                "geofence",
                &format!("zone #{}", g.id),
                &format!("Active zone set to {} radius {} m", g.center, g.radius_meters),
            );
            success("Geofence updated.");
            print_setting(&g);
        }

        if *disable {
            let n = disable_geofences(&pool.conn)?;
            if n == 0 {
                info("No active geofence to disable.");
            } else {
                ttlog_quiet(&pool.conn, "geofence", "", "Active zone disabled");
                warning("Geofence disabled: clock actions are now accepted from any location.");
            }
        }

        if *show || (set.is_none() && !*disable) {
            match active_geofence(&pool.conn)? {
                Some(g) => print_setting(&g),
                None => info("No active geofence: clock actions are accepted from any location."),
            }
        }
    }
    Ok(())
}
