use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::geolocation::{CommandLocation, FixedLocation, GeolocationProvider, NoLocation};
use crate::core::recorder::AttendanceRecorder;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::attendance_status::AttendanceStatus;
use crate::models::coordinates::Coordinates;
use crate::models::device_info::DeviceInfo;
use crate::ui::messages::{info, success};
use crate::utils::colors::colorize_status;
use crate::utils::format_distance;

/// Pick the location source: `--at` first, then the configured helper.
pub fn location_provider(at: Option<&str>, cfg: &Config) -> AppResult<Box<dyn GeolocationProvider>> {
    if let Some(raw) = at {
        return Ok(Box::new(FixedLocation(Coordinates::parse(raw)?)));
    }

    match &cfg.geolocation.command {
        Some(program) if !program.trim().is_empty() => Ok(Box::new(CommandLocation::new(
            program.trim(),
            cfg.geolocation.args.clone(),
        ))),
        _ => Ok(Box::new(NoLocation)),
    }
}

/// Toggle the attendance status of the logged-in user.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Clock { at } = cmd {
        let provider = location_provider(at.as_deref(), cfg)?;
        let pool = DbPool::open_initialized(&cfg.database)?;
        let device = DeviceInfo::capture(cfg.device_label.clone());

        let recorder = AttendanceRecorder::load(pool, provider, &device)?;
        let before = recorder.displayed_status();

        info(format!(
            "{} is {}: acquiring location to {}…",
            recorder.user_id(),
            colorize_status(before),
            before.action_label()
        ));

        let outcome = recorder.toggle()?;
        let ev = &outcome.event;

        println!("📍 Location : {}", ev.location);
        if let (Some(distance), Some(radius)) = (outcome.check.distance_m, outcome.check.radius_m) {
            println!(
                "🗺️  Geofence : {} from the zone center (radius {})",
                format_distance(distance),
                format_distance(radius)
            );
        }

        let verb = match ev.status {
            AttendanceStatus::ClockIn => "Clocked in",
            AttendanceStatus::ClockOut => "Clocked out",
        };
        success(format!("{} at {}.", verb, ev.local_time_str()));
    }
    Ok(())
}
