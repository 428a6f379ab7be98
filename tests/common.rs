#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use geoclock::config::CONFIG_DIR_ENV;
use geoclock::core::geolocation::{FixedLocation, GeolocationProvider, LocationError};
use geoclock::core::session::SessionGuard;
use geoclock::db::pool::DbPool;
use geoclock::db::queries::replace_active_geofence;
use geoclock::models::coordinates::Coordinates;
use std::env;
use std::fs;
use std::path::PathBuf;

/// The binary, isolated from the user's real configuration directory.
pub fn geo(name: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("geoclock");
    cmd.env(CONFIG_DIR_ENV, config_dir(name));
    cmd
}

fn config_dir(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_geoclock_config", name));
    path.to_string_lossy().to_string()
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_geoclock.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    fs::remove_dir_all(config_dir(name)).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn open_db(db_path: &str) -> DbPool {
    DbPool::open_initialized(db_path).expect("open db")
}

pub fn login(pool: &mut DbPool, user: &str) {
    SessionGuard::login(&mut pool.conn, user, 12).expect("login");
}

pub fn set_geofence(pool: &mut DbPool, lat: f64, lng: f64, radius: f64) {
    replace_active_geofence(&mut pool.conn, "test zone", at(lat, lng), radius)
        .expect("set geofence");
}

pub fn at(lat: f64, lng: f64) -> Coordinates {
    Coordinates::new(lat, lng).expect("valid coordinates")
}

pub fn fixed(lat: f64, lng: f64) -> FixedLocation {
    FixedLocation(at(lat, lng))
}

/// Rows in attendance_records, read through an independent connection.
pub fn count_events(db_path: &str) -> i64 {
    let conn = rusqlite::Connection::open(db_path).expect("open db");
    conn.query_row("SELECT COUNT(*) FROM attendance_records", [], |row| row.get(0))
        .expect("count events")
}

/// A location source that always fails with the given error.
pub struct FailingLocation(pub LocationError);

impl GeolocationProvider for FailingLocation {
    fn current_location(&self) -> Result<Coordinates, LocationError> {
        Err(self.0.clone())
    }
}
