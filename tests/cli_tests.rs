mod common;
use common::{geo, setup_test_db, temp_out};
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;

fn init(name: &str) -> String {
    let db_path = setup_test_db(name);
    geo(name)
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("initialization completed"));
    db_path
}

fn run(name: &str, db_path: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut full = vec!["--db", db_path];
    full.extend_from_slice(args);
    geo(name).args(full).assert()
}

#[test]
fn test_status_requires_login() {
    let name = "cli_status_requires_login";
    let db_path = init(name);

    run(name, &db_path, &["status"])
        .failure()
        .stderr(contains("No active session"))
        .stderr(contains("geoclock login"));

    run(name, &db_path, &["clock", "--at", "10,10"])
        .failure()
        .stderr(contains("No active session"));
}

#[test]
fn test_clock_in_inside_and_rejected_outside() {
    let name = "cli_clock_geofence";
    let db_path = init(name);

    run(name, &db_path, &["geofence", "--set", "10,10", "--radius", "100", "--label", "HQ"])
        .success()
        .stdout(contains("Geofence updated"));

    run(name, &db_path, &["login", "alice"])
        .success()
        .stdout(contains("Logged in as 'alice'"))
        .stdout(contains("clocked out"));

    run(name, &db_path, &["clock", "--at", "10,10"])
        .success()
        .stdout(contains("Clocked in"));

    run(name, &db_path, &["status"])
        .success()
        .stdout(contains("clocked in"))
        .stdout(contains("Clock Out"));

    run(name, &db_path, &["clock", "--at", "10.01,10.01"])
        .failure()
        .stderr(contains("outside the allowed area"));

    run(name, &db_path, &["history"])
        .success()
        .stdout(contains("clock_in"))
        .stdout(contains("clock_out").not());

    run(name, &db_path, &["clock", "--at", "10.0001,9.9999"])
        .success()
        .stdout(contains("Clocked out"));

    run(name, &db_path, &["db", "--check"])
        .success()
        .stdout(contains("alternate correctly"));
}

#[test]
fn test_clock_without_location_source_fails() {
    let name = "cli_clock_no_location";
    let db_path = init(name);

    run(name, &db_path, &["login", "bob"]).success();

    run(name, &db_path, &["clock"])
        .failure()
        .stderr(contains("not available"))
        .stderr(contains("--at"));

    run(name, &db_path, &["clock", "--at", "95,10"])
        .failure()
        .stderr(contains("Invalid coordinates"));

    run(name, &db_path, &["history"])
        .success()
        .stdout(contains("No attendance events"));
}

#[test]
fn test_logout_ends_session() {
    let name = "cli_logout";
    let db_path = init(name);

    run(name, &db_path, &["login", "carol"]).success();
    run(name, &db_path, &["logout"]).success();
    run(name, &db_path, &["history"])
        .failure()
        .stderr(contains("No active session"));
}

#[test]
fn test_geofence_validation_and_disable() {
    let name = "cli_geofence_admin";
    let db_path = init(name);

    run(name, &db_path, &["geofence"])
        .success()
        .stdout(contains("No active geofence"));

    run(name, &db_path, &["geofence", "--set", "10,10", "--radius=-5"])
        .failure()
        .stderr(contains("Invalid geofence radius"));

    run(name, &db_path, &["geofence", "--set", "10,10", "--radius", "50"]).success();
    run(name, &db_path, &["geofence", "--show"])
        .success()
        .stdout(contains("10.000000, 10.000000"));

    run(name, &db_path, &["geofence", "--disable"])
        .success()
        .stdout(contains("Geofence disabled"));

    // with no zone, any location is accepted
    run(name, &db_path, &["login", "dave"]).success();
    run(name, &db_path, &["clock", "--at", "-33.8688,151.2093"])
        .success()
        .stdout(contains("Clocked in"));
}

#[test]
fn test_export_csv_and_json() {
    let name = "cli_export";
    let db_path = init(name);

    run(name, &db_path, &["login", "erin"]).success();
    run(name, &db_path, &["clock", "--at", "45.0,9.0"]).success();
    run(name, &db_path, &["clock", "--at", "45.0,9.0"]).success();

    let csv_out = temp_out(name, "csv");
    run(name, &db_path, &["export", "--format", "csv", "--file", &csv_out, "--force"]).success();
    let csv = fs::read_to_string(&csv_out).expect("read csv");
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("id,user_id,status"));
    assert_eq!(lines.count(), 2);
    assert!(csv.contains("clock_in") && csv.contains("clock_out"));

    let json_out = temp_out(name, "json");
    run(name, &db_path, &["export", "--format", "json", "--file", &json_out, "--force"]).success();
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_out).expect("read json")).expect("json");
    let rows = json.as_array().expect("array of events");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["status"], "clock_in");
    assert_eq!(rows[1]["status"], "clock_out");

    run(name, &db_path, &["export", "--file", "relative.csv"])
        .failure()
        .stderr(contains("absolute"));
}

#[test]
fn test_db_migrate_lists_versions() {
    let name = "cli_db_migrate";
    let db_path = init(name);

    run(name, &db_path, &["db", "--migrate"])
        .success()
        .stdout(contains("create_attendance_records"))
        .stdout(contains("attendance_alternation_trigger"));

    run(name, &db_path, &["log", "--print"])
        .success()
        .stdout(contains("migration_applied"));
}
