mod common;
use common::{
    FailingLocation, at, count_events, fixed, login, open_db, set_geofence, setup_test_db,
};

use geoclock::core::audit::check_alternation;
use geoclock::core::geolocation::{GeolocationProvider, LocationError, NoLocation};
use geoclock::core::recorder::AttendanceRecorder;
use geoclock::core::session::SessionGuard;
use geoclock::db::queries::load_events_for_user;
use geoclock::errors::AppError;
use geoclock::models::attendance_status::AttendanceStatus;
use geoclock::models::coordinates::Coordinates;
use geoclock::models::device_info::DeviceInfo;
use std::sync::Mutex;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

/// A device that can be moved between toggles.
struct Movable(Mutex<Coordinates>);

impl Movable {
    fn new(lat: f64, lng: f64) -> Self {
        Self(Mutex::new(at(lat, lng)))
    }

    fn move_to(&self, lat: f64, lng: f64) {
        *self.0.lock().unwrap() = at(lat, lng);
    }
}

impl GeolocationProvider for Movable {
    fn current_location(&self) -> Result<Coordinates, LocationError> {
        Ok(*self.0.lock().unwrap())
    }
}

/// Signals when a lookup starts, then blocks until released.
struct Gated {
    entered: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
    position: Coordinates,
}

impl GeolocationProvider for Gated {
    fn current_location(&self) -> Result<Coordinates, LocationError> {
        self.entered.lock().unwrap().send(()).ok();
        self.release.lock().unwrap().recv().ok();
        Ok(self.position)
    }
}

fn device() -> DeviceInfo {
    DeviceInfo::capture(Some("test bench".into()))
}

#[test]
fn test_toggle_inside_zone_records_clock_in() {
    let db_path = setup_test_db("recorder_inside");
    let mut pool = open_db(&db_path);
    set_geofence(&mut pool, 10.0, 10.0, 100.0);
    login(&mut pool, "alice");

    let recorder = AttendanceRecorder::load(pool, fixed(10.0, 10.0), &device()).unwrap();
    assert_eq!(recorder.user_id(), "alice");
    assert_eq!(recorder.displayed_status(), AttendanceStatus::ClockOut);

    let outcome = recorder.toggle().unwrap();
    assert_eq!(outcome.event.status, AttendanceStatus::ClockIn);
    assert_eq!(outcome.event.user_id, "alice");
    assert_eq!(outcome.event.location, at(10.0, 10.0));
    assert!(outcome.event.is_within_geofence);
    assert_eq!(outcome.event.device_info["label"], "test bench");
    assert_eq!(outcome.check.distance_m, Some(0.0));

    assert_eq!(recorder.displayed_status(), AttendanceStatus::ClockIn);
    assert_eq!(count_events(&db_path), 1);
}

#[test]
fn test_toggle_outside_zone_writes_nothing() {
    let db_path = setup_test_db("recorder_outside");
    let mut pool = open_db(&db_path);
    set_geofence(&mut pool, 10.0, 10.0, 100.0);
    login(&mut pool, "alice");

    let device_pos = Movable::new(10.01, 10.01);
    let recorder = AttendanceRecorder::load(pool, &device_pos, &device()).unwrap();

    let err = recorder.toggle().unwrap_err();
    match err {
        AppError::GeofenceViolation {
            distance_m,
            radius_m,
        } => {
            assert!(distance_m > 1000.0);
            assert_eq!(radius_m, 100.0);
        }
        other => panic!("expected geofence violation, got {other:?}"),
    }
    assert_eq!(recorder.displayed_status(), AttendanceStatus::ClockOut);
    assert_eq!(count_events(&db_path), 0);

    // clock in from inside, then try to clock out after leaving
    device_pos.move_to(10.0, 10.0);
    recorder.toggle().unwrap();
    assert_eq!(count_events(&db_path), 1);

    device_pos.move_to(10.01, 10.01);
    assert!(matches!(
        recorder.toggle(),
        Err(AppError::GeofenceViolation { .. })
    ));
    assert_eq!(recorder.displayed_status(), AttendanceStatus::ClockIn);
    assert_eq!(count_events(&db_path), 1);
}

#[test]
fn test_repeated_toggles_alternate() {
    let db_path = setup_test_db("recorder_alternate");
    let mut pool = open_db(&db_path);
    set_geofence(&mut pool, 45.0, 9.0, 500.0);
    login(&mut pool, "alice");

    let recorder = AttendanceRecorder::load(pool, fixed(45.001, 9.001), &device()).unwrap();

    let mut expected = AttendanceStatus::ClockIn;
    for _ in 0..7 {
        let outcome = recorder.toggle().unwrap();
        assert_eq!(outcome.event.status, expected);
        assert_eq!(recorder.displayed_status(), expected);
        expected = expected.toggled();
    }

    let check_pool = open_db(&db_path);
    let events = load_events_for_user(&check_pool.conn, "alice", None).unwrap();
    assert_eq!(events.len(), 7);
    check_alternation("alice", &events).unwrap();

    let ids: Vec<i64> = events.iter().map(|e| e.id).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_location_failures_abort_the_toggle() {
    let db_path = setup_test_db("recorder_location_failure");
    let mut pool = open_db(&db_path);
    login(&mut pool, "alice");

    let denied = LocationError::PermissionDenied("user said no".into());
    let recorder = AttendanceRecorder::load(pool, FailingLocation(denied.clone()), &device())
        .unwrap();

    match recorder.toggle() {
        Err(AppError::Location(e)) => assert_eq!(e, denied),
        other => panic!("expected location error, got {other:?}"),
    }
    assert_eq!(recorder.displayed_status(), AttendanceStatus::ClockOut);
    assert_eq!(count_events(&db_path), 0);

    let recorder = AttendanceRecorder::load(open_db(&db_path), NoLocation, &device()).unwrap();
    assert!(matches!(
        recorder.toggle(),
        Err(AppError::Location(LocationError::CapabilityUnavailable(_)))
    ));
    assert_eq!(count_events(&db_path), 0);
}

#[test]
fn test_storage_failure_leaves_status_unchanged() {
    let db_path = setup_test_db("recorder_storage_failure");
    let mut pool = open_db(&db_path);
    login(&mut pool, "alice");

    pool.conn
        .execute_batch(
            "CREATE TRIGGER reject_all BEFORE INSERT ON attendance_records
             BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
        )
        .unwrap();

    let recorder = AttendanceRecorder::load(pool, fixed(10.0, 10.0), &device()).unwrap();

    assert!(matches!(recorder.toggle(), Err(AppError::Storage(_))));
    assert_eq!(recorder.displayed_status(), AttendanceStatus::ClockOut);
    assert_eq!(count_events(&db_path), 0);
}

#[test]
fn test_session_is_rechecked_on_every_toggle() {
    let db_path = setup_test_db("recorder_session_recheck");
    let mut pool = open_db(&db_path);
    login(&mut pool, "alice");

    let recorder = AttendanceRecorder::load(pool, fixed(10.0, 10.0), &device()).unwrap();

    let mut other = open_db(&db_path);
    SessionGuard::logout(&other.conn).unwrap();

    assert!(matches!(recorder.toggle(), Err(AppError::Unauthenticated)));
    assert_eq!(count_events(&db_path), 0);

    // a session for someone else does not authorize alice's recorder
    login(&mut other, "bob");
    assert!(matches!(recorder.toggle(), Err(AppError::Unauthenticated)));
    assert_eq!(count_events(&db_path), 0);
}

#[test]
fn test_load_without_session_never_queries_status() {
    let db_path = setup_test_db("recorder_no_session");
    let pool = open_db(&db_path);

    // If the status query ran, this would surface as a storage error.
    pool.conn
        .execute_batch("DROP TABLE attendance_records;")
        .unwrap();

    let res = AttendanceRecorder::load(pool, fixed(10.0, 10.0), &device());
    assert!(matches!(res, Err(AppError::Unauthenticated)));
}

#[test]
fn test_stale_status_is_detected_and_resynced() {
    let db_path = setup_test_db("recorder_stale");
    let mut pool = open_db(&db_path);
    login(&mut pool, "alice");

    let first = AttendanceRecorder::load(pool, fixed(10.0, 10.0), &device()).unwrap();
    let second = AttendanceRecorder::load(open_db(&db_path), fixed(10.0, 10.0), &device()).unwrap();

    first.toggle().unwrap();
    assert_eq!(second.displayed_status(), AttendanceStatus::ClockOut);

    match second.toggle() {
        Err(AppError::StaleStatus {
            displayed,
            persisted,
        }) => {
            assert_eq!(displayed, AttendanceStatus::ClockOut);
            assert_eq!(persisted, AttendanceStatus::ClockIn);
        }
        other => panic!("expected stale status, got {other:?}"),
    }
    assert_eq!(second.displayed_status(), AttendanceStatus::ClockIn);
    assert_eq!(count_events(&db_path), 1);

    let retry = second.toggle().unwrap();
    assert_eq!(retry.event.status, AttendanceStatus::ClockOut);
    assert_eq!(count_events(&db_path), 2);

    assert_eq!(first.refresh().unwrap(), AttendanceStatus::ClockOut);
}

#[test]
fn test_second_toggle_while_first_in_flight_is_rejected() {
    let db_path = setup_test_db("recorder_in_flight");
    let mut pool = open_db(&db_path);
    login(&mut pool, "alice");

    let (entered_tx, entered_rx) = channel();
    let (release_tx, release_rx) = channel();
    let provider = Gated {
        entered: Mutex::new(entered_tx),
        release: Mutex::new(release_rx),
        position: at(10.0, 10.0),
    };

    let recorder = AttendanceRecorder::load(pool, provider, &device()).unwrap();

    thread::scope(|s| {
        let first = s.spawn(|| recorder.toggle());

        entered_rx.recv().unwrap();
        assert!(matches!(recorder.toggle(), Err(AppError::ToggleInProgress)));

        release_tx.send(()).unwrap();
        let outcome = first.join().unwrap().unwrap();
        assert_eq!(outcome.event.status, AttendanceStatus::ClockIn);
    });

    assert_eq!(count_events(&db_path), 1);
    assert_eq!(recorder.displayed_status(), AttendanceStatus::ClockIn);
}

#[test]
fn test_no_zone_accepts_any_location() {
    let db_path = setup_test_db("recorder_fail_open");
    let mut pool = open_db(&db_path);
    login(&mut pool, "alice");

    let recorder = AttendanceRecorder::load(pool, fixed(-33.8688, 151.2093), &device()).unwrap();
    let outcome = recorder.toggle().unwrap();

    assert!(outcome.event.is_within_geofence);
    assert_eq!(outcome.check.distance_m, None);
    assert_eq!(count_events(&db_path), 1);
}
