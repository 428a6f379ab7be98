mod common;
use common::{at, open_db, setup_test_db};

use geoclock::core::audit::{audit_all, check_alternation};
use geoclock::core::status::AttendanceStateResolver;
use geoclock::db::queries::{insert_attendance_event, latest_event_for_user, load_events_for_user};
use geoclock::errors::AppError;
use geoclock::models::attendance_event::NewAttendanceEvent;
use geoclock::models::attendance_status::AttendanceStatus;
use rusqlite::Connection;

fn record(conn: &Connection, user: &str, status: AttendanceStatus) -> Result<i64, AppError> {
    insert_attendance_event(
        conn,
        &NewAttendanceEvent {
            user_id: user.to_string(),
            status,
            location: at(10.0, 10.0),
            device_info: serde_json::json!({"user_agent": "tests"}),
            is_within_geofence: true,
        },
    )
    .map(|ev| ev.id)
}

#[test]
fn test_user_without_events_is_clocked_out() {
    let db_path = setup_test_db("status_default");
    let pool = open_db(&db_path);

    for user in ["alice", "bob", "nobody"] {
        assert_eq!(
            AttendanceStateResolver::resolve_current_status(&pool.conn, user).unwrap(),
            AttendanceStatus::ClockOut
        );
    }
}

#[test]
fn test_status_follows_latest_event() {
    let db_path = setup_test_db("status_latest");
    let pool = open_db(&db_path);

    record(&pool.conn, "alice", AttendanceStatus::ClockIn).unwrap();
    assert_eq!(
        AttendanceStateResolver::resolve_current_status(&pool.conn, "alice").unwrap(),
        AttendanceStatus::ClockIn
    );

    record(&pool.conn, "alice", AttendanceStatus::ClockOut).unwrap();
    assert_eq!(
        AttendanceStateResolver::resolve_current_status(&pool.conn, "alice").unwrap(),
        AttendanceStatus::ClockOut
    );

    let last = latest_event_for_user(&pool.conn, "alice").unwrap().unwrap();
    assert_eq!(last.status, AttendanceStatus::ClockOut);
    assert_eq!(last.device_info["user_agent"], "tests");
    assert!(last.created_at.ends_with('Z'));
}

#[test]
fn test_users_are_independent() {
    let db_path = setup_test_db("status_per_user");
    let pool = open_db(&db_path);

    record(&pool.conn, "alice", AttendanceStatus::ClockIn).unwrap();

    assert_eq!(
        AttendanceStateResolver::resolve_current_status(&pool.conn, "alice").unwrap(),
        AttendanceStatus::ClockIn
    );
    assert_eq!(
        AttendanceStateResolver::resolve_current_status(&pool.conn, "bob").unwrap(),
        AttendanceStatus::ClockOut
    );

    // bob starts his own cycle with a clock-in
    record(&pool.conn, "bob", AttendanceStatus::ClockIn).unwrap();
    record(&pool.conn, "alice", AttendanceStatus::ClockOut).unwrap();
}

#[test]
fn test_query_failure_is_not_masked_as_clocked_out() {
    let db_path = setup_test_db("status_query_failure");
    let pool = open_db(&db_path);

    pool.conn
        .execute_batch("DROP TABLE attendance_records;")
        .unwrap();

    let res = AttendanceStateResolver::resolve_current_status(&pool.conn, "alice");
    assert!(matches!(res, Err(AppError::Storage(_))), "got {res:?}");
}

#[test]
fn test_store_rejects_out_of_order_events() {
    let db_path = setup_test_db("status_trigger");
    let pool = open_db(&db_path);

    // first event must be a clock-in
    assert!(record(&pool.conn, "alice", AttendanceStatus::ClockOut).is_err());

    record(&pool.conn, "alice", AttendanceStatus::ClockIn).unwrap();
    // no double clock-in
    assert!(record(&pool.conn, "alice", AttendanceStatus::ClockIn).is_err());

    record(&pool.conn, "alice", AttendanceStatus::ClockOut).unwrap();
    assert!(record(&pool.conn, "alice", AttendanceStatus::ClockOut).is_err());

    let events = load_events_for_user(&pool.conn, "alice", None).unwrap();
    assert_eq!(events.len(), 2);
}

#[test]
fn test_history_limit_keeps_newest_in_order() {
    let db_path = setup_test_db("status_history_limit");
    let pool = open_db(&db_path);

    let mut status = AttendanceStatus::ClockOut;
    let mut ids = Vec::new();
    for _ in 0..5 {
        status = status.toggled();
        ids.push(record(&pool.conn, "alice", status).unwrap());
    }

    let newest = load_events_for_user(&pool.conn, "alice", Some(2)).unwrap();
    let got: Vec<i64> = newest.iter().map(|e| e.id).collect();
    assert_eq!(got, ids[3..].to_vec());

    let all = load_events_for_user(&pool.conn, "alice", None).unwrap();
    assert_eq!(all.len(), 5);
    check_alternation("alice", &all).unwrap();
}

#[test]
fn test_alternation_audit_reports_broken_history() {
    let db_path = setup_test_db("status_audit");
    let pool = open_db(&db_path);

    record(&pool.conn, "alice", AttendanceStatus::ClockIn).unwrap();
    record(&pool.conn, "alice", AttendanceStatus::ClockOut).unwrap();
    record(&pool.conn, "bob", AttendanceStatus::ClockIn).unwrap();

    let (users, failures) = audit_all(&pool.conn).unwrap();
    assert_eq!(users, 2);
    assert!(failures.is_empty());

    // Simulate a history written behind the trigger's back.
    let mut events = load_events_for_user(&pool.conn, "alice", None).unwrap();
    events.swap(0, 1);
    assert!(matches!(
        check_alternation("alice", &events),
        Err(AppError::AlternationViolation { .. })
    ));

    let mut events = load_events_for_user(&pool.conn, "bob", None).unwrap();
    events[0].is_within_geofence = false;
    assert!(check_alternation("bob", &events).is_err());
}
