use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result, params};

/// A named, append-only schema step. Applied migrations are recorded in `log`.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20261001_0001_create_attendance_records",
        description: "Created attendance_records table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS attendance_records (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id             TEXT NOT NULL,
            status              TEXT NOT NULL CHECK(status IN ('clock_in','clock_out')),
            location_lat        REAL NOT NULL,
            location_lng        REAL NOT NULL,
            device_info         TEXT NOT NULL DEFAULT '{}',
            is_within_geofence  INTEGER NOT NULL CHECK(is_within_geofence IN (0,1)),
            created_at          TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_user_id ON attendance_records(user_id, id);
        "#,
    },
    Migration {
        version: "20261001_0002_create_geofence_settings",
        description: "Created geofence_settings table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS geofence_settings (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            label          TEXT NOT NULL DEFAULT '',
            center_lat     REAL NOT NULL CHECK(center_lat BETWEEN -90 AND 90),
            center_lng     REAL NOT NULL CHECK(center_lng BETWEEN -180 AND 180),
            radius_meters  REAL NOT NULL CHECK(radius_meters > 0),
            is_active      INTEGER NOT NULL DEFAULT 1 CHECK(is_active IN (0,1)),
            created_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_geofence_single_active
            ON geofence_settings(is_active) WHERE is_active = 1;
        "#,
    },
    Migration {
        version: "20261001_0003_create_sessions",
        description: "Created sessions table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
            expires_at  TEXT NOT NULL,
            revoked_at  TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_active ON sessions(revoked_at, expires_at);
        "#,
    },
    Migration {
        version: "20261008_0004_attendance_alternation_trigger",
        description: "Enforced clock_in/clock_out alternation per user",
        sql: r#"
        CREATE TRIGGER IF NOT EXISTS trg_attendance_alternation
        BEFORE INSERT ON attendance_records
        WHEN NEW.status = COALESCE(
            (SELECT status FROM attendance_records
              WHERE user_id = NEW.user_id
              ORDER BY id DESC
              LIMIT 1),
            'clock_out')
        BEGIN
            SELECT RAISE(ABORT, 'attendance status must alternate');
        END;
        "#,
    },
];

/// Ensure that the `log` table exists; it also tracks applied migrations.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &mut Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (strftime('%Y-%m-%dT%H:%M:%fZ','now'), 'migration_applied', ?1, ?2)",
        params![m.version, m.description],
    )?;

    tx.commit()?;
    Ok(())
}

/// Public entry point: run all pending migrations, in order.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &mut Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        success(format!("Migration applied: {} → {}", m.version, m.description));
    }

    Ok(())
}

/// Versions already recorded as applied, oldest first.
pub fn applied_versions(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
