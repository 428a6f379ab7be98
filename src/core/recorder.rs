//! The clock-toggle workflow.
//!
//! One [`AttendanceRecorder::toggle`] call is one user action:
//!
//! 1. re-check the session
//! 2. acquire the device location
//! 3. evaluate the geofence
//! 4. compute the next status
//! 5. persist the event
//! 6. update the displayed status
//!
//! Any failure aborts the attempt before step 5 commits, so the log never
//! holds an event written from outside the zone and the displayed status
//! always equals the last persisted event.

use crate::core::geofence::GeofenceEvaluator;
use crate::core::geolocation::GeolocationProvider;
use crate::core::session::SessionGuard;
use crate::core::status::AttendanceStateResolver;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::insert_attendance_event;
use crate::errors::{AppError, AppResult};
use crate::models::attendance_event::{AttendanceEvent, NewAttendanceEvent};
use crate::models::attendance_status::AttendanceStatus;
use crate::models::device_info::DeviceInfo;
use crate::models::geofence::GeofenceCheck;
use rusqlite::TransactionBehavior;
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

/// A successful toggle.
#[derive(Debug, Clone)]
pub struct ToggleOutcome {
    pub event: AttendanceEvent,
    pub check: GeofenceCheck,
}

struct RecorderState {
    pool: DbPool,
    displayed: AttendanceStatus,
}

pub struct AttendanceRecorder<G: GeolocationProvider> {
    user_id: String,
    provider: G,
    device_info: serde_json::Value,
    // Held for the whole attempt: a second toggle sees it locked and is rejected.
    state: Mutex<RecorderState>,
}

impl<G: GeolocationProvider> AttendanceRecorder<G> {
    /// Gate on the session, then establish the displayed status from storage.
    pub fn load(pool: DbPool, provider: G, device: &DeviceInfo) -> AppResult<Self> {
        let session = SessionGuard::require_session(&pool.conn)?;
        let displayed =
            AttendanceStateResolver::resolve_current_status(&pool.conn, &session.user_id)?;

        Ok(Self {
            user_id: session.user_id,
            provider,
            device_info: device.to_json(),
            state: Mutex::new(RecorderState { pool, displayed }),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Status currently shown to the user. Waits for an in-flight toggle.
    pub fn displayed_status(&self) -> AttendanceStatus {
        self.lock_state().displayed
    }

    /// Reload the displayed status from storage.
    pub fn refresh(&self) -> AppResult<AttendanceStatus> {
        let mut state = self.lock_state();
        state.displayed =
            AttendanceStateResolver::resolve_current_status(&state.pool.conn, &self.user_id)?;
        Ok(state.displayed)
    }

    /// Run one clock-in/clock-out attempt.
    ///
    /// Returns `ToggleInProgress` if another attempt on this recorder has not
    /// finished yet.
    pub fn toggle(&self) -> AppResult<ToggleOutcome> {
        let mut guard = match self.state.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return Err(AppError::ToggleInProgress),
            Err(TryLockError::Poisoned(p)) => p.into_inner(),
        };
        let state: &mut RecorderState = &mut guard;

        let result = self.attempt(state);

        match &result {
            Ok(outcome) => ttlog_quiet(
                &state.pool.conn,
                outcome.event.status.to_db_str(),
                &self.user_id,
                &format!(
                    "Event {} at {} ({})",
                    outcome.event.id, outcome.event.location, outcome.event.created_at
                ),
            ),
            Err(e) => ttlog_quiet(&state.pool.conn, "clock_failed", &self.user_id, &e.to_string()),
        }

        result
    }

    fn attempt(&self, state: &mut RecorderState) -> AppResult<ToggleOutcome> {
        // 1) session
        let session = SessionGuard::require_session(&state.pool.conn)?;
        if session.user_id != self.user_id {
            return Err(AppError::Unauthenticated);
        }

        // 2) location
        let location = self.provider.current_location()?;

        // 3) geofence
        let check = GeofenceEvaluator::check(&state.pool.conn, location)?;
        if !check.inside {
            return Err(AppError::GeofenceViolation {
                distance_m: check.distance_m.unwrap_or(f64::INFINITY),
                radius_m: check.radius_m.unwrap_or_default(),
            });
        }

        // 4) next status
        let new_status = state.displayed.toggled();

        // 5) persist; IMMEDIATE takes the write lock before the re-check so
        //    another process cannot slip an event in between.
        let tx = state
            .pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let persisted = AttendanceStateResolver::resolve_current_status(&tx, &self.user_id)?;
        if persisted != state.displayed {
            drop(tx);
            let displayed = state.displayed;
            state.displayed = persisted;
            return Err(AppError::StaleStatus {
                displayed,
                persisted,
            });
        }

        let event = insert_attendance_event(
            &tx,
            &NewAttendanceEvent {
                user_id: self.user_id.clone(),
                status: new_status,
                location,
                device_info: self.device_info.clone(),
                is_within_geofence: check.inside,
            },
        )?;
        tx.commit()?;

        // 6) displayed status follows the committed event
        state.displayed = new_status;

        Ok(ToggleOutcome { event, check })
    }

    fn lock_state(&self) -> MutexGuard<'_, RecorderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
