use serde::Serialize;
use std::fmt;

/// The two alternating attendance states.
///
/// `ClockOut` doubles as the implicit state of a user who never clocked in.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    ClockIn,
    #[default]
    ClockOut,
}

impl AttendanceStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AttendanceStatus::ClockIn => "clock_in",
            AttendanceStatus::ClockOut => "clock_out",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "clock_in" => Some(AttendanceStatus::ClockIn),
            "clock_out" => Some(AttendanceStatus::ClockOut),
            _ => None,
        }
    }

    /// The state entered by the next toggle.
    pub fn toggled(self) -> Self {
        match self {
            AttendanceStatus::ClockIn => AttendanceStatus::ClockOut,
            AttendanceStatus::ClockOut => AttendanceStatus::ClockIn,
        }
    }

    pub fn is_in(&self) -> bool {
        matches!(self, AttendanceStatus::ClockIn)
    }

    /// Label of the action that leaves this state ("Clock In" / "Clock Out").
    pub fn action_label(&self) -> &'static str {
        match self {
            AttendanceStatus::ClockIn => "Clock Out",
            AttendanceStatus::ClockOut => "Clock In",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::ClockIn => write!(f, "clocked in"),
            AttendanceStatus::ClockOut => write!(f, "clocked out"),
        }
    }
}
