//! ANSI color helper utilities for terminal output.

use crate::models::attendance_status::AttendanceStatus;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";

/// Clocked in → green, clocked out → red.
pub fn color_for_status(status: AttendanceStatus) -> &'static str {
    if status.is_in() { GREEN } else { RED }
}

pub fn colorize_status(status: AttendanceStatus) -> String {
    format!("{}{}{}", color_for_status(status), status, RESET)
}
