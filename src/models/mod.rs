pub mod attendance_event;
pub mod attendance_status;
pub mod coordinates;
pub mod device_info;
pub mod geofence;
pub mod session;
