pub mod audit;
pub mod config;
pub mod geofence;
pub mod geolocation;
pub mod log;
pub mod recorder;
pub mod session;
pub mod status;
