pub mod clock;
pub mod config;
pub mod db;
pub mod export;
pub mod geofence;
pub mod history;
pub mod init;
pub mod log;
pub mod login;
pub mod logout;
pub mod status;
