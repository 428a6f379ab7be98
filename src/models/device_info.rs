use serde::Serialize;
use std::env;

/// Client metadata captured with each event for audit purposes.
/// Stored as JSON and never read back by the attendance logic.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    pub user_agent: String,
    pub platform: String,
    pub arch: String,
    pub vendor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl DeviceInfo {
    /// Describe the machine running this process.
    pub fn capture(label: Option<String>) -> Self {
        let hostname = env::var("HOSTNAME")
            .or_else(|_| env::var("COMPUTERNAME"))
            .ok()
            .filter(|h| !h.trim().is_empty());

        Self {
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            platform: env::consts::OS.to_string(),
            arch: env::consts::ARCH.to_string(),
            vendor: env::consts::FAMILY.to_string(),
            hostname,
            label: label.filter(|l| !l.trim().is_empty()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
