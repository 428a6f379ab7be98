use serde::Serialize;

/// An authenticated session, as stored in `sessions`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Session {
    pub id: i64,
    pub user_id: String,
    pub created_at: String,
    pub expires_at: String,
}
