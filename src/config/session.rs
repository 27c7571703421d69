use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Sessions are valid for a day after login
pub const SESSION_TTL_HOURS: i64 = 24;

/// Stored login, written by `taller login`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub email: Option<String>,
    pub saved_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: impl Into<String>, email: Option<String>) -> Self {
        Self {
            token: token.into(),
            email,
            saved_at: Utc::now(),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.saved_at + Duration::hours(SESSION_TTL_HOURS)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }

    pub fn label(&self) -> String {
        self.email.clone().unwrap_or_else(|| "this user".to_string())
    }
}
