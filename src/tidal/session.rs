//! Persisted login session

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tokens are refreshed when they expire within this many seconds
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Login state saved between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix timestamp (seconds) at which the access token expires
    pub expires_at: i64,
    pub user_id: u64,
    pub country_code: String,
}

impl StoredSession {
    /// Load a session file; `Ok(None)` when it does not exist
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file: {:?}", path))?;
        let session = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session file: {:?}", path))?;
        Ok(Some(session))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write session file: {:?}", path))?;
        log::debug!("Session saved to {:?}", path);
        Ok(())
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        now + EXPIRY_MARGIN_SECS >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session(expires_at: i64) -> StoredSession {
        StoredSession {
            access_token: "token".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at,
            user_id: 1234,
            country_code: "DE".to_string(),
        }
    }

    #[test]
    fn test_expiry_margin() {
        let s = session(1_000);
        assert!(!s.is_expired_at(900));
        assert!(s.is_expired_at(940));
        assert!(s.is_expired_at(2_000));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        assert_eq!(StoredSession::load(&path).unwrap(), None);

        let s = session(1_700_000_000);
        s.save(&path).unwrap();
        assert_eq!(StoredSession::load(&path).unwrap(), Some(s));
    }

    #[test]
    fn test_load_garbage_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        assert!(StoredSession::load(&path).is_err());
    }
}
