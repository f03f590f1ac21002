use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session file name in the config directory
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// The session store: at most one authentication token at a time, persisted
/// to disk. Written on login, read by the navigation guard, removed on logout.
pub struct Session {
    store_dir: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(store_dir: PathBuf) -> Self {
        Self {
            store_dir,
            data: None,
        }
    }

    /// Load session from disk
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents =
                std::fs::read_to_string(&path).context("Failed to read session file")?;
            let data: SessionData =
                serde_json::from_str(&contents).context("Failed to parse session file")?;

            if !data.token.is_empty() {
                self.data = Some(data);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    /// Clear session data from memory and disk
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Update session with new data
    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    /// Get the bearer token if one is stored
    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.token.as_str())
    }

    /// The navigation-guard check: a non-empty token is present
    pub fn is_authenticated(&self) -> bool {
        self.token().map(|t| !t.is_empty()).unwrap_or(false)
    }

    fn session_path(&self) -> PathBuf {
        self.store_dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> SessionData {
        SessionData {
            token: "QpwL5tke4Pnpja7X4".to_string(),
            email: "eve.holt@reqres.in".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_save_load_clear_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = Session::new(dir.path().to_path_buf());
        assert!(!session.is_authenticated());

        session.update(sample_data());
        session.save().expect("save");

        let mut reloaded = Session::new(dir.path().to_path_buf());
        assert!(reloaded.load().expect("load"));
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.token(), Some("QpwL5tke4Pnpja7X4"));
        assert_eq!(
            reloaded.data.as_ref().map(|d| d.email.as_str()),
            Some("eve.holt@reqres.in")
        );

        reloaded.clear().expect("clear");
        assert!(!reloaded.is_authenticated());

        let mut after_clear = Session::new(dir.path().to_path_buf());
        assert!(!after_clear.load().expect("load"));
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = Session::new(dir.path().to_path_buf());
        session.update(SessionData {
            token: String::new(),
            email: "eve.holt@reqres.in".to_string(),
            created_at: Utc::now(),
        });
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_load_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = Session::new(dir.path().join("nope"));
        assert!(!session.load().expect("load"));
        assert!(session.data.is_none());
    }
}
