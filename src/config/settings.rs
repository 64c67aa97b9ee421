//! Studio settings
//!
//! Connection and capture preferences persisted as a JSON document, the
//! shape the embedding application ships as `settings.json`.

use crate::utils::error::StudioResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Remote server connection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Base URL of the remote media server
    pub server_url: Option<String>,

    /// Login user name
    pub username: Option<String>,

    /// Login password
    pub password: Option<String>,

    /// Server-side workflow to start after ingest
    pub workflow_id: Option<String>,
}

impl ServerSettings {
    /// True when enough is configured to attempt an upload
    pub fn is_configured(&self) -> bool {
        self.server_url.as_deref().map(|u| !u.is_empty()).unwrap_or(false)
    }

    /// Server URL trimmed for display: scheme and trailing slashes removed
    pub fn pretty_server_url(&self) -> Option<String> {
        let url = self.server_url.as_deref()?;
        let trimmed = url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Which devices to acquire when a session starts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureSettings {
    /// Acquire the display stream
    pub display: bool,

    /// Acquire the user-facing stream
    pub user: bool,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            display: true,
            user: true,
        }
    }
}

/// Top-level settings document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudioSettings {
    pub server: ServerSettings,
    pub capture: CaptureSettings,
}

impl StudioSettings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> StudioResult<Self> {
        let content = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Write settings to a JSON file
    pub fn save(&self, path: &Path) -> StudioResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = StudioSettings::default();
        settings.server.server_url = Some("https://media.example.org/".to_string());
        settings.server.username = Some("studio".to_string());
        settings.capture.user = false;

        settings.save(&path).unwrap();
        let loaded = StudioSettings::load(&path).unwrap();

        assert_eq!(
            loaded.server.server_url.as_deref(),
            Some("https://media.example.org/")
        );
        assert!(!loaded.capture.user);
        assert!(loaded.capture.display);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"server": {"serverUrl": "https://media.example.org"}}"#).unwrap();

        let loaded = StudioSettings::load(&path).unwrap();
        assert!(loaded.server.is_configured());
        assert!(loaded.capture.display && loaded.capture.user);
    }

    #[test]
    fn test_pretty_server_url_strips_scheme_and_slash() {
        let server = ServerSettings {
            server_url: Some("https://media.example.org/".to_string()),
            ..Default::default()
        };
        assert_eq!(server.pretty_server_url().as_deref(), Some("media.example.org"));

        assert_eq!(ServerSettings::default().pretty_server_url(), None);
        assert!(!ServerSettings::default().is_configured());
    }
}
