use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PaperdeskError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaperdeskConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Origin every endpoint path is joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. Unset means requests wait indefinitely.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Where rendered previews are written. Defaults to the user cache dir.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
        }
    }
}

impl PreviewConfig {
    /// Resolve the preview directory, falling back to `<cache>/paperdesk/previews`.
    pub fn resolved_dir(&self) -> PathBuf {
        match self.output_dir {
            Some(ref dir) => dir.clone(),
            None => dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("paperdesk")
                .join("previews"),
        }
    }
}

impl PaperdeskConfig {
    /// Load config from ~/.config/paperdesk/config.toml, creating defaults if missing.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load config from an explicit path, writing defaults there if it does not exist.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .map_err(|e| PaperdeskError::Config(format!("Failed to read config: {e}")))?;
            let config: PaperdeskConfig = toml::from_str(&contents)
                .map_err(|e| PaperdeskError::Config(format!("Failed to parse config: {e}")))?;
            Ok(config)
        } else {
            let config = PaperdeskConfig::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| PaperdeskError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            PaperdeskError::Config("Could not determine config directory".into())
        })?;
        Ok(config_dir.join("paperdesk").join("config.toml"))
    }

    /// Replace the backend origin, e.g. from a command-line flag.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.backend.base_url = base_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = PaperdeskConfig::load_from(&path).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:5000");
        assert!(config.backend.timeout_seconds.is_none());
        assert!(path.exists());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[backend]\ntimeout_seconds = 30\n").unwrap();

        let config = PaperdeskConfig::load_from(&path).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:5000");
        assert_eq!(config.backend.timeout_seconds, Some(30));
        assert!(config.preview.output_dir.is_none());
    }

    #[test]
    fn garbage_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "backend = [[[").unwrap();

        let err = PaperdeskConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, PaperdeskError::Config(_)));
    }

    #[test]
    fn explicit_preview_dir_wins() {
        let preview = PreviewConfig {
            output_dir: Some(PathBuf::from("/tmp/previews")),
        };
        assert_eq!(preview.resolved_dir(), PathBuf::from("/tmp/previews"));
    }
}
