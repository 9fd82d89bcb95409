use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR_PREFIX: &str = "sheets-client";

/// Client secret looked up in the working directory when nothing else is configured.
pub const DEFAULT_CLIENT_SECRET_FILE: &str = "client_secret.json";

const TOKEN_CACHE_FILE: &str = "google_tokens.json";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub google: GoogleConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct GoogleConfig {
    /// Service account JSON key. When set, the OAuth client secret is ignored.
    pub service_account_file: Option<PathBuf>,
    pub client_secret_file: Option<PathBuf>,
    /// Drive folder that spreadsheets are listed from and created in.
    pub folder_id: Option<String>,
}

impl GoogleConfig {
    pub fn client_secret_file(&self) -> PathBuf {
        self.client_secret_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CLIENT_SECRET_FILE))
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))?;

        if config
            .google
            .folder_id
            .as_deref()
            .is_some_and(|id| id.trim().is_empty())
        {
            return Err(AppError::Config(
                "google.folder_id must not be empty when set".to_string(),
            ));
        }

        Ok(config)
    }

    fn xdg_dirs() -> xdg::BaseDirectories {
        xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX)
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        let xdg_dirs = Self::xdg_dirs();
        xdg_dirs
            .place_config_file("config.toml")
            .map_err(|e| AppError::Config(format!("Failed to create config directory: {}", e)))
    }

    /// Get the cache directory path
    pub fn cache_dir() -> Result<PathBuf> {
        let xdg = Self::xdg_dirs();
        xdg.get_cache_home()
            .ok_or_else(|| AppError::Config("Failed to determine cache directory".to_string()))
    }

    /// Get a cache file path
    pub fn cache_file(filename: &str) -> Result<PathBuf> {
        let xdg = Self::xdg_dirs();
        xdg.place_cache_file(filename)
            .map_err(|e| AppError::Config(format!("Failed to create cache file path: {}", e)))
    }

    pub fn token_cache_file() -> Result<PathBuf> {
        Self::cache_file(TOKEN_CACHE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = Config {
            google: GoogleConfig {
                service_account_file: Some(PathBuf::from("/etc/sa.json")),
                client_secret_file: None,
                folder_id: Some("folder123".to_string()),
            },
        };

        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(
            config.google.service_account_file,
            deserialized.google.service_account_file
        );
        assert_eq!(config.google.folder_id, deserialized.google.folder_id);
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert!(config.google.service_account_file.is_none());
        assert_eq!(
            config.google.client_secret_file(),
            PathBuf::from(DEFAULT_CLIENT_SECRET_FILE)
        );
    }

    #[test]
    fn test_empty_google_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[google]\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.google.folder_id.is_none());
    }

    #[test]
    fn test_blank_folder_id_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[google]\nfolder_id = \"  \"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "google = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
