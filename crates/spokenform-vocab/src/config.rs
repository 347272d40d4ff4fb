//! Settings directory configuration
//!
//! Override files live under a single settings directory. The directory is
//! itself one configuration value, resolved relative to the user root when it
//! is not absolute.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_SETTINGS_DIRECTORY: &str = "spokenform-settings";
pub const USER_DIR_ENV: &str = "SPOKENFORM_USER_DIR";
pub const SETTINGS_DIR_ENV: &str = "SPOKENFORM_SETTINGS_DIR";

const OVERRIDE_FILE_EXTENSION: &str = ".csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where override files are read from and whether they are watched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// Root that a relative `settings_directory` is resolved against
    pub user_dir: PathBuf,
    /// Directory holding one override file per vocabulary group
    pub settings_directory: PathBuf,
    /// Install a directory watch per override file
    pub watch_files: bool,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        let user_dir = std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".spokenform"))
            .unwrap_or_else(|| PathBuf::from(".spokenform"));
        Self {
            user_dir,
            settings_directory: PathBuf::from(DEFAULT_SETTINGS_DIRECTORY),
            watch_files: true,
        }
    }
}

impl SettingsConfig {
    /// Config rooted at `user_dir` with every other field defaulted.
    pub fn with_user_dir(user_dir: impl Into<PathBuf>) -> Self {
        Self {
            user_dir: user_dir.into(),
            ..Default::default()
        }
    }

    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `SPOKENFORM_USER_DIR` / `SPOKENFORM_SETTINGS_DIR` when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(dir) = std::env::var_os(USER_DIR_ENV) {
            self.user_dir = PathBuf::from(dir);
        }
        if let Some(dir) = std::env::var_os(SETTINGS_DIR_ENV) {
            self.settings_directory = PathBuf::from(dir);
        }
        self
    }

    /// The settings directory, resolved against `user_dir` if relative.
    pub fn settings_dir(&self) -> PathBuf {
        if self.settings_directory.is_absolute() {
            self.settings_directory.clone()
        } else {
            self.user_dir.join(&self.settings_directory)
        }
    }

    /// Path of the override file for `file_id` (e.g. `actions` or
    /// `experimental/actions_custom`).
    pub fn file_path(&self, file_id: &str) -> PathBuf {
        let file_name = if file_id.ends_with(OVERRIDE_FILE_EXTENSION) {
            file_id.to_string()
        } else {
            format!("{file_id}{OVERRIDE_FILE_EXTENSION}")
        };
        self.settings_dir().join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_settings_dir_resolves_against_user_dir() {
        let config = SettingsConfig::with_user_dir("/home/me/.talon");
        assert_eq!(
            config.file_path("actions"),
            PathBuf::from("/home/me/.talon/spokenform-settings/actions.csv")
        );
        assert_eq!(
            config.file_path("experimental/actions_custom.csv"),
            PathBuf::from("/home/me/.talon/spokenform-settings/experimental/actions_custom.csv")
        );
    }

    #[test]
    fn test_absolute_settings_dir_is_kept() {
        let config = SettingsConfig {
            settings_directory: PathBuf::from("/etc/spokenform"),
            ..SettingsConfig::with_user_dir("/home/me")
        };
        assert_eq!(config.settings_dir(), PathBuf::from("/etc/spokenform"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SettingsConfig =
            serde_json::from_str(r#"{"user_dir": "/tmp/u", "watch_files": false}"#).unwrap();
        assert_eq!(config.user_dir, PathBuf::from("/tmp/u"));
        assert_eq!(
            config.settings_directory,
            PathBuf::from(DEFAULT_SETTINGS_DIRECTORY)
        );
        assert!(!config.watch_files);
    }
}
