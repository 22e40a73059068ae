//! core::config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! Searched in order, first hit wins:
//! 1. `$DOTFILES_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/dotfiles/config.toml`
//! 3. `~/.config/dotfiles/config.toml`
//!
//! No file at all is not an error; every value has a default.
//!
//! # Example
//!
//! ```
//! use dotfiles::core::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.php_current_version().to_string(), "8.3.0");
//! assert_eq!(config.composer_install_dir().to_str(), Some("/usr/local/bin"));
//! ```

pub mod schema;

pub use schema::{ComposerConfig, ConfigFile, ExecConfig, PhpConfig, ReposConfig, PHP_ENVIRONMENTS};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::core::paths::{self, DEFAULT_ALIASES_FILE, DEFAULT_REPOS_DIR};
use crate::core::version::VersionTuple;

/// PHP version offered when nothing is configured.
pub const DEFAULT_PHP_VERSION: (u64, u64) = (8, 3);

/// Versions at or below this are not offered for install.
pub const MINIMUM_PHP_VERSION: (u64, u64) = (7, 4);

pub const DEFAULT_PHP_ENV: &str = "desktop";

pub const DEFAULT_COMPOSER_DIR: &str = "/usr/local/bin";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration with defaults applied by the accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: ConfigFile,
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::locate() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load a specific config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    fn locate() -> Option<PathBuf> {
        // 1. Check $DOTFILES_CONFIG
        if let Ok(path) = std::env::var("DOTFILES_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/dotfiles/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("dotfiles/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.config/dotfiles/config.toml
        let path = paths::home_path(".config/dotfiles/config.toml");
        path.exists().then_some(path)
    }

    /// The file this configuration came from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn repos_path(&self) -> PathBuf {
        self.file
            .repos
            .as_ref()
            .and_then(|r| r.path.as_deref())
            .map(paths::expand_tilde)
            .unwrap_or_else(|| paths::home_path(DEFAULT_REPOS_DIR))
    }

    pub fn aliases_file(&self) -> PathBuf {
        self.file
            .repos
            .as_ref()
            .and_then(|r| r.aliases_file.as_deref())
            .map(paths::expand_tilde)
            .unwrap_or_else(|| paths::home_path(DEFAULT_ALIASES_FILE))
    }

    fn php_version(&self, pick: impl Fn(&PhpConfig) -> Option<&String>, default: (u64, u64)) -> VersionTuple {
        self.file
            .php
            .as_ref()
            .and_then(pick)
            .and_then(|v| VersionTuple::parse(v).ok())
            .unwrap_or_else(|| VersionTuple::from(default))
    }

    pub fn php_current_version(&self) -> VersionTuple {
        self.php_version(|p| p.current_version.as_ref(), DEFAULT_PHP_VERSION)
    }

    pub fn php_minimum_version(&self) -> VersionTuple {
        self.php_version(|p| p.minimum_version.as_ref(), MINIMUM_PHP_VERSION)
    }

    pub fn php_default_env(&self) -> &str {
        self.file
            .php
            .as_ref()
            .and_then(|p| p.default_env.as_deref())
            .unwrap_or(DEFAULT_PHP_ENV)
    }

    pub fn composer_install_dir(&self) -> PathBuf {
        self.file
            .composer
            .as_ref()
            .and_then(|c| c.install_dir.as_deref())
            .map(paths::expand_tilde)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_COMPOSER_DIR))
    }

    /// Timeout for package-manager commands; `None` waits indefinitely.
    pub fn exec_timeout(&self) -> Option<Duration> {
        self.file
            .exec
            .as_ref()
            .and_then(|e| e.timeout_secs)
            .map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_file() {
        let config = Config::default();
        assert_eq!(config.php_current_version(), VersionTuple::new(8, 3, 0));
        assert_eq!(config.php_minimum_version(), VersionTuple::new(7, 4, 0));
        assert_eq!(config.php_default_env(), "desktop");
        assert_eq!(config.repos_path(), paths::home_path("repos"));
        assert_eq!(config.aliases_file(), paths::home_path(".repo-aliases"));
        assert_eq!(config.exec_timeout(), None);
        assert!(config.path().is_none());
    }

    #[test]
    fn load_from_applies_values() {
        let file = write_config(
            "[repos]\npath = \"/srv/code\"\n[php]\ncurrent_version = \"8.2\"\n[exec]\ntimeout_secs = 30\n",
        );
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.repos_path(), PathBuf::from("/srv/code"));
        assert_eq!(config.php_current_version(), VersionTuple::new(8, 2, 0));
        assert_eq!(config.exec_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.path(), Some(file.path()));
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let file = write_config("[php\n");
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn load_from_validates() {
        let file = write_config("[php]\ndefault_env = \"cloud\"\n");
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Config::load_from(Path::new("/nonexistent/dotfiles.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
