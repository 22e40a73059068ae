//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing: versions must parse as
//! [`VersionTuple`]s and the default PHP environment must be a known one.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::version::VersionTuple;

/// PHP environments with a package set.
pub const PHP_ENVIRONMENTS: [&str; 2] = ["desktop", "server"];

/// User configuration.
///
/// # Example
///
/// ```toml
/// [repos]
/// path = "~/code"
/// aliases_file = "~/.repo-aliases"
///
/// [php]
/// current_version = "8.3"
/// minimum_version = "7.4"
/// default_env = "server"
///
/// [composer]
/// install_dir = "/usr/local/bin"
///
/// [exec]
/// timeout_secs = 900
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub repos: Option<ReposConfig>,
    pub php: Option<PhpConfig>,
    pub composer: Option<ComposerConfig>,
    pub exec: Option<ExecConfig>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(php) = &self.php {
            php.validate()?;
        }
        if let Some(exec) = &self.exec {
            if exec.timeout_secs == Some(0) {
                return Err(ConfigError::InvalidValue(
                    "exec.timeout_secs must be greater than 0".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Repository alias settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReposConfig {
    /// Directory scanned for repositories (default: `~/repos`)
    pub path: Option<String>,

    /// Alias file (default: `~/.repo-aliases`)
    pub aliases_file: Option<String>,
}

/// PHP installer settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PhpConfig {
    /// Version offered first (default: "8.3")
    pub current_version: Option<String>,

    /// Only versions above this are installable (default: "7.4")
    pub minimum_version: Option<String>,

    /// Package set used when none is given (default: "desktop")
    pub default_env: Option<String>,
}

impl PhpConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("php.current_version", &self.current_version),
            ("php.minimum_version", &self.minimum_version),
        ] {
            if let Some(value) = value {
                VersionTuple::parse(value).map_err(|e| {
                    ConfigError::InvalidValue(format!("{field}: {e}"))
                })?;
            }
        }

        if let Some(env) = &self.default_env {
            if !PHP_ENVIRONMENTS.contains(&env.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid php.default_env '{}', must be one of: {}",
                    env,
                    PHP_ENVIRONMENTS.join(", ")
                )));
            }
        }

        Ok(())
    }
}

/// Composer installer settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ComposerConfig {
    /// Directory the `composer` executable is placed in
    pub install_dir: Option<String>,
}

/// Process execution settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ExecConfig {
    /// Kill package-manager commands running longer than this
    pub timeout_secs: Option<u64>,
}
