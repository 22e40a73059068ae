//! core::osinfo
//!
//! Operating-system identity.
//!
//! # Sources
//!
//! - freedesktop systems (Linux, FreeBSD): the `os-release` file, read from
//!   `/etc/os-release` and then `/usr/lib/os-release`
//! - macOS: `sw_vers -productVersion` for the version
//! - anything else: only the OS type is known
//!
//! # Example
//!
//! ```
//! use dotfiles::core::osinfo::{OsInfo, OsRelease, OsType};
//!
//! let release = OsRelease::parse("ID=ubuntu\nID_LIKE=debian\nVERSION_CODENAME=noble\n");
//! let info = OsInfo::from_release(OsType::Linux, release);
//! assert_eq!(info.id(), "ubuntu");
//! assert_eq!(info.id_like(), vec!["debian".to_string()]);
//! assert_eq!(info.codename(), "noble");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::exec::{Shell, ShellCommand};

const RELEASE_FILES: [&str; 2] = ["/etc/os-release", "/usr/lib/os-release"];

/// Broad family of operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsType {
    Linux,
    Mac,
    Windows,
    FreeBsd,
    Other(String),
}

impl OsType {
    /// The type this binary was built for.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "linux" => OsType::Linux,
            "macos" => OsType::Mac,
            "windows" => OsType::Windows,
            "freebsd" => OsType::FreeBsd,
            other => OsType::Other(other.to_string()),
        }
    }

    /// Whether the system describes itself with an `os-release` file.
    pub fn is_freedesktop(&self) -> bool {
        matches!(self, OsType::Linux | OsType::FreeBsd)
    }

    pub fn as_str(&self) -> &str {
        match self {
            OsType::Linux => "linux",
            OsType::Mac => "mac",
            OsType::Windows => "windows",
            OsType::FreeBsd => "freebsd",
            OsType::Other(name) => name,
        }
    }
}

impl fmt::Display for OsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed `os-release` key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
    values: HashMap<String, String>,
}

impl OsRelease {
    /// Parse `KEY=value` lines. Comments and malformed lines are skipped;
    /// surrounding single or double quotes are removed from values.
    pub fn parse(text: &str) -> Self {
        let values = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim().to_string(), unquote(value.trim()).to_string()))
            .collect();
        Self { values }
    }

    /// Read the first release file that exists; empty when there is none.
    pub fn load() -> Self {
        RELEASE_FILES
            .iter()
            .map(Path::new)
            .find_map(|path| fs::read_to_string(path).ok())
            .map(|text| Self::parse(&text))
            .unwrap_or_default()
    }

    /// A value, or an empty string when the key is missing.
    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Everything the `osinfo` command can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsInfo {
    os_type: OsType,
    release: OsRelease,
    product_version: Option<String>,
}

impl OsInfo {
    /// Inspect the running system.
    pub fn detect(shell: &dyn Shell) -> Self {
        let os_type = OsType::current();
        let release = if os_type.is_freedesktop() {
            OsRelease::load()
        } else {
            OsRelease::default()
        };
        let product_version = match os_type {
            OsType::Mac => mac_product_version(shell),
            _ => None,
        };
        debug!(os_type = %os_type, id = release.get("ID"), "detected operating system");

        Self {
            os_type,
            release,
            product_version,
        }
    }

    /// Build from known parts, without touching the system.
    pub fn from_release(os_type: OsType, release: OsRelease) -> Self {
        Self {
            os_type,
            release,
            product_version: None,
        }
    }

    /// Set the version reported for non-freedesktop systems.
    pub fn with_product_version(mut self, version: impl Into<String>) -> Self {
        self.product_version = Some(version.into());
        self
    }

    pub fn os_type(&self) -> &OsType {
        &self.os_type
    }

    /// Lower-case identifier, e.g. `ubuntu`; the OS type off freedesktop.
    pub fn id(&self) -> String {
        if self.os_type.is_freedesktop() {
            self.release.get("ID").to_string()
        } else {
            self.os_type.to_string()
        }
    }

    /// Systems this one derives from; falls back to the id itself.
    pub fn id_like(&self) -> Vec<String> {
        if !self.os_type.is_freedesktop() {
            return vec![self.os_type.to_string()];
        }
        let like = self.release.get("ID_LIKE");
        if like.is_empty() {
            let id = self.release.get("ID");
            return if id.is_empty() {
                Vec::new()
            } else {
                vec![id.to_string()]
            };
        }
        like.split(' ')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn name(&self) -> String {
        match self.os_type {
            OsType::Mac => "macOS".to_string(),
            OsType::Linux | OsType::FreeBsd => self.release.get("NAME").to_string(),
            OsType::Windows => "Windows".to_string(),
            OsType::Other(ref name) => name.clone(),
        }
    }

    pub fn pretty_name(&self) -> String {
        if self.os_type.is_freedesktop() {
            return self.release.get("PRETTY_NAME").to_string();
        }
        format!("{} {}", self.name(), self.version()).trim_end().to_string()
    }

    pub fn codename(&self) -> String {
        self.release.get("VERSION_CODENAME").to_string()
    }

    pub fn version(&self) -> String {
        if self.os_type.is_freedesktop() {
            self.release.get("VERSION_ID").to_string()
        } else {
            self.product_version.clone().unwrap_or_default()
        }
    }
}

fn mac_product_version(shell: &dyn Shell) -> Option<String> {
    shell
        .run(&ShellCommand::line("sw_vers -productVersion").capture().unchecked())
        .ok()
        .filter(|out| out.success())
        .map(|out| out.output.trim().to_string())
}
