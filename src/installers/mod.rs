//! installers
//!
//! Install and uninstall procedures for PHP and Composer on apt-based
//! systems.
//!
//! # Modules
//!
//! - [`php`] - PHP package sets, apt sources and version discovery
//! - [`composer`] - Composer installer download, verification and placement
//!
//! # Design
//!
//! Procedures take the [`Context`](crate::context::Context) and talk to the
//! system only through its shell runner and prompter. Prompt cancellation and
//! interrupts are passed up unchanged so the front door can exit with 130.

pub mod composer;
pub mod php;

use thiserror::Error;

use crate::core::osinfo::OsInfo;

/// OS ids the installers know how to handle.
pub const SUPPORTED_OS_IDS: [&str; 3] = ["debian", "raspbian", "ubuntu"];

/// Errors specific to installing.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Your operating system is not supported")]
    UnsupportedOs,

    #[error("You must install php before you can install composer")]
    PhpMissing,

    #[error("Failed to install php-composer. Hashes didn't match")]
    SignatureMismatch,

    #[error("failed to download '{url}': {message}")]
    Download { url: String, message: String },
}

/// Whether the installers support this operating system.
pub fn is_supported(os: &OsInfo) -> bool {
    SUPPORTED_OS_IDS.contains(&os.id().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::osinfo::{OsRelease, OsType};

    #[test]
    fn apt_distributions_are_supported() {
        for id in SUPPORTED_OS_IDS {
            let os = OsInfo::from_release(OsType::Linux, OsRelease::parse(&format!("ID={id}")));
            assert!(is_supported(&os), "{id}");
        }
    }

    #[test]
    fn others_are_not() {
        let fedora = OsInfo::from_release(OsType::Linux, OsRelease::parse("ID=fedora"));
        assert!(!is_supported(&fedora));
        assert!(!is_supported(&OsInfo::from_release(OsType::Mac, OsRelease::default())));
    }
}
