//! core::paths
//!
//! Home-relative paths and `~` expansion.
//!
//! # Example
//!
//! ```
//! use dotfiles::core::paths::expand_tilde;
//! use std::path::PathBuf;
//!
//! assert_eq!(expand_tilde("/srv/repos"), PathBuf::from("/srv/repos"));
//! ```

use std::path::{Path, PathBuf};

/// Directory scanned for repositories when nothing else is configured.
pub const DEFAULT_REPOS_DIR: &str = "repos";

/// Alias file name in the home directory.
pub const DEFAULT_ALIASES_FILE: &str = ".repo-aliases";

/// The user's home directory, or `/` when it cannot be determined.
pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(os_root)
}

/// A path inside the home directory.
pub fn home_path(relative: impl AsRef<Path>) -> PathBuf {
    home_dir().join(relative)
}

/// The root of the filesystem.
pub fn os_root() -> PathBuf {
    PathBuf::from(std::path::MAIN_SEPARATOR_STR)
}

/// Replace a leading `~` with the home directory.
///
/// Only the current user's home is understood; `~other/...` is returned
/// unchanged.
pub fn expand_tilde(path: impl AsRef<str>) -> PathBuf {
    let path = path.as_ref();
    if path == "~" {
        return home_dir();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

/// `path` made absolute against the current directory, without touching
/// the filesystem.
pub fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_alone_is_home() {
        assert_eq!(expand_tilde("~"), home_dir());
    }

    #[test]
    fn tilde_prefix_joins_home() {
        assert_eq!(expand_tilde("~/repos/dotfiles"), home_dir().join("repos/dotfiles"));
    }

    #[test]
    fn other_users_are_left_alone() {
        assert_eq!(expand_tilde("~bob/repos"), PathBuf::from("~bob/repos"));
    }

    #[test]
    fn absolute_paths_pass_through() {
        assert_eq!(absolute(Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
        assert!(absolute(Path::new("relative")).is_absolute());
    }

    #[test]
    fn home_path_joins() {
        assert_eq!(home_path(DEFAULT_ALIASES_FILE), home_dir().join(".repo-aliases"));
    }
}
