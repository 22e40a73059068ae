//! core::repos
//!
//! Repository aliases: short keys for local checkout directories.
//!
//! # Sources
//!
//! Aliases come from two places, merged:
//!
//! 1. the alias file, one `key = path` (or `key: path`) per line; blank lines
//!    and `#`/`;` comments are ignored, keys are case-insensitive and `~`
//!    expands to the home directory
//! 2. every sub-directory of the repos root, keyed by its directory name,
//!    unless the alias file already points at it
//!
//! A missing alias file or repos root contributes nothing.
//!
//! # Example
//!
//! ```
//! use dotfiles::core::repos::parse_aliases;
//!
//! let aliases = parse_aliases("# work\nDot = /srv/dotfiles\nweb: /srv/site\n").unwrap();
//! assert_eq!(aliases["dot"].to_str(), Some("/srv/dotfiles"));
//! assert_eq!(aliases["web"].to_str(), Some("/srv/site"));
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::paths;

/// Alias key to directory, sorted by key.
pub type Aliases = BTreeMap<String, PathBuf>;

/// Errors from reading aliases.
#[derive(Debug, Error)]
pub enum AliasError {
    #[error("failed to read repo aliases file '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to scan repos directory '{path}': {source}")]
    Scan { path: PathBuf, source: io::Error },

    #[error("line {line}: alias '{key}' already exists")]
    Duplicate { line: usize, key: String },

    #[error("line {line}: expected 'key = path', got '{text}'")]
    Malformed { line: usize, text: String },
}

/// Parse the contents of an alias file.
pub fn parse_aliases(text: &str) -> Result<Aliases, AliasError> {
    let mut aliases = Aliases::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') || line.starts_with('[') {
            continue;
        }

        let split_at = line.find(['=', ':']).ok_or_else(|| AliasError::Malformed {
            line: index + 1,
            text: line.to_string(),
        })?;
        let key = line[..split_at].trim().to_lowercase();
        let path = line[split_at + 1..].trim();
        if key.is_empty() {
            return Err(AliasError::Malformed {
                line: index + 1,
                text: line.to_string(),
            });
        }

        if aliases.contains_key(&key) {
            return Err(AliasError::Duplicate {
                line: index + 1,
                key,
            });
        }
        aliases.insert(key, paths::expand_tilde(path));
    }

    Ok(aliases)
}

/// Read the alias file and merge in the repos root's sub-directories.
pub fn load_aliases(repos_dir: &Path, aliases_file: &Path) -> Result<Aliases, AliasError> {
    let mut aliases = match fs::read_to_string(aliases_file) {
        Ok(text) => parse_aliases(&text)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Aliases::new(),
        Err(source) => {
            return Err(AliasError::Read {
                path: aliases_file.to_path_buf(),
                source,
            })
        }
    };

    if !repos_dir.is_dir() {
        return Ok(aliases);
    }

    let entries = fs::read_dir(repos_dir).map_err(|source| AliasError::Scan {
        path: repos_dir.to_path_buf(),
        source,
    })?;

    let mut scanned = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| AliasError::Scan {
            path: repos_dir.to_path_buf(),
            source,
        })?;
        if !entry.path().is_dir() {
            continue;
        }
        let path = paths::absolute(&entry.path());
        if aliases.values().any(|p| *p == path) {
            continue;
        }
        scanned.push((entry.file_name().to_string_lossy().into_owned(), path));
    }
    aliases.extend(scanned);

    Ok(aliases)
}

/// Decode backslash escapes the way a shell user types a separator:
/// `\n`, `\t`, `\r`, `\0`, `\\`, `\xNN` and `\uNNNN`.
///
/// Unknown escapes are kept as written.
pub fn decode_escapes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some(kind @ ('x' | 'u')) => {
                let width = if kind == 'x' { 2 } else { 4 };
                let digits: String = chars.clone().take(width).collect();
                let decoded = (digits.len() == width)
                    .then(|| u32::from_str_radix(&digits, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match decoded {
                    Some(ch) => {
                        out.push(ch);
                        for _ in 0..width {
                            chars.next();
                        }
                    }
                    None => {
                        out.push('\\');
                        out.push(kind);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
