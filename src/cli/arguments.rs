//! cli::arguments
//!
//! Named argument values handed from the parser to commands.
//!
//! # Design
//!
//! A parse produces two things:
//!
//! - [`Route`]: the routing keys (`command`, `subcommand`, `completion`) that
//!   select which command runs
//! - [`Arguments`]: every other named value, in the order the parser defined
//!   them
//!
//! Commands copy what they need out of [`Arguments`] into typed fields at
//! construction and never see the routing keys as user input.
//!
//! # Example
//!
//! ```
//! use dotfiles::cli::arguments::{ArgValue, Arguments};
//!
//! let args = Arguments::from_mapping([("a", ArgValue::Int(1)), ("b", ArgValue::Int(2))]);
//! let rest = args.clone_excluding(&["b"]);
//! assert_eq!(rest.keys().collect::<Vec<_>>(), vec!["a"]);
//! assert_eq!(args.get_or("missing", ArgValue::Bool(false)), ArgValue::Bool(false));
//! ```

use std::fmt;

use clap::ArgMatches;

/// Keys reserved for routing between command layers.
pub const ROUTING_KEYS: [&str; 4] = ["command", "subcommand", "completion", "shell_completion"];

/// A single argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl ArgValue {
    /// Whether the value counts as set: `true`, non-zero, or a non-empty string.
    pub fn is_truthy(&self) -> bool {
        match self {
            ArgValue::Bool(b) => *b,
            ArgValue::Int(i) => *i != 0,
            ArgValue::Str(s) => !s.is_empty(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Bool(b) => write!(f, "{b}"),
            ArgValue::Int(i) => write!(f, "{i}"),
            ArgValue::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Int(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Str(value)
    }
}

/// Ordered, read-only set of named values for one command invocation.
///
/// Equality is structural: two instances are equal when they hold the same
/// keys with the same values. Order only affects display.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    entries: Vec<(String, ArgValue)>,
}

impl Arguments {
    /// Wrap a plain key/value mapping.
    ///
    /// A repeated key keeps its first position and its last value.
    pub fn from_mapping<K, V, I>(mapping: I) -> Self
    where
        K: Into<String>,
        V: Into<ArgValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut args = Self::default();
        for (key, value) in mapping {
            args.insert(key.into(), value.into());
        }
        args
    }

    /// Collect the values of a clap parse, across every subcommand level.
    ///
    /// Routing keys are left out; see [`Route::from_parsed`] for those.
    pub fn from_parsed(matches: &ArgMatches) -> Self {
        let mut args = Self::default();
        let mut level = Some(matches);

        while let Some(current) = level {
            for id in current.ids() {
                let key = id.as_str();
                if ROUTING_KEYS.contains(&key) {
                    continue;
                }
                if let Some(value) = matched_value(current, key) {
                    args.insert(key.to_string(), value);
                }
            }
            level = current.subcommand().map(|(_, sub)| sub);
        }

        args
    }

    fn insert(&mut self, key: String, value: ArgValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Look up a value, falling back to `default` when the key is absent.
    pub fn get_or(&self, key: &str, default: ArgValue) -> ArgValue {
        self.get(key).cloned().unwrap_or(default)
    }

    /// Look up a flag; absent or non-boolean values read as `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(ArgValue::as_bool).unwrap_or(false)
    }

    /// Look up a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ArgValue::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Copy out the entries as a plain ordered list.
    pub fn to_mapping(&self) -> Vec<(String, ArgValue)> {
        self.entries.clone()
    }

    /// A new instance without the given keys.
    pub fn clone_excluding(&self, excluded: &[&str]) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| !excluded.contains(&k.as_str()))
                .cloned()
                .collect(),
        }
    }
}

impl PartialEq for Arguments {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.entries.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for Arguments {}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self
            .entries
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Arguments({body})")
    }
}

/// Read a single matched value as a flag or a string.
///
/// Ids whose stored type is neither (argument groups) are skipped.
fn matched_value(matches: &ArgMatches, id: &str) -> Option<ArgValue> {
    if let Ok(Some(flag)) = matches.try_get_one::<bool>(id) {
        return Some(ArgValue::Bool(*flag));
    }
    if let Ok(Some(text)) = matches.try_get_one::<String>(id) {
        return Some(ArgValue::Str(text.clone()));
    }
    None
}

/// The routing keys of one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    /// Top-level command name (`install`, `repos`, ...).
    pub command: Option<String>,
    /// Nested command name (`php`, `composer`).
    pub subcommand: Option<String>,
    /// Print the legal next tokens instead of running.
    pub completion: bool,
}

impl Route {
    /// Extract the routing keys from a clap parse.
    pub fn from_parsed(matches: &ArgMatches) -> Self {
        let completion = matches!(matches.try_get_one::<bool>("completion"), Ok(Some(true)));
        let (command, subcommand) = match matches.subcommand() {
            Some((name, sub)) => (
                Some(name.to_string()),
                sub.subcommand_name().map(str::to_string),
            ),
            None => (None, None),
        };

        Self {
            command,
            subcommand,
            completion,
        }
    }

    /// The route one layer down: the subcommand becomes the command.
    pub fn shift(&self) -> Self {
        Self {
            command: self.subcommand.clone(),
            subcommand: None,
            completion: self.completion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, ArgAction, Command};

    fn parser() -> Command {
        Command::new("dotfiles")
            .arg(
                Arg::new("completion")
                    .long("completion")
                    .action(ArgAction::SetTrue)
                    .global(true),
            )
            .subcommand(
                Command::new("install").subcommand(
                    Command::new("php")
                        .arg(Arg::new("version"))
                        .arg(Arg::new("env").short('e').long("env")),
                ),
            )
            .subcommand(
                Command::new("osinfo").arg(
                    Arg::new("codename")
                        .short('c')
                        .long("codename")
                        .action(ArgAction::SetTrue),
                ),
            )
    }

    #[test]
    fn from_mapping_preserves_order() {
        let args = Arguments::from_mapping([("b", 1i64), ("a", 2i64)]);
        assert_eq!(args.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn clone_excluding_drops_named_keys() {
        let args = Arguments::from_mapping([("a", 1i64), ("b", 2i64)]);
        let rest = args.clone_excluding(&["b"]);
        assert_eq!(rest.to_mapping(), vec![("a".to_string(), ArgValue::Int(1))]);
        // the source is untouched
        assert!(args.contains("b"));
    }

    #[test]
    fn equality_is_structural() {
        let a = Arguments::from_mapping([("x", "1")]);
        let b = Arguments::from_mapping([("x", "1")]);
        let c = Arguments::from_mapping([("x", "2")]);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let ab = Arguments::from_mapping([("a", 1i64), ("b", 2i64)]);
        let ba = Arguments::from_mapping([("b", 2i64), ("a", 1i64)]);
        assert_eq!(ab, ba);
        assert_ne!(ab, Arguments::from_mapping([("a", 1i64)]));
    }

    #[test]
    fn default_lookups() {
        let args = Arguments::default();
        assert!(args.is_empty());
        assert!(!args.get_bool("codename"));
        assert_eq!(args.get_str("version"), None);
        assert_eq!(args.get_or("sep", "\n".into()), ArgValue::Str("\n".into()));
    }

    #[test]
    fn display_lists_entries() {
        let args = Arguments::from_mapping([("list_keys", ArgValue::Bool(true)), ("sep", ",".into())]);
        assert_eq!(args.to_string(), "Arguments(list_keys=true, sep=\",\")");
    }

    #[test]
    fn from_parsed_flattens_levels_and_strips_routing_keys() {
        let matches = parser()
            .try_get_matches_from(["dotfiles", "--completion", "install", "php", "8.2", "-e", "server"])
            .unwrap();
        let args = Arguments::from_parsed(&matches);

        assert!(!args.contains("completion"));
        assert_eq!(args.get_str("version"), Some("8.2"));
        assert_eq!(args.get_str("env"), Some("server"));

        let route = Route::from_parsed(&matches);
        assert_eq!(route.command.as_deref(), Some("install"));
        assert_eq!(route.subcommand.as_deref(), Some("php"));
        assert!(route.completion);
    }

    #[test]
    fn from_parsed_reads_flags() {
        let matches = parser()
            .try_get_matches_from(["dotfiles", "osinfo", "-c"])
            .unwrap();
        let args = Arguments::from_parsed(&matches);
        assert!(args.get_bool("codename"));

        let route = Route::from_parsed(&matches);
        assert_eq!(route.command.as_deref(), Some("osinfo"));
        assert_eq!(route.subcommand, None);
        assert!(!route.completion);
    }

    #[test]
    fn shift_moves_down_one_level() {
        let route = Route {
            command: Some("install".into()),
            subcommand: Some("php".into()),
            completion: true,
        };
        let next = route.shift();
        assert_eq!(next.command.as_deref(), Some("php"));
        assert_eq!(next.subcommand, None);
        assert!(next.completion);
    }
}
