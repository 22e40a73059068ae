//! repos command - Look up and list repository aliases

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use super::{Command, CommandError};
use crate::cli::arguments::Arguments;
use crate::context::Context;
use crate::core::paths;
use crate::core::repos::{decode_escapes, load_aliases, Aliases};

/// `dotfiles repos`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Repos {
    pub key: Option<String>,
    /// Unset means the configured repos directory.
    pub repos_path: Option<String>,
    /// Unset means the configured alias file.
    pub file_path: Option<String>,
    pub list_keys: bool,
    pub list_paths: bool,
    /// Unset means a newline.
    pub sep: Option<String>,
    completion: bool,
}

impl Repos {
    fn repos_dir(&self, ctx: &Context) -> PathBuf {
        match &self.repos_path {
            Some(path) => paths::expand_tilde(path),
            None => ctx.config.repos_path(),
        }
    }

    fn aliases_file(&self, ctx: &Context) -> PathBuf {
        match &self.file_path {
            Some(path) => paths::expand_tilde(path),
            None => ctx.config.aliases_file(),
        }
    }

    fn aliases(&self, ctx: &Context) -> Result<Aliases> {
        let file = self.aliases_file(ctx);
        load_aliases(&self.repos_dir(ctx), &file)
            .with_context(|| format!("failed to load repo aliases from '{}'", file.display()))
    }

    fn separator(&self) -> String {
        decode_escapes(self.sep.as_deref().unwrap_or("\n"))
    }
}

/// `key path` rows with keys padded to a common width.
pub fn format_table(aliases: &Aliases) -> Vec<String> {
    let width = aliases.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    aliases
        .iter()
        .map(|(key, path)| format!("{key:width$} {}", path.display()))
        .collect()
}

impl Command for Repos {
    const NAME: &'static str = "repos";
    const DESCRIPTION: &'static str = "Repo aliases";

    fn from_arguments(arguments: &Arguments) -> Self {
        let text = |key: &str| arguments.get_str(key).map(str::to_string);
        Self {
            key: text("key"),
            repos_path: text("repos_path"),
            file_path: text("file_path"),
            list_keys: arguments.get_bool("list_keys"),
            list_paths: arguments.get_bool("list_paths"),
            sep: text("sep"),
            completion: false,
        }
    }

    fn completion(&self) -> bool {
        self.completion
    }

    fn set_completion(&mut self, completion: bool) {
        self.completion = completion;
    }

    fn validate(&self, _ctx: &Context) -> Result<(), CommandError> {
        if self.file_path.as_deref() == Some("") {
            return Err(CommandError::validation(Self::NAME, "Invalid repo aliases file path"));
        }
        if self.repos_path.as_deref() == Some("") {
            return Err(CommandError::validation(Self::NAME, "Invalid repos directory path"));
        }
        if self.list_keys && self.list_paths {
            return Err(CommandError::validation(
                Self::NAME,
                "You can only use one of \"--list-keys\" or \"--list-paths\" options",
            ));
        }
        if self.sep.as_deref() == Some("") {
            return Err(CommandError::validation(Self::NAME, "Invalid sep"));
        }
        Ok(())
    }

    fn completion_tokens(&self, ctx: &Context) -> Result<Vec<String>> {
        Ok(self.aliases(ctx)?.into_keys().collect())
    }

    fn run(&mut self, ctx: &Context) -> Result<()> {
        let aliases = self.aliases(ctx)?;
        if aliases.is_empty() {
            return Ok(());
        }

        if let Some(key) = &self.key {
            let path = aliases.get(key).ok_or(CommandError::Halt(1))?;
            ctx.console.line(path.display());
        } else if self.list_paths {
            let paths: Vec<_> = aliases.values().map(|p| p.display().to_string()).collect();
            ctx.console.joined(&paths, &self.separator());
        } else if self.list_keys {
            let keys: Vec<_> = aliases.keys().collect();
            ctx.console.joined(&keys, &self.separator());
        } else {
            for row in format_table(&aliases) {
                ctx.console.line(row);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::execute;
    use super::super::testing::*;
    use super::*;
    use crate::cli::arguments::ArgValue;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _root: TempDir,
        repos: PathBuf,
        file: PathBuf,
    }

    fn fixture() -> Fixture {
        let root = tempfile::tempdir().unwrap();
        let repos = root.path().join("repos");
        fs::create_dir_all(repos.join("dotfiles")).unwrap();
        fs::create_dir_all(repos.join("site")).unwrap();
        let file = root.path().join("aliases");
        fs::write(&file, "cfg = /etc/dotfiles\n").unwrap();
        Fixture {
            _root: root,
            repos,
            file,
        }
    }

    fn command(fx: &Fixture, extra: &[(&str, ArgValue)]) -> Repos {
        let mut pairs: Vec<(&str, ArgValue)> = vec![
            ("repos_path", fx.repos.display().to_string().into()),
            ("file_path", fx.file.display().to_string().into()),
        ];
        pairs.extend(extra.iter().cloned());
        Repos::from_arguments(&Arguments::from_mapping(pairs))
    }

    fn output(mut repos: Repos) -> Result<String> {
        let ctx = context(os("debian"), FakeShell::default(), FakePrompter::default());
        execute(&mut repos, &ctx)?;
        Ok(ctx.console.captured())
    }

    #[test]
    fn table_is_aligned_and_sorted() {
        let fx = fixture();
        let out = output(command(&fx, &[])).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "cfg      /etc/dotfiles");
        assert!(lines[1].starts_with("dotfiles "));
        assert!(lines[2].starts_with("site     "));
    }

    #[test]
    fn key_prints_path() {
        let fx = fixture();
        let out = output(command(&fx, &[("key", "site".into())])).unwrap();
        assert_eq!(out.trim_end(), fx.repos.join("site").display().to_string());
    }

    #[test]
    fn unknown_key_halts_with_one() {
        let fx = fixture();
        let err = output(command(&fx, &[("key", "nope".into())])).unwrap_err();
        assert_eq!(err.downcast_ref::<CommandError>(), Some(&CommandError::Halt(1)));
    }

    #[test]
    fn list_keys_with_escaped_separator() {
        let fx = fixture();
        let out = output(command(
            &fx,
            &[("list_keys", true.into()), ("sep", "\\t".into())],
        ))
        .unwrap();
        assert_eq!(out, "cfg\tdotfiles\tsite\n");
    }

    #[test]
    fn list_flags_are_exclusive() {
        let fx = fixture();
        let err = output(command(
            &fx,
            &[("list_keys", true.into()), ("list_paths", true.into())],
        ))
        .unwrap_err();
        assert!(err.to_string().contains("--list-keys"));
    }

    #[test]
    fn empty_values_are_rejected() {
        for key in ["file_path", "repos_path", "sep"] {
            let repos = Repos::from_arguments(&Arguments::from_mapping([(key, "")]));
            assert!(output(repos).is_err(), "{key}");
        }
    }

    #[test]
    fn nothing_to_show_is_success() {
        let root = tempfile::tempdir().unwrap();
        let repos = Repos::from_arguments(&Arguments::from_mapping([
            ("repos_path", root.path().join("none").display().to_string()),
            ("file_path", root.path().join("none.ini").display().to_string()),
        ]));
        assert_eq!(output(repos).unwrap(), "");
    }

    #[test]
    fn completion_lists_alias_keys() {
        let fx = fixture();
        let out = output(command(&fx, &[]).completing(true)).unwrap();
        assert_eq!(out, "cfg dotfiles site\n");
    }
}
