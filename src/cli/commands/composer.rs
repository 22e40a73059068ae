//! composer commands - `install composer` and `uninstall composer`

use anyhow::Result;

use super::{require_supported_os, Command, CommandError};
use crate::cli::arguments::Arguments;
use crate::context::Context;
use crate::installers::composer;

/// `dotfiles install composer`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposerInstall {
    completion: bool,
}

impl Command for ComposerInstall {
    const NAME: &'static str = "composer";
    const DESCRIPTION: &'static str = "Install php-composer";

    fn from_arguments(_arguments: &Arguments) -> Self {
        Self::default()
    }

    fn completion(&self) -> bool {
        self.completion
    }

    fn set_completion(&mut self, completion: bool) {
        self.completion = completion;
    }

    fn validate(&self, ctx: &Context) -> Result<(), CommandError> {
        require_supported_os(Self::NAME, ctx)
    }

    fn run(&mut self, ctx: &Context) -> Result<()> {
        composer::install(ctx, &ctx.config.composer_install_dir())
    }
}

/// `dotfiles uninstall composer`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposerUninstall {
    completion: bool,
}

impl Command for ComposerUninstall {
    const NAME: &'static str = "composer";
    const DESCRIPTION: &'static str = "Uninstall php-composer";

    fn from_arguments(_arguments: &Arguments) -> Self {
        Self::default()
    }

    fn completion(&self) -> bool {
        self.completion
    }

    fn set_completion(&mut self, completion: bool) {
        self.completion = completion;
    }

    fn validate(&self, ctx: &Context) -> Result<(), CommandError> {
        require_supported_os(Self::NAME, ctx)
    }

    fn run(&mut self, ctx: &Context) -> Result<()> {
        composer::uninstall(ctx, &ctx.config.composer_install_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::super::execute;
    use super::super::testing::*;
    use super::*;
    use crate::core::config::ComposerConfig;
    use std::path::Path;

    fn ctx_with_dir(shell: FakeShell, dir: &Path) -> Context {
        let mut ctx = context(os("debian"), shell, FakePrompter::default());
        ctx.config.file.composer = Some(ComposerConfig {
            install_dir: Some(dir.display().to_string()),
        });
        ctx
    }

    #[test]
    fn unsupported_os_is_rejected() {
        let ctx = context(os("arch"), FakeShell::default(), FakePrompter::default());
        let err = execute(&mut ComposerUninstall::default(), &ctx).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CommandError>(),
            Some(&CommandError::validation("composer", "Your operating system is not supported"))
        );
    }

    #[test]
    fn install_validates_os_too() {
        let ctx = context(os("fedora"), FakeShell::default(), FakePrompter::default());
        assert!(execute(&mut ComposerInstall::default(), &ctx).is_err());
    }

    #[test]
    fn uninstall_removes_existing_binary() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("composer"), "").unwrap();
        let shell = FakeShell::default();
        let ctx = ctx_with_dir(shell.clone(), dir.path());

        execute(&mut ComposerUninstall::default(), &ctx).unwrap();

        let expected = format!("sudo rm \"{}\"", dir.path().join("composer").display());
        assert_eq!(shell.commands(), vec![expected]);
    }

    #[test]
    fn uninstall_without_binary_only_reports() {
        let dir = tempfile::tempdir().unwrap();
        let shell = FakeShell::default();
        let ctx = ctx_with_dir(shell.clone(), dir.path());

        execute(&mut ComposerUninstall::default(), &ctx).unwrap();

        assert!(shell.commands().is_empty());
        assert!(ctx.console.captured().contains("Composer is not installed"));
    }

    #[test]
    fn completion_offers_nothing() {
        let ctx = context(os("ubuntu"), FakeShell::default(), FakePrompter::default());
        execute(&mut ComposerInstall::default().completing(true), &ctx).unwrap();
        assert_eq!(ctx.console.captured(), "\n");
    }
}
