//! cli::commands::dispatch
//!
//! Closed tables of subcommands and the composite command that routes
//! through them.
//!
//! # Design
//!
//! Each composite level is an enum implementing [`Subcommands`]; a name maps
//! to a variant with [`Subcommands::lookup`] and every variant knows how to
//! build and execute its command. Adding a subcommand means adding a variant,
//! so the compiler points at every table that must learn about it.
//!
//! # Example
//!
//! ```
//! use dotfiles::cli::commands::{InstallTarget, Subcommands};
//!
//! assert_eq!(InstallTarget::lookup("php"), Some(InstallTarget::Php));
//! assert_eq!(InstallTarget::lookup("nonexistent"), None);
//! assert_eq!(InstallTarget::keys(), vec!["composer", "php"]);
//! ```

use std::marker::PhantomData;

use anyhow::Result;
use tracing::debug;

use super::{
    execute, Command, CommandError, ComposerInstall, ComposerUninstall, Osinfo, PhpInstall,
    PhpUninstall, Repos,
};
use crate::cli::arguments::{Arguments, Route, ROUTING_KEYS};
use crate::context::Context;

/// The named subcommands of one composite command.
pub trait Subcommands: Copy + Sized + 'static {
    /// Name of the composite owning the table.
    const OWNER: &'static str;

    /// What the owning composite does, for help text.
    const DESCRIPTION: &'static str;

    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    fn lookup(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|target| target.name() == name)
    }

    /// Table keys, sorted.
    fn keys() -> Vec<&'static str> {
        let mut keys: Vec<_> = Self::ALL.iter().map(|target| target.name()).collect();
        keys.sort_unstable();
        keys
    }

    /// The error for a name missing from the table.
    fn unknown(name: &str) -> CommandError {
        CommandError::InvalidSubcommand {
            command: Self::OWNER.to_string(),
            subcommand: name.to_string(),
        }
    }

    /// Build the selected command and execute it.
    ///
    /// `route.command` names `self`; `arguments` holds no routing keys.
    fn dispatch(self, route: &Route, arguments: &Arguments, ctx: &Context) -> Result<()>;
}

/// Build a leaf from `arguments`; it is the deepest command so it carries
/// the completion flag.
fn leaf<C: Command>(route: &Route, arguments: &Arguments, ctx: &Context) -> Result<()> {
    let mut command = C::from_arguments(arguments).completing(route.completion);
    execute(&mut command, ctx)
}

/// Top-level commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootTarget {
    Install,
    Osinfo,
    Repos,
    Uninstall,
}

impl Subcommands for RootTarget {
    const OWNER: &'static str = "dotfiles";
    const DESCRIPTION: &'static str = "Helper commands";
    const ALL: &'static [Self] = &[
        RootTarget::Install,
        RootTarget::Osinfo,
        RootTarget::Repos,
        RootTarget::Uninstall,
    ];

    fn name(self) -> &'static str {
        match self {
            RootTarget::Install => "install",
            RootTarget::Osinfo => Osinfo::NAME,
            RootTarget::Repos => Repos::NAME,
            RootTarget::Uninstall => "uninstall",
        }
    }

    fn unknown(name: &str) -> CommandError {
        CommandError::InvalidCommand(name.to_string())
    }

    fn dispatch(self, route: &Route, arguments: &Arguments, ctx: &Context) -> Result<()> {
        match self {
            RootTarget::Install => {
                let mut install = Composite::<InstallTarget>::new(route.shift(), arguments.clone());
                execute(&mut install, ctx)
            }
            RootTarget::Uninstall => {
                let mut uninstall =
                    Composite::<UninstallTarget>::new(route.shift(), arguments.clone());
                execute(&mut uninstall, ctx)
            }
            RootTarget::Osinfo => leaf::<Osinfo>(route, arguments, ctx),
            RootTarget::Repos => leaf::<Repos>(route, arguments, ctx),
        }
    }
}

/// `install` subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallTarget {
    Composer,
    Php,
}

impl Subcommands for InstallTarget {
    const OWNER: &'static str = "install";
    const DESCRIPTION: &'static str = "Install a program";
    const ALL: &'static [Self] = &[InstallTarget::Composer, InstallTarget::Php];

    fn name(self) -> &'static str {
        match self {
            InstallTarget::Composer => ComposerInstall::NAME,
            InstallTarget::Php => PhpInstall::NAME,
        }
    }

    fn dispatch(self, route: &Route, arguments: &Arguments, ctx: &Context) -> Result<()> {
        match self {
            InstallTarget::Composer => leaf::<ComposerInstall>(route, arguments, ctx),
            InstallTarget::Php => leaf::<PhpInstall>(route, arguments, ctx),
        }
    }
}

/// `uninstall` subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallTarget {
    Composer,
    Php,
}

impl Subcommands for UninstallTarget {
    const OWNER: &'static str = "uninstall";
    const DESCRIPTION: &'static str = "Uninstall a program";
    const ALL: &'static [Self] = &[UninstallTarget::Composer, UninstallTarget::Php];

    fn name(self) -> &'static str {
        match self {
            UninstallTarget::Composer => ComposerUninstall::NAME,
            UninstallTarget::Php => PhpUninstall::NAME,
        }
    }

    fn dispatch(self, route: &Route, arguments: &Arguments, ctx: &Context) -> Result<()> {
        match self {
            UninstallTarget::Composer => leaf::<ComposerUninstall>(route, arguments, ctx),
            UninstallTarget::Php => leaf::<PhpUninstall>(route, arguments, ctx),
        }
    }
}

/// A command that hands off to one of the commands in table `T`.
#[derive(Debug, Clone)]
pub struct Composite<T> {
    route: Route,
    arguments: Arguments,
    completion: bool,
    table: PhantomData<T>,
}

impl<T: Subcommands> Composite<T> {
    /// `route.command` selects the subcommand. The completion flag only
    /// stays on the composite when no subcommand was named.
    pub fn new(route: Route, arguments: Arguments) -> Self {
        let completion = route.completion && route.command.is_none();
        Self {
            route,
            arguments: arguments.clone_excluding(&ROUTING_KEYS),
            completion,
            table: PhantomData,
        }
    }

    /// Select a subcommand by name.
    pub fn with_subcommand(mut self, name: Option<impl Into<String>>) -> Self {
        self.route.command = name.map(Into::into);
        self.completion = self.route.completion && self.route.command.is_none();
        self
    }

    pub fn subcommand(&self) -> Option<&str> {
        self.route.command.as_deref()
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }
}

impl<T: Subcommands> Command for Composite<T> {
    const NAME: &'static str = T::OWNER;
    const DESCRIPTION: &'static str = T::DESCRIPTION;

    fn from_arguments(arguments: &Arguments) -> Self {
        Self::new(Route::default(), arguments.clone())
    }

    fn completion(&self) -> bool {
        self.completion
    }

    fn set_completion(&mut self, completion: bool) {
        self.completion = completion;
        self.route.completion = completion;
    }

    fn completion_tokens(&self, _ctx: &Context) -> Result<Vec<String>> {
        Ok(T::keys().into_iter().map(str::to_string).collect())
    }

    fn run(&mut self, ctx: &Context) -> Result<()> {
        let name = self.subcommand().unwrap_or_default();
        match T::lookup(name) {
            Some(target) => {
                debug!(command = T::OWNER, subcommand = name, arguments = %self.arguments, "dispatching");
                target.dispatch(&self.route, &self.arguments, ctx)
            }
            None if self.route.completion => {
                let keys = self.completion_tokens(ctx)?;
                ctx.console.joined(&keys, " ");
                Ok(())
            }
            None => Err(T::unknown(name).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    fn ctx() -> Context {
        context(os("ubuntu"), FakeShell::default(), FakePrompter::default())
    }

    fn route(command: Option<&str>, subcommand: Option<&str>, completion: bool) -> Route {
        Route {
            command: command.map(str::to_string),
            subcommand: subcommand.map(str::to_string),
            completion,
        }
    }

    #[test]
    fn root_keys_are_sorted() {
        assert_eq!(RootTarget::keys(), vec!["install", "osinfo", "repos", "uninstall"]);
        assert_eq!(UninstallTarget::keys(), vec!["composer", "php"]);
    }

    #[test]
    fn root_completion_lists_commands() {
        let ctx = ctx();
        let mut root = Composite::<RootTarget>::new(route(None, None, true), Arguments::default());
        execute(&mut root, &ctx).unwrap();
        assert_eq!(ctx.console.captured(), "install osinfo repos uninstall\n");
    }

    #[test]
    fn install_completion_lists_targets() {
        let ctx = ctx();
        let mut root =
            Composite::<RootTarget>::new(route(Some("install"), None, true), Arguments::default());
        execute(&mut root, &ctx).unwrap();
        assert_eq!(ctx.console.captured(), "composer php\n");
    }

    #[test]
    fn missing_subcommand_is_invalid() {
        let ctx = ctx();
        let mut root =
            Composite::<RootTarget>::new(route(Some("install"), None, false), Arguments::default());
        let err = execute(&mut root, &ctx).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CommandError>(),
            Some(&CommandError::InvalidSubcommand {
                command: "install".into(),
                subcommand: String::new(),
            })
        );
    }

    #[test]
    fn unknown_subcommand_is_invalid() {
        let ctx = ctx();
        let mut install = Composite::<InstallTarget>::from_arguments(&Arguments::default())
            .with_subcommand(Some("nonexistent"));
        let err = execute(&mut install, &ctx).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CommandError>(),
            Some(&CommandError::InvalidSubcommand {
                command: "install".into(),
                subcommand: "nonexistent".into(),
            })
        );
    }

    #[test]
    fn unknown_top_level_is_invalid_command() {
        let ctx = ctx();
        let mut root =
            Composite::<RootTarget>::new(route(Some("deploy"), None, false), Arguments::default());
        let err = execute(&mut root, &ctx).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CommandError>(),
            Some(&CommandError::InvalidCommand("deploy".into()))
        );
    }

    #[test]
    fn routing_keys_never_reach_commands() {
        let args = Arguments::from_mapping([("command", "install"), ("version", "8.2")]);
        let composite = Composite::<InstallTarget>::new(Route::default(), args);
        assert!(!composite.arguments().contains("command"));
        assert!(composite.arguments().contains("version"));
    }

    #[test]
    fn osinfo_completion_lands_on_leaf() {
        let ctx = ctx();
        let mut root =
            Composite::<RootTarget>::new(route(Some("osinfo"), None, true), Arguments::default());
        execute(&mut root, &ctx).unwrap();
        assert_eq!(
            ctx.console.captured(),
            "--codename --id --like --pretty --simplified --version\n"
        );
    }
}
