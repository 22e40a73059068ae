//! cli::commands
//!
//! The command protocol and its implementations.
//!
//! # Architecture
//!
//! Every runnable action is a [`Command`]:
//! 1. built from [`Arguments`] with [`Command::from_arguments`]
//! 2. checked with [`Command::validate`]
//! 3. either asked for its completion words (when the completion flag is
//!    set) or run once
//!
//! Steps 2 and 3 are enforced by [`execute`]; a command never runs when it
//! fails validation.
//!
//! Composite commands (`dotfiles`, `install`, `uninstall`) select a leaf by
//! name through the closed tables in [`dispatch`].

pub mod composer;
pub mod completion;
pub mod dispatch;
pub mod osinfo;
pub mod php;
pub mod repos;

pub use completion::completion;
pub use composer::{ComposerInstall, ComposerUninstall};
pub use dispatch::{Composite, InstallTarget, RootTarget, Subcommands, UninstallTarget};
pub use osinfo::Osinfo;
pub use php::{PhpInstall, PhpUninstall};
pub use repos::Repos;

use anyhow::Result;
use thiserror::Error;

use crate::cli::arguments::{Arguments, Route};
use crate::context::Context;
use crate::installers;

/// Failures of the command protocol itself.
///
/// Collaborator failures (a package manager exiting non-zero, a download
/// failing) travel as their own error types inside `anyhow::Error`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    /// Input rejected by [`Command::validate`].
    #[error("{message}")]
    Validation { command: String, message: String },

    /// A composite was given no subcommand, or one it does not know.
    #[error("{}", subcommand_message(.subcommand))]
    InvalidSubcommand { command: String, subcommand: String },

    #[error("Invalid command \"{0}\"")]
    InvalidCommand(String),

    /// Stop with this exit status and no message.
    #[error("exit status {0}")]
    Halt(u8),
}

fn subcommand_message(subcommand: &str) -> String {
    if subcommand.is_empty() {
        "the following arguments are required: subcommand".to_string()
    } else {
        format!("invalid subcommand \"{subcommand}\"")
    }
}

impl CommandError {
    pub fn validation(command: &str, message: impl Into<String>) -> Self {
        CommandError::Validation {
            command: command.to_string(),
            message: message.into(),
        }
    }

    /// Name of the command the error belongs to, if any.
    pub fn command(&self) -> Option<&str> {
        match self {
            CommandError::Validation { command, .. }
            | CommandError::InvalidSubcommand { command, .. }
            | CommandError::InvalidCommand(command) => Some(command),
            CommandError::Halt(_) => None,
        }
    }
}

/// A runnable action.
pub trait Command {
    /// Name as typed on the command line.
    const NAME: &'static str;

    /// One-line description.
    const DESCRIPTION: &'static str;

    /// Build from parsed values. Missing keys take their defaults, so an
    /// empty [`Arguments`] always works.
    fn from_arguments(arguments: &Arguments) -> Self
    where
        Self: Sized;

    fn completion(&self) -> bool;

    fn set_completion(&mut self, completion: bool);

    /// Builder form of [`Command::set_completion`].
    fn completing(mut self, completion: bool) -> Self
    where
        Self: Sized,
    {
        self.set_completion(completion);
        self
    }

    /// Reject invalid input. Never corrects it.
    fn validate(&self, _ctx: &Context) -> Result<(), CommandError> {
        Ok(())
    }

    /// Words that may follow this command on the command line.
    fn completion_tokens(&self, _ctx: &Context) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn run(&mut self, ctx: &Context) -> Result<()>;
}

/// Validate `command`, then print its completion words or run it.
pub fn execute<C: Command>(command: &mut C, ctx: &Context) -> Result<()> {
    command.validate(ctx)?;

    if command.completion() {
        let tokens = command.completion_tokens(ctx)?;
        ctx.console.joined(&tokens, " ");
        return Ok(());
    }

    command.run(ctx)
}

/// Run the top-level command selected by `route`.
pub fn run_root(route: Route, arguments: Arguments, ctx: &Context) -> Result<()> {
    let mut root = Composite::<RootTarget>::new(route, arguments);
    execute(&mut root, ctx)
}

/// Shared check for the installer commands.
fn require_supported_os(command: &str, ctx: &Context) -> Result<(), CommandError> {
    if installers::is_supported(&ctx.os) {
        Ok(())
    } else {
        Err(CommandError::validation(
            command,
            "Your operating system is not supported",
        ))
    }
}
