//! cli
//!
//! Command-line interface layer for dotfiles.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Set up logging, configuration and the Ctrl-C handler
//! - Hand the parse to the root composite command
//! - Map the outcome to an exit status
//!
//! # Exit status
//!
//! | status | meaning |
//! |--------|---------|
//! | 0      | success |
//! | 1      | a command failed, or was used incorrectly |
//! | 2      | clap rejected the command line |
//! | 130    | interrupted (Ctrl-C or end of input at a prompt) |

pub mod args;
pub mod arguments;
pub mod commands;

pub use args::{Cli, Shell};

use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::{CommandFactory, FromArgMatches};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::cancel::{CancellationToken, Interrupted, INTERRUPTED_EXIT_CODE};
use crate::context::Context;
use crate::core::config::Config;
use crate::exec::ExecError;
use crate::ui::output::{self, Verbosity};
use crate::ui::prompts::PromptError;
use arguments::{Arguments, Route};
use commands::CommandError;

/// Run the CLI application with the process arguments.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> ExitCode {
    run_from(std::env::args_os())
}

/// Run the CLI application with explicit arguments.
pub fn run_from<I, T>(argv: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = match Cli::command().try_get_matches_from(argv) {
        Ok(matches) => matches,
        Err(e) => e.exit(),
    };
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    init_tracing(cli.debug);

    if let Some(args::Command::Completion { shell }) = cli.command {
        return ExitCode::from(exit_status(commands::completion(shell), &Route::default(), None));
    }

    let route = Route::from_parsed(&matches);
    let arguments = Arguments::from_parsed(&matches);
    debug!(?route, %arguments, "parsed command line");

    if route.command.is_none() && !route.completion {
        let mut cmd = Cli::command();
        if let Err(e) = cmd.print_help() {
            debug!(error = %e, "failed to print help");
        }
        return ExitCode::FAILURE;
    }

    let cancel = CancellationToken::new();
    if let Err(e) = cancel.install_handler() {
        warn!(error = %e, "failed to install the Ctrl-C handler");
    }

    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    let result = start(route.clone(), arguments, verbosity, &cancel);
    ExitCode::from(exit_status(result, &route, Some(&cancel)))
}

/// Initialize tracing: warnings by default, `--debug` for debug output,
/// `RUST_LOG` overrides both.
fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A second initialization (tests calling run_from twice) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn start(route: Route, arguments: Arguments, verbosity: Verbosity, cancel: &CancellationToken) -> Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    if let Some(path) = config.path() {
        debug!(path = %path.display(), "loaded configuration");
    }

    let ctx = Context::system(config, verbosity, cancel.clone());
    commands::run_root(route, arguments, &ctx)
}

/// Whether `err` means the user interrupted the program.
pub fn is_interrupt(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.is::<Interrupted>()
            || matches!(cause.downcast_ref::<PromptError>(), Some(PromptError::Cancelled))
            || matches!(cause.downcast_ref::<ExecError>(), Some(ExecError::Interrupted(_)))
    })
}

/// Map the outcome of a run to an exit status, printing what the user
/// needs to see.
fn exit_status(result: Result<()>, route: &Route, cancel: Option<&CancellationToken>) -> u8 {
    let cancelled = cancel.is_some_and(CancellationToken::is_cancelled);

    let err = match result {
        Ok(()) if cancelled => return INTERRUPTED_EXIT_CODE,
        Ok(()) => return 0,
        Err(err) => err,
    };

    if cancelled || is_interrupt(&err) {
        debug!(error = %err, "interrupted");
        return INTERRUPTED_EXIT_CODE;
    }

    match err.chain().find_map(|cause| cause.downcast_ref::<CommandError>()) {
        Some(CommandError::Halt(code)) => *code,
        Some(command_error) => {
            eprintln!("{}", usage(route, command_error.command()));
            output::error(command_error);
            1
        }
        None => {
            output::error(format!("{err:#}"));
            1
        }
    }
}

/// Usage text of the parser level named `owner` along `route`.
///
/// `install php` and `uninstall php` share a name, so the level is found by
/// walking the route rather than by searching for the name.
pub fn usage(route: &Route, owner: Option<&str>) -> String {
    let mut root = Cli::command();
    root.build();

    let path: Vec<&str> = [route.command.as_deref(), route.subcommand.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    let depth = owner
        .and_then(|owner| path.iter().position(|name| *name == owner))
        .map_or(0, |index| index + 1);

    let mut level = &root;
    for name in &path[..depth] {
        match level.find_subcommand(name) {
            Some(sub) => level = sub,
            None => break,
        }
    }
    level.clone().render_usage().to_string()
}
