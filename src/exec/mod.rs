//! exec
//!
//! Running shell lines and scripts.
//!
//! # Modules
//!
//! - [`subprocess`] - [`SystemShell`], the runner backed by real processes
//! - [`installed`] - checks for installed programs and packages
//!
//! # Design
//!
//! Commands describe what to run with a [`ShellCommand`] and hand it to a
//! [`Shell`]. The trait is the seam tests use to record commands instead of
//! running them.
//!
//! # Example
//!
//! ```
//! use dotfiles::exec::ShellCommand;
//! use std::time::Duration;
//!
//! let cmd = ShellCommand::line("apt install -y")
//!     .args(["php8.3", "php8.3-cli"])
//!     .root()
//!     .timeout(Duration::from_secs(600));
//! assert_eq!(cmd.display(), "sudo apt install -y php8.3 php8.3-cli");
//! ```

pub mod installed;
pub mod subprocess;

pub use installed::{installed, is_cmd_installed, is_pkg_installed};
pub use subprocess::SystemShell;

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::cancel::Interrupted;

/// Errors from running a command.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("'{0}' was not found.")]
    ScriptNotFound(PathBuf),

    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("command '{command}' returned non-zero exit status {}", exit_label(.status))]
    Failed {
        command: String,
        status: Option<i32>,
    },

    #[error("command '{command}' timed out after {timeout_secs}s")]
    Timeout { command: String, timeout_secs: u64 },

    #[error("failed waiting for '{command}': {source}")]
    Wait {
        command: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "(signal)".to_string(),
    }
}

/// What to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A line interpreted by the user's shell.
    Line(String),
    /// A script executed directly, without a shell.
    Script(PathBuf),
}

/// A command to run, with its options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    target: Target,
    args: Vec<String>,
    root: bool,
    capture: bool,
    suppress_output: bool,
    check: bool,
    timeout: Option<Duration>,
    env: Vec<(String, String)>,
    current_dir: Option<PathBuf>,
}

impl ShellCommand {
    fn new(target: Target) -> Self {
        Self {
            target,
            args: Vec::new(),
            root: false,
            capture: false,
            suppress_output: false,
            check: true,
            timeout: None,
            env: Vec::new(),
            current_dir: None,
        }
    }

    /// A shell line such as `apt update`.
    pub fn line(line: impl Into<String>) -> Self {
        Self::new(Target::Line(line.into()))
    }

    /// A script run directly by path.
    pub fn script(path: impl Into<PathBuf>) -> Self {
        Self::new(Target::Script(path.into()))
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run through `sudo`.
    pub fn root(mut self) -> Self {
        self.root = true;
        self
    }

    /// Return the output instead of letting it through to the terminal.
    pub fn capture(mut self) -> Self {
        self.capture = true;
        self
    }

    /// Discard stdout. Takes precedence over [`ShellCommand::capture`].
    pub fn suppress_output(mut self) -> Self {
        self.suppress_output = true;
        self
    }

    /// Do not treat a non-zero exit status as an error.
    pub fn unchecked(mut self) -> Self {
        self.check = false;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn is_root(&self) -> bool {
        self.root
    }

    /// Whether output is captured (suppression wins over capture).
    pub fn is_captured(&self) -> bool {
        self.capture && !self.suppress_output
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppress_output
    }

    pub fn is_checked(&self) -> bool {
        self.check
    }

    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn env_vars(&self) -> &[(String, String)] {
        &self.env
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// The command as a user would type it.
    pub fn display(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 2);
        if self.root {
            parts.push("sudo".to_string());
        }
        match &self.target {
            Target::Line(line) => parts.push(line.clone()),
            Target::Script(path) => parts.push(path.display().to_string()),
        }
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    /// Exit code; `None` when the process was ended by a signal.
    pub status: Option<i32>,
    /// Captured text: stdout on success, stderr on failure. Empty unless captured.
    pub output: String,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Something that can run a [`ShellCommand`].
pub trait Shell {
    fn run(&self, command: &ShellCommand) -> Result<RunOutput, ExecError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_checked_and_uncaptured() {
        let cmd = ShellCommand::line("apt update");
        assert!(cmd.is_checked());
        assert!(!cmd.is_captured());
        assert!(!cmd.is_root());
        assert_eq!(cmd.timeout_duration(), None);
    }

    #[test]
    fn suppression_wins_over_capture() {
        let cmd = ShellCommand::line("true").capture().suppress_output();
        assert!(!cmd.is_captured());
        assert!(cmd.is_suppressed());
    }

    #[test]
    fn display_of_script() {
        let cmd = ShellCommand::script("/tmp/setup.sh").arg("--quiet").root();
        assert_eq!(cmd.display(), "sudo /tmp/setup.sh --quiet");
    }

    #[test]
    fn failed_error_names_status() {
        let err = ExecError::Failed {
            command: "false".into(),
            status: Some(1),
        };
        assert_eq!(err.to_string(), "command 'false' returned non-zero exit status 1");
    }
}
