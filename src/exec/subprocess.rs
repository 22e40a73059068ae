//! exec::subprocess
//!
//! [`SystemShell`]: runs [`ShellCommand`]s as child processes.
//!
//! Shell lines go through the user's shell (`$SHELL -c`, `/bin/sh` when
//! unset, `cmd /C` on Windows). Scripts are executed directly.
//!
//! The child is polled until it exits or its timeout passes; a timed-out
//! child is killed and reaped. Captured pipes are drained on reader threads
//! so a chatty child cannot block on a full pipe while we poll.

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::{ExecError, RunOutput, Shell, ShellCommand, Target};
use crate::cancel::CancellationToken;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The real process runner.
#[derive(Debug, Clone)]
pub struct SystemShell {
    cancel: CancellationToken,
    default_timeout: Option<Duration>,
}

impl SystemShell {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            default_timeout: None,
        }
    }

    /// Timeout applied to commands that do not set their own.
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    fn build(&self, command: &ShellCommand) -> Result<Command, ExecError> {
        let mut cmd = match command.target() {
            Target::Line(_) => shell_line(&command.display()),
            Target::Script(path) => {
                if !path.exists() {
                    return Err(ExecError::ScriptNotFound(path.clone()));
                }
                let mut cmd = if command.is_root() {
                    let mut sudo = Command::new("sudo");
                    sudo.arg(path);
                    sudo
                } else {
                    Command::new(path)
                };
                cmd.args(command.arguments());
                cmd
            }
        };

        for (key, value) in command.env_vars() {
            cmd.env(key, value);
        }
        if let Some(dir) = command.working_dir() {
            cmd.current_dir(dir);
        }

        if command.is_suppressed() {
            cmd.stdout(Stdio::null());
        } else if command.is_captured() {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        }

        Ok(cmd)
    }
}

#[cfg(windows)]
fn shell_line(line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(line);
    cmd
}

#[cfg(not(windows))]
fn shell_line(line: &str) -> Command {
    let shell = std::env::var("SHELL")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "/bin/sh".to_string());
    let mut cmd = Command::new(shell);
    cmd.arg("-c").arg(line);
    cmd
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            // A read error leaves whatever was collected so far
            let _ = pipe.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Wait for `child`, killing it once `timeout` has passed.
fn wait_with_timeout(
    child: &mut Child,
    command: &str,
    timeout: Option<Duration>,
) -> Result<Option<i32>, ExecError> {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!(
                    command,
                    exit_code = ?status.code(),
                    duration_ms = start.elapsed().as_millis(),
                    "command finished"
                );
                return Ok(status.code());
            }
            Ok(None) => {
                if let Some(limit) = timeout {
                    if start.elapsed() > limit {
                        warn!(command, timeout_secs = limit.as_secs(), "command timed out, killing");
                        if let Err(e) = child.kill() {
                            warn!(error = %e, "failed to kill timed-out command");
                        }
                        let _ = child.wait();
                        return Err(ExecError::Timeout {
                            command: command.to_string(),
                            timeout_secs: limit.as_secs(),
                        });
                    }
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(source) => {
                return Err(ExecError::Wait {
                    command: command.to_string(),
                    source,
                });
            }
        }
    }
}

impl Shell for SystemShell {
    fn run(&self, command: &ShellCommand) -> Result<RunOutput, ExecError> {
        let line = command.display();
        let timeout = command.timeout_duration().or(self.default_timeout);
        debug!(
            command = %line,
            captured = command.is_captured(),
            timeout_secs = ?timeout.map(|t| t.as_secs()),
            "running command"
        );

        let mut cmd = self.build(command)?;
        let _hold = self.cancel.hold();
        let mut child = cmd.spawn().map_err(|source| ExecError::Spawn {
            command: line.clone(),
            source,
        })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let waited = wait_with_timeout(&mut child, &line, timeout);
        let stdout = collect(stdout);
        let stderr = collect(stderr);

        // Ctrl-C reaches the child too; report the interrupt, not its status
        self.cancel.check()?;
        let status = waited?;

        let success = status == Some(0);
        if command.is_checked() && !success {
            if command.is_captured() && !stderr.trim().is_empty() {
                debug!(command = %line, stderr = %stderr.trim(), "command failed");
            }
            return Err(ExecError::Failed {
                command: line,
                status,
            });
        }

        let output = if !command.is_captured() {
            String::new()
        } else if success {
            stdout
        } else {
            stderr
        };

        Ok(RunOutput { status, output })
    }
}
