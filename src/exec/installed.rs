//! exec::installed
//!
//! Is a program available on this machine?
//!
//! Only as good as the name you ask about: it must match either a command on
//! `PATH` or a dpkg package name.

use super::{Shell, ShellCommand};

/// A program is installed when it is on `PATH` or dpkg lists it.
pub fn installed(shell: &dyn Shell, program: &str) -> bool {
    is_cmd_installed(program) || is_pkg_installed(shell, program)
}

/// Whether `program` resolves to an executable on `PATH`.
pub fn is_cmd_installed(program: &str) -> bool {
    which::which(program).is_ok()
}

/// Whether dpkg reports `package` as installed.
pub fn is_pkg_installed(shell: &dyn Shell, package: &str) -> bool {
    let line = format!("dpkg -l | grep -E '^ii' | grep -iwq '{package}'");
    shell
        .run(&ShellCommand::line(line).unchecked().suppress_output())
        .map(|out| out.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{ExecError, RunOutput};
    use std::cell::RefCell;

    struct Recorder {
        status: i32,
        seen: RefCell<Vec<String>>,
    }

    impl Shell for Recorder {
        fn run(&self, command: &ShellCommand) -> Result<RunOutput, ExecError> {
            self.seen.borrow_mut().push(command.display());
            Ok(RunOutput {
                status: Some(self.status),
                output: String::new(),
            })
        }
    }

    #[test]
    fn package_check_asks_dpkg() {
        let shell = Recorder {
            status: 0,
            seen: RefCell::new(Vec::new()),
        };
        assert!(is_pkg_installed(&shell, "php8.3"));
        assert_eq!(
            shell.seen.borrow()[0],
            "dpkg -l | grep -E '^ii' | grep -iwq 'php8.3'"
        );
    }

    #[test]
    fn missing_everywhere_is_not_installed() {
        let shell = Recorder {
            status: 1,
            seen: RefCell::new(Vec::new()),
        };
        assert!(!installed(&shell, "definitely-not-a-real-program-xyz"));
    }
}
