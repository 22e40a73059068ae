//! context
//!
//! The collaborators a command runs against.
//!
//! `main` builds one [`Context`] from the real system; tests build one from
//! fakes with [`Context::new`].

use crate::cancel::CancellationToken;
use crate::core::config::Config;
use crate::core::osinfo::OsInfo;
use crate::exec::{Shell, SystemShell};
use crate::ui::output::{Console, Verbosity};
use crate::ui::prompts::{LinePrompter, Prompter};

/// Everything a command needs from the outside world.
pub struct Context {
    pub os: OsInfo,
    pub shell: Box<dyn Shell>,
    pub prompter: Box<dyn Prompter>,
    pub console: Console,
    pub config: Config,
    pub cancel: CancellationToken,
}

impl Context {
    pub fn new(
        os: OsInfo,
        shell: Box<dyn Shell>,
        prompter: Box<dyn Prompter>,
        console: Console,
        config: Config,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            os,
            shell,
            prompter,
            console,
            config,
            cancel,
        }
    }

    /// Context backed by real processes, stdin/stdout and the detected OS.
    pub fn system(config: Config, verbosity: Verbosity, cancel: CancellationToken) -> Self {
        let shell = SystemShell::new(cancel.clone()).with_default_timeout(config.exec_timeout());
        let os = OsInfo::detect(&shell);

        Self {
            os,
            shell: Box::new(shell),
            prompter: Box::new(LinePrompter::stdio()),
            console: Console::stdout(verbosity),
            config,
            cancel,
        }
    }

    pub fn shell(&self) -> &dyn Shell {
        self.shell.as_ref()
    }

    pub fn prompter(&self) -> &dyn Prompter {
        self.prompter.as_ref()
    }
}
