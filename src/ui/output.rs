//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Commands write through a [`Console`] rather than `println!` so tests can
//! capture what a command printed. Data output (paths, OS fields, completion
//! tokens) is always written; chatter respects the quiet flag.

use std::cell::RefCell;
use std::fmt::Display;
use std::io::{self, Write};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - data output only
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Destination for command output.
#[derive(Debug)]
pub struct Console {
    verbosity: Verbosity,
    capture: Option<RefCell<Vec<u8>>>,
}

impl Console {
    /// Write to the process's stdout.
    pub fn stdout(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            capture: None,
        }
    }

    /// Collect output in memory; read it back with [`Console::captured`].
    pub fn captured_with(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            capture: Some(RefCell::new(Vec::new())),
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Everything written so far when capturing; empty otherwise.
    pub fn captured(&self) -> String {
        self.capture
            .as_ref()
            .map(|buf| String::from_utf8_lossy(&buf.borrow()).into_owned())
            .unwrap_or_default()
    }

    fn write_raw(&self, text: &str) {
        match &self.capture {
            Some(buf) => buf.borrow_mut().extend_from_slice(text.as_bytes()),
            None => {
                let mut out = io::stdout().lock();
                // A closed stdout (e.g. piped into `head`) is not an error here
                let _ = out.write_all(text.as_bytes());
                let _ = out.flush();
            }
        }
    }

    /// Write a line of data output. Always shown.
    pub fn line(&self, message: impl Display) {
        self.write_raw(&format!("{message}\n"));
    }

    /// Write items joined by `sep`, then a newline. Always shown.
    pub fn joined<T: Display>(&self, items: &[T], sep: &str) {
        let body = items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(sep);
        self.line(body);
    }

    /// Write an informational message (respects quiet mode).
    pub fn info(&self, message: impl Display) {
        if self.verbosity != Verbosity::Quiet {
            self.line(message);
        }
    }

    /// Write an empty line (respects quiet mode).
    pub fn blank(&self) {
        self.info("");
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}
