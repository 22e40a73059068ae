//! dotfiles binary entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    dotfiles::cli::run()
}
