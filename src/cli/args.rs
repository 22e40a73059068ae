//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version (top level only)
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Data output only
//! - `--completion` (hidden): Print the words that may follow instead of
//!   running; used by the shell completion scripts
//!
//! # Argument ids
//!
//! Commands read their values back by id through
//! [`Arguments`](super::arguments::Arguments), so every value-carrying field
//! here is either a `bool` flag or a `String`.

use clap::{Args, Parser, Subcommand};

/// Workstation helper commands
#[derive(Parser, Debug)]
#[command(name = "dotfiles")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print completion words for the command line so far
    #[arg(long, global = true, hide = true)]
    pub completion: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Data output only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Display basic info about your os
    #[command(
        name = "osinfo",
        long_about = "Display basic info about your os.\n\n\
            Without an option the operating system name is printed. At most one \
            option may be given.",
        after_help = "\
EXAMPLES:
    # Distribution id, e.g. for scripts that branch on it
    dotfiles osinfo --id

    # Version codename (e.g. noble, bookworm)
    dotfiles osinfo -c"
    )]
    Osinfo(OsinfoArgs),

    /// Repo aliases
    #[command(
        name = "repos",
        long_about = "Repo aliases.\n\n\
            Aliases come from the repo aliases file (`key = path` per line) merged \
            with every directory under the repos directory. Without arguments a \
            table of all aliases is printed.",
        after_help = "\
EXAMPLES:
    # Jump to a repository by alias
    cd \"$(dotfiles repos dotfiles)\"

    # Comma separated list of keys
    dotfiles repos --list-keys --sep ','"
    )]
    Repos(ReposArgs),

    /// Install a program
    #[command(name = "install")]
    Install {
        #[command(subcommand)]
        target: Option<InstallTarget>,
    },

    /// Uninstall a program
    #[command(name = "uninstall")]
    Uninstall {
        #[command(subcommand)]
        target: Option<UninstallTarget>,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    dotfiles completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    dotfiles completion zsh >> ~/.zshrc"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// `osinfo` options.
#[derive(Args, Debug, Clone, Default)]
pub struct OsinfoArgs {
    /// Get the codename
    #[arg(short, long)]
    pub codename: bool,

    /// Get the distro
    #[arg(short, long)]
    pub id: bool,

    /// Get the distro that the current distro is like (for Linux)
    #[arg(short, long)]
    pub like: bool,

    /// Get the pretty name
    #[arg(short, long)]
    pub pretty: bool,

    /// Get the simplified os type (windows|mac|linux)
    #[arg(short, long)]
    pub simplified: bool,

    /// Get the os version
    #[arg(short, long)]
    pub version: bool,
}

/// `repos` options.
#[derive(Args, Debug, Clone, Default)]
pub struct ReposArgs {
    /// Get path by alias key
    pub key: Option<String>,

    /// The directory where your git repositories are located [default: ~/repos]
    #[arg(long, value_name = "DIR")]
    pub repos_path: Option<String>,

    /// Repo aliases file path [default: ~/.repo-aliases]
    #[arg(long, value_name = "FILE")]
    pub file_path: Option<String>,

    /// List keys
    #[arg(long)]
    pub list_keys: bool,

    /// List paths
    #[arg(long)]
    pub list_paths: bool,

    /// Separator for listing keys and paths; backslash escapes are decoded [default: \n]
    #[arg(long)]
    pub sep: Option<String>,
}

/// `install` subcommands.
#[derive(Subcommand, Debug)]
pub enum InstallTarget {
    /// Install php-composer
    Composer,

    /// Install php
    Php {
        /// Version to install, e.g. 8.3
        version: Option<String>,

        /// Package set to install
        #[arg(short, long, value_parser = ["desktop", "server"])]
        env: Option<String>,

        /// Also install Composer, into DIR if given
        #[arg(
            long,
            value_name = "DIR",
            num_args = 0..=1,
            require_equals = true,
            default_missing_value = ""
        )]
        composer: Option<String>,
    },
}

/// `uninstall` subcommands.
#[derive(Subcommand, Debug)]
pub enum UninstallTarget {
    /// Uninstall php-composer
    Composer,

    /// Uninstall php
    Php {
        /// Version to uninstall, e.g. 8.3
        version: Option<String>,

        /// Also uninstall Composer
        #[arg(long)]
        composer: bool,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
