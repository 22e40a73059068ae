//! dotfiles - workstation helper commands
//!
//! A small CLI that reports what operating system it runs on, resolves
//! repository aliases to checkout directories, and installs or removes PHP
//! and Composer on apt-based distributions.
//!
//! # Architecture
//!
//! - [`cli`] - Argument parsing, the command protocol and the front door
//! - [`core`] - Version tuples, configuration, OS identity and repo aliases
//! - [`installers`] - PHP and Composer install procedures
//! - [`exec`] - Running shell lines and scripts
//! - [`ui`] - Console output and interactive prompts
//! - [`context`] - The collaborators a command runs against
//! - [`cancel`] - Ctrl-C as a shared cancellation token
//!
//! # Invariants
//!
//! 1. A command never runs when its validation fails
//! 2. Completion mode prints words and never has side effects beyond
//!    reading configuration and alias files
//! 3. An interrupt always ends the process with status 130

pub mod cancel;
pub mod cli;
pub mod context;
pub mod core;
pub mod exec;
pub mod installers;
pub mod ui;
