//! core
//!
//! Domain types and the data the commands work on.
//!
//! # Modules
//!
//! - [`version`] - Three-component version tuples and their ordering
//! - [`osinfo`] - Operating-system identity from `os-release`
//! - [`repos`] - Repository alias file and directory scan
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Home-relative paths and `~` expansion
//!
//! # Design Principles
//!
//! - Parsing is pure; I/O happens at the edges (`load` functions)
//! - Invalid input is an error, never silently corrected

pub mod config;
pub mod osinfo;
pub mod paths;
pub mod repos;
pub mod version;
