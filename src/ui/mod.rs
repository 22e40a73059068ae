//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`prompts`] - Interactive prompts and confirmations
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! Commands reach the terminal only through the
//! [`Console`](output::Console) and [`Prompter`](prompts::Prompter) held by
//! their [`Context`](crate::context::Context), so tests can swap both out.

pub mod output;
pub mod prompts;
