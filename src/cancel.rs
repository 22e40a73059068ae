//! cancel
//!
//! Ctrl-C handling through an explicit cancellation token.
//!
//! # Design
//!
//! The token is set from the Ctrl-C handler. What happens next depends on
//! whether a collaborator is *holding* the token:
//!
//! - nobody holds it (the user is at a prompt, or nothing has started): the
//!   handler exits the process with [`INTERRUPTED_EXIT_CODE`] right away
//! - a child process or download holds it: the handler only flags the token;
//!   the holder checks it once the blocking call returns and reports
//!   [`Interrupted`], which unwinds through normal `Drop` cleanup
//!
//! # Example
//!
//! ```
//! use dotfiles::cancel::CancellationToken;
//!
//! let token = CancellationToken::new();
//! {
//!     let _hold = token.hold();
//!     assert!(token.is_held());
//!     token.cancel();
//! }
//! assert!(!token.is_held());
//! assert!(token.check().is_err());
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// Process status for a run cut short by Ctrl-C.
pub const INTERRUPTED_EXIT_CODE: u8 = 130;

/// The user interrupted the program.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("interrupted")]
pub struct Interrupted;

#[derive(Debug, Default)]
struct State {
    cancelled: AtomicBool,
    holders: AtomicUsize,
}

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    state: Arc<State>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Fail with [`Interrupted`] once the token has been cancelled.
    pub fn check(&self) -> Result<(), Interrupted> {
        if self.is_cancelled() {
            Err(Interrupted)
        } else {
            Ok(())
        }
    }

    /// Mark a blocking section that will check the token itself.
    pub fn hold(&self) -> Hold {
        self.state.holders.fetch_add(1, Ordering::SeqCst);
        Hold {
            state: Arc::clone(&self.state),
        }
    }

    pub fn is_held(&self) -> bool {
        self.state.holders.load(Ordering::SeqCst) > 0
    }

    /// Install the process-wide Ctrl-C handler for this token.
    pub fn install_handler(&self) -> Result<(), ctrlc::Error> {
        let token = self.clone();
        ctrlc::set_handler(move || {
            token.cancel();
            if !token.is_held() {
                std::process::exit(i32::from(INTERRUPTED_EXIT_CODE));
            }
        })
    }
}

/// Guard returned by [`CancellationToken::hold`].
#[derive(Debug)]
pub struct Hold {
    state: Arc<State>,
}

impl Drop for Hold {
    fn drop(&mut self) {
        self.state.holders.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_token_is_clear() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        assert!(token.check().is_ok());
    }

    #[test]
    fn clones_share_state() {
        let token = CancellationToken::new();
        let other = token.clone();
        other.cancel();
        assert_eq!(token.check(), Err(Interrupted));
    }

    #[test]
    fn holds_nest() {
        let token = CancellationToken::new();
        let outer = token.hold();
        let inner = token.hold();
        drop(inner);
        assert!(token.is_held());
        drop(outer);
        assert!(!token.is_held());
    }
}
