//! Clipboard lease — exclusive, retry-acquired clipboard session.
//!
//! The session is closed exactly once, when the lease drops.

use std::thread;
use std::time::Duration;

use crate::error::ClipboardError;
use crate::native::NativeClipboard;

/// Bounded retry for opening the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total open attempts before giving up (at least one is made).
    pub attempts: u32,
    /// Pause after each failed attempt.
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            interval: Duration::from_millis(100),
        }
    }
}

/// An open clipboard session owned by the current thread.
pub struct ClipboardLease<'a> {
    native: &'a dyn NativeClipboard,
}

impl<'a> ClipboardLease<'a> {
    /// Open the clipboard, retrying per `policy`.
    ///
    /// Fails with `NativeOperationFailed` carrying the last platform
    /// error once every attempt has failed.
    pub fn acquire(
        native: &'a dyn NativeClipboard,
        policy: RetryPolicy,
    ) -> Result<Self, ClipboardError> {
        let attempts = policy.attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            if native.open() {
                tracing::debug!(attempt, "clipboard opened");
                return Ok(Self { native });
            }

            let code = native.last_error();
            if attempt >= attempts {
                tracing::warn!(attempts, code, "clipboard still busy, giving up");
                return Err(ClipboardError::NativeOperationFailed { code });
            }

            tracing::debug!(attempt, code, "clipboard busy, retrying");
            thread::sleep(policy.interval);
        }
    }

    /// Empty the clipboard, freeing every OS-held block.
    pub fn empty(&self) -> Result<(), ClipboardError> {
        if self.native.empty() {
            Ok(())
        } else {
            Err(ClipboardError::NativeOperationFailed {
                code: self.native.last_error(),
            })
        }
    }

    pub fn native(&self) -> &'a dyn NativeClipboard {
        self.native
    }
}

impl Drop for ClipboardLease<'_> {
    fn drop(&mut self) {
        if self.native.close() {
            tracing::debug!("clipboard closed");
        } else {
            tracing::warn!(code = self.native.last_error(), "CloseClipboard failed");
        }
    }
}
