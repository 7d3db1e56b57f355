//! Error taxonomy for clipboard operations.
//!
//! Worker-thread failures are captured on the worker and handed back to
//! the waiting caller as one of these variants. `set_text` and `get_text`
//! normalize everything except [`ClipboardError::PathNotFound`] into
//! [`ClipboardError::UnsupportedWrite`] and [`ClipboardError::ReadFailed`].

use std::path::PathBuf;

/// Clipboard access errors.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    /// A native clipboard or global-memory call failed. `code` is the
    /// platform's last-error value at the time of failure.
    #[error("native clipboard call failed (error code {code})")]
    NativeOperationFailed { code: u32 },

    /// A `Path` payload resolved to neither an existing file nor directory.
    #[error("path not found: {}", path.display())]
    PathNotFound { path: PathBuf },

    /// Any failure while writing, with the content that was being written.
    #[error("\"{content}\" could not be written to the clipboard: {cause}")]
    UnsupportedWrite { content: String, cause: String },

    /// Any failure while reading a format back.
    #[error("clipboard read failed: {cause}")]
    ReadFailed { cause: String },

    /// The worker thread panicked or could not be started.
    #[error("clipboard worker: {0}")]
    Worker(String),

    /// No native clipboard exists for this target.
    #[error("native clipboard is not available on this platform")]
    Unavailable,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClipboardError {
    /// Wrap a write failure, keeping path validation errors as they are.
    pub(crate) fn into_write_failure(self, content: &str) -> Self {
        match self {
            err @ ClipboardError::PathNotFound { .. } => err,
            other => ClipboardError::UnsupportedWrite {
                content: content.to_string(),
                cause: other.to_string(),
            },
        }
    }

    /// Wrap a read failure.
    pub(crate) fn into_read_failure(self) -> Self {
        match self {
            err @ ClipboardError::ReadFailed { .. } => err,
            other => ClipboardError::ReadFailed {
                cause: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_failure_wraps_native_error() {
        let err = ClipboardError::NativeOperationFailed { code: 5 }.into_write_failure("hello");
        match err {
            ClipboardError::UnsupportedWrite { content, cause } => {
                assert_eq!(content, "hello");
                assert!(cause.contains("error code 5"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn write_failure_keeps_path_not_found() {
        let err = ClipboardError::PathNotFound {
            path: PathBuf::from("/missing"),
        }
        .into_write_failure("/missing");
        assert!(matches!(err, ClipboardError::PathNotFound { .. }));
    }

    #[test]
    fn read_failure_is_not_double_wrapped() {
        let err = ClipboardError::Worker("boom".into()).into_read_failure();
        let err = err.into_read_failure();
        match err {
            ClipboardError::ReadFailed { cause } => assert_eq!(cause, "clipboard worker: boom"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
