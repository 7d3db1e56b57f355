//! Clipboard access core — set, get and clear on the shared clipboard.
//!
//! Each operation classifies its request, then runs as one closure on a
//! dedicated apartment-affined worker ([`executor`]). Inside the worker
//! the closure takes a [`lease::ClipboardLease`] and goes through either
//! the native memory bridge (`PlainAnsi`, `PlainUnicode`) or the
//! named-format accessor ([`data_object`]) for everything else.
//!
//! The `*_async` methods suspend the caller while the worker runs. The
//! blocking methods drive the async ones to completion.

pub mod data_object;
pub mod executor;
pub mod format;
pub mod lease;
pub mod path;

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::bridge;
use crate::error::ClipboardError;
use crate::native::NativeClipboard;

use executor::run_affined_async;
use format::{ContentKind, FormatRoute, TextFormat};
use lease::{ClipboardLease, RetryPolicy};
use path::{FsPathProbe, PathProbe};

/// Tunables for clipboard access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardConfig {
    /// Open attempts before an operation fails.
    pub open_attempts: u32,
    /// Pause between open attempts.
    pub retry_interval: Duration,
    /// Pause after a successful write before the worker exits, giving
    /// clipboard viewers time to pick up the change.
    pub settle_delay: Duration,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            open_attempts: retry.attempts,
            retry_interval: retry.interval,
            settle_delay: Duration::ZERO,
        }
    }
}

impl ClipboardConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.open_attempts,
            interval: self.retry_interval,
        }
    }
}

/// Entry point for clipboard operations.
///
/// Cheap to clone; clones share the same native adapter and path probe.
#[derive(Clone)]
pub struct ClipboardManager {
    native: Arc<dyn NativeClipboard>,
    probe: Arc<dyn PathProbe>,
    config: ClipboardConfig,
}

impl ClipboardManager {
    /// Compose a manager from a native adapter and a path probe.
    pub fn new(
        native: Arc<dyn NativeClipboard>,
        probe: Arc<dyn PathProbe>,
        config: ClipboardConfig,
    ) -> Self {
        Self {
            native,
            probe,
            config,
        }
    }

    /// Manager for the operating system clipboard.
    ///
    /// Fails with [`ClipboardError::Unavailable`] off Windows.
    pub fn system(config: ClipboardConfig) -> Result<Self, ClipboardError> {
        Ok(Self::new(system_native()?, Arc::new(FsPathProbe), config))
    }

    pub fn config(&self) -> &ClipboardConfig {
        &self.config
    }

    /// Put `content` on the clipboard.
    ///
    /// Blank content is ignored. A `Path` payload is normalized and must
    /// exist, otherwise [`ClipboardError::PathNotFound`] is returned and
    /// the clipboard is left as it was. Every other failure comes back as
    /// [`ClipboardError::UnsupportedWrite`].
    pub async fn set_text_async(
        &self,
        content: &str,
        kind: ContentKind,
        format: TextFormat,
    ) -> Result<(), ClipboardError> {
        if content.trim().is_empty() {
            tracing::debug!(kind = kind.description(), "blank content, clipboard unchanged");
            return Ok(());
        }

        let native = Arc::clone(&self.native);
        let config = self.config;
        let owned = content.to_string();

        let result = match kind {
            ContentKind::Path => {
                let probe = Arc::clone(&self.probe);
                run_affined_async(move || write_path(&*native, &*probe, &config, &owned)).await
            }
            ContentKind::Text => {
                run_affined_async(move || write_text(&*native, &config, &owned, format)).await
            }
        };

        result.map_err(|e| e.into_write_failure(content))
    }

    /// Blocking form of [`set_text_async`](Self::set_text_async).
    pub fn set_text(
        &self,
        content: &str,
        kind: ContentKind,
        format: TextFormat,
    ) -> Result<(), ClipboardError> {
        futures::executor::block_on(self.set_text_async(content, kind, format))
    }

    /// Read the clipboard in `format`.
    ///
    /// `None` when the format is not present. Failures come back as
    /// [`ClipboardError::ReadFailed`].
    pub async fn get_text_async(
        &self,
        format: TextFormat,
    ) -> Result<Option<String>, ClipboardError> {
        let native = Arc::clone(&self.native);
        let policy = self.config.retry_policy();

        run_affined_async(move || read_text(&*native, policy, format))
            .await
            .map_err(ClipboardError::into_read_failure)
    }

    /// Blocking form of [`get_text_async`](Self::get_text_async).
    pub fn get_text(&self, format: TextFormat) -> Result<Option<String>, ClipboardError> {
        futures::executor::block_on(self.get_text_async(format))
    }

    /// Read the current file-drop list; empty when there is none.
    pub async fn file_drop_list_async(&self) -> Result<Vec<PathBuf>, ClipboardError> {
        let native = Arc::clone(&self.native);
        let policy = self.config.retry_policy();

        run_affined_async(move || {
            let lease = ClipboardLease::acquire(&*native, policy)?;
            data_object::file_drop_list(lease.native())
        })
        .await
        .map_err(ClipboardError::into_read_failure)
    }

    /// Blocking form of [`file_drop_list_async`](Self::file_drop_list_async).
    pub fn file_drop_list(&self) -> Result<Vec<PathBuf>, ClipboardError> {
        futures::executor::block_on(self.file_drop_list_async())
    }

    /// Empty the clipboard. Clearing an empty clipboard succeeds.
    pub async fn clear_async(&self) -> Result<(), ClipboardError> {
        let native = Arc::clone(&self.native);
        let config = self.config;

        run_affined_async(move || {
            {
                let lease = ClipboardLease::acquire(&*native, config.retry_policy())?;
                lease.empty()?;
            }
            tracing::debug!("clipboard cleared");
            settle(&config);
            Ok(())
        })
        .await
    }

    /// Blocking form of [`clear_async`](Self::clear_async).
    pub fn clear(&self) -> Result<(), ClipboardError> {
        futures::executor::block_on(self.clear_async())
    }
}

#[cfg(windows)]
fn system_native() -> Result<Arc<dyn NativeClipboard>, ClipboardError> {
    Ok(Arc::new(crate::native::Win32Clipboard::new()))
}

#[cfg(not(windows))]
fn system_native() -> Result<Arc<dyn NativeClipboard>, ClipboardError> {
    Err(ClipboardError::Unavailable)
}

fn write_text(
    native: &dyn NativeClipboard,
    config: &ClipboardConfig,
    text: &str,
    format: TextFormat,
) -> Result<(), ClipboardError> {
    {
        let lease = ClipboardLease::acquire(native, config.retry_policy())?;
        lease.empty()?;
        match format.route() {
            FormatRoute::Native(code) => bridge::encode_and_set(native, text, code)?,
            FormatRoute::Named(named) => data_object::set_named(native, named, text)?,
        }
    }
    tracing::debug!(%format, "text written");
    settle(config);
    Ok(())
}

fn write_path(
    native: &dyn NativeClipboard,
    probe: &dyn PathProbe,
    config: &ClipboardConfig,
    raw: &str,
) -> Result<(), ClipboardError> {
    let path = path::normalize(raw)?;
    if !probe.exists(&path) {
        return Err(ClipboardError::PathNotFound { path });
    }

    {
        let lease = ClipboardLease::acquire(native, config.retry_policy())?;
        lease.empty()?;
        data_object::set_file_drop_list(native, std::slice::from_ref(&path))?;
    }
    tracing::debug!(path = %path.display(), "file-drop list written");
    settle(config);
    Ok(())
}

fn read_text(
    native: &dyn NativeClipboard,
    policy: RetryPolicy,
    format: TextFormat,
) -> Result<Option<String>, ClipboardError> {
    let _lease = ClipboardLease::acquire(native, policy)?;
    let text = match format.route() {
        FormatRoute::Native(code) => bridge::get_and_decode(native, code)?,
        FormatRoute::Named(named) => data_object::get_named(native, named)?,
    };
    tracing::debug!(%format, present = text.is_some(), "text read");
    Ok(text)
}

fn settle(config: &ClipboardConfig) {
    if !config.settle_delay.is_zero() {
        thread::sleep(config.settle_delay);
    }
}
