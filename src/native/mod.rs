//! Native clipboard surface — the raw calls the access core is built on.
//!
//! [`NativeClipboard`] mirrors the Win32 clipboard and global-memory API
//! one call per method, with no policy of its own. Retry, ownership and
//! encoding live above it (`clipboard::lease`, `block`, `bridge`).
//!
//! Adapters:
//! - [`Win32Clipboard`] (Windows only) — `windows-sys` bindings.
//! - `EmulatedClipboard` (`emulated` feature, and always under test) —
//!   in-process implementation of the same contract, used to exercise the
//!   core without a desktop session.

pub(crate) mod block;
#[cfg(any(test, feature = "emulated"))]
pub mod emulated;
#[cfg(windows)]
pub mod win32;

#[cfg(any(test, feature = "emulated"))]
pub use emulated::EmulatedClipboard;
#[cfg(windows)]
pub use win32::Win32Clipboard;

/// `CF_TEXT` — single-byte text.
pub const CF_TEXT: u32 = 1;

/// `CF_UNICODETEXT` — UTF-16LE text.
pub const CF_UNICODETEXT: u32 = 13;

/// `CF_HDROP` — file-drop list (`DROPFILES` header plus path list).
pub const CF_HDROP: u32 = 15;

/// Opaque handle to a global memory block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(pub usize);

/// Raw clipboard and global-memory primitives.
///
/// Boolean and `Option` returns follow the native convention: a failure
/// leaves its reason in [`last_error`](NativeClipboard::last_error) for
/// the calling thread.
///
/// `Send + Sync` is required because every operation runs on its own
/// worker thread with a shared reference to the adapter.
///
/// # Safety
///
/// The block guards build slices from what the memory primitives report,
/// so implementors must guarantee that a non-null pointer returned by
/// [`global_lock`](NativeClipboard::global_lock) is valid for reads and
/// writes of [`global_size`](NativeClipboard::global_size) bytes, and
/// stays valid and unmoved until the matching
/// [`global_unlock`](NativeClipboard::global_unlock).
pub unsafe trait NativeClipboard: Send + Sync {
    /// `OpenClipboard` — take the clipboard session for this thread.
    fn open(&self) -> bool;

    /// `CloseClipboard`.
    fn close(&self) -> bool;

    /// `EmptyClipboard` — drop every format and free the OS-held blocks.
    fn empty(&self) -> bool;

    /// `IsClipboardFormatAvailable`. Does not require an open session.
    fn is_format_available(&self, format: u32) -> bool;

    /// `GetClipboardData`. The returned block stays owned by the clipboard.
    fn get_data(&self, format: u32) -> Option<Handle>;

    /// `SetClipboardData`. On success the clipboard owns `handle`.
    fn set_data(&self, format: u32, handle: Handle) -> bool;

    /// `RegisterClipboardFormatW` — resolve a format name to its code.
    fn register_format(&self, name: &str) -> Option<u32>;

    /// `GlobalAlloc(GMEM_MOVEABLE, bytes)`.
    fn global_alloc(&self, bytes: usize) -> Option<Handle>;

    /// `GlobalLock`. Null on failure.
    fn global_lock(&self, handle: Handle) -> *mut u8;

    /// `GlobalUnlock`.
    fn global_unlock(&self, handle: Handle);

    /// `GlobalSize`. May exceed the size requested at allocation.
    fn global_size(&self, handle: Handle) -> usize;

    /// `GlobalFree`. A locked block must not be released.
    fn global_free(&self, handle: Handle);

    /// `GetLastError` for the calling thread.
    fn last_error(&self) -> u32;
}
