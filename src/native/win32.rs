//! Win32 clipboard adapter — `windows-sys` bindings.
//!
//! Each method is a single foreign call. Handles cross the trait as
//! integers and are cast back to `HANDLE`/`HGLOBAL` at the call site.

use std::iter;

use windows_sys::Win32::Foundation::GetLastError;
use windows_sys::Win32::System::DataExchange::{
    CloseClipboard, EmptyClipboard, GetClipboardData, IsClipboardFormatAvailable, OpenClipboard,
    RegisterClipboardFormatW, SetClipboardData,
};
use windows_sys::Win32::System::Memory::{
    GMEM_MOVEABLE, GlobalAlloc, GlobalFree, GlobalLock, GlobalSize, GlobalUnlock,
};

use super::{Handle, NativeClipboard};

/// Win32 implementation of [`NativeClipboard`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Clipboard;

impl Win32Clipboard {
    pub fn new() -> Self {
        Self
    }
}

// SAFETY: `GlobalLock` on a moveable block pins it and returns a pointer
// to `GlobalSize` bytes until the lock count drops back to zero. Blocks
// are only freed by `GlobalBlock`, which never holds a lock at that point.
unsafe impl NativeClipboard for Win32Clipboard {
    fn open(&self) -> bool {
        // SAFETY: a null owner window is allowed; the session is bound
        // to the calling thread.
        unsafe { OpenClipboard(std::ptr::null_mut()) != 0 }
    }

    fn close(&self) -> bool {
        // SAFETY: no arguments; fails harmlessly if not open.
        unsafe { CloseClipboard() != 0 }
    }

    fn empty(&self) -> bool {
        // SAFETY: fails harmlessly if the clipboard is not open.
        unsafe { EmptyClipboard() != 0 }
    }

    fn is_format_available(&self, format: u32) -> bool {
        // SAFETY: plain value argument.
        unsafe { IsClipboardFormatAvailable(format) != 0 }
    }

    fn get_data(&self, format: u32) -> Option<Handle> {
        // SAFETY: plain value argument; the result is owned by the clipboard.
        let raw = unsafe { GetClipboardData(format) } as usize;
        (raw != 0).then_some(Handle(raw))
    }

    fn set_data(&self, format: u32, handle: Handle) -> bool {
        // SAFETY: `handle` came from `global_alloc` and is not shared.
        let raw = unsafe { SetClipboardData(format, handle.0 as _) } as usize;
        raw != 0
    }

    fn register_format(&self, name: &str) -> Option<u32> {
        let wide: Vec<u16> = name.encode_utf16().chain(iter::once(0)).collect();
        // SAFETY: `wide` is NUL-terminated and outlives the call.
        let id = unsafe { RegisterClipboardFormatW(wide.as_ptr()) };
        (id != 0).then_some(id)
    }

    fn global_alloc(&self, bytes: usize) -> Option<Handle> {
        // SAFETY: plain value arguments.
        let raw = unsafe { GlobalAlloc(GMEM_MOVEABLE, bytes) } as usize;
        (raw != 0).then_some(Handle(raw))
    }

    fn global_lock(&self, handle: Handle) -> *mut u8 {
        // SAFETY: an invalid handle yields null, which callers check.
        unsafe { GlobalLock(handle.0 as _) as *mut u8 }
    }

    fn global_unlock(&self, handle: Handle) {
        // SAFETY: paired with a successful `global_lock` by `BlockLock`.
        unsafe {
            GlobalUnlock(handle.0 as _);
        }
    }

    fn global_size(&self, handle: Handle) -> usize {
        // SAFETY: an invalid handle yields 0.
        unsafe { GlobalSize(handle.0 as _) }
    }

    fn global_free(&self, handle: Handle) {
        // SAFETY: only called by `GlobalBlock` for blocks it still owns.
        unsafe {
            GlobalFree(handle.0 as _);
        }
    }

    fn last_error(&self) -> u32 {
        // SAFETY: no arguments.
        unsafe { GetLastError() }
    }
}
