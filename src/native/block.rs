//! Global memory blocks with scoped lock and ownership tracking.
//!
//! A [`GlobalBlock`] is freed on drop unless it was handed to the
//! clipboard by [`GlobalBlock::hand_off`]. A [`BlockLock`] unlocks on
//! drop. Both guards cover every exit path, including early `?` returns.

use std::ptr::NonNull;
use std::slice;

use super::{Handle, NativeClipboard};
use crate::error::ClipboardError;

/// `ERROR_INSUFFICIENT_BUFFER`, reported when a payload outgrows its block.
const ERROR_INSUFFICIENT_BUFFER: u32 = 122;

/// A locked view of a global memory block.
///
/// Only constructed inside the crate, where no block is freed while a
/// guard for it is alive.
pub(crate) struct BlockLock<'a> {
    native: &'a dyn NativeClipboard,
    handle: Handle,
    ptr: NonNull<u8>,
    len: usize,
}

impl<'a> BlockLock<'a> {
    /// Lock `handle` and measure it with `GlobalSize`.
    pub(crate) fn acquire(
        native: &'a dyn NativeClipboard,
        handle: Handle,
    ) -> Result<Self, ClipboardError> {
        let ptr = NonNull::new(native.global_lock(handle)).ok_or_else(|| {
            ClipboardError::NativeOperationFailed {
                code: native.last_error(),
            }
        })?;
        let len = native.global_size(handle);

        Ok(Self {
            native,
            handle,
            ptr,
            len,
        })
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        // SAFETY: the `NativeClipboard` contract keeps the pointer valid for
        // `len` bytes while the block is locked, and it stays locked for the
        // lifetime of this guard.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as above; `&mut self` makes this the only live view.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for BlockLock<'_> {
    fn drop(&mut self) {
        self.native.global_unlock(self.handle);
    }
}

/// An allocated global block owned by this process until handed off.
pub(crate) struct GlobalBlock<'a> {
    native: &'a dyn NativeClipboard,
    handle: Handle,
    owned: bool,
}

impl<'a> GlobalBlock<'a> {
    /// Allocate a moveable block of `bytes` bytes.
    pub fn alloc(native: &'a dyn NativeClipboard, bytes: usize) -> Result<Self, ClipboardError> {
        let handle = native
            .global_alloc(bytes)
            .ok_or_else(|| ClipboardError::NativeOperationFailed {
                code: native.last_error(),
            })?;

        Ok(Self {
            native,
            handle,
            owned: true,
        })
    }

    /// Copy `payload` into the start of the block under a scoped lock.
    pub fn fill(&mut self, payload: &[u8]) -> Result<(), ClipboardError> {
        let mut lock = BlockLock::acquire(self.native, self.handle)?;
        let target = lock
            .as_mut_slice()
            .get_mut(..payload.len())
            .ok_or(ClipboardError::NativeOperationFailed {
                code: ERROR_INSUFFICIENT_BUFFER,
            })?;
        target.copy_from_slice(payload);
        Ok(())
    }

    /// Give the block to the clipboard under `format`.
    ///
    /// On success the clipboard owns the block and it must not be freed.
    /// On failure the block is freed when `self` drops.
    pub fn hand_off(mut self, format: u32) -> Result<(), ClipboardError> {
        if self.native.set_data(format, self.handle) {
            self.owned = false;
            Ok(())
        } else {
            Err(ClipboardError::NativeOperationFailed {
                code: self.native.last_error(),
            })
        }
    }

    /// Allocate, fill and hand off `payload` in one step.
    pub fn publish(
        native: &'a dyn NativeClipboard,
        format: u32,
        payload: &[u8],
    ) -> Result<(), ClipboardError> {
        let mut block = Self::alloc(native, payload.len())?;
        block.fill(payload)?;
        block.hand_off(format)
    }
}

impl Drop for GlobalBlock<'_> {
    fn drop(&mut self) {
        if self.owned {
            self.native.global_free(self.handle);
        }
    }
}

/// Copy the full contents of a clipboard-owned block.
///
/// Reads exactly `GlobalSize` bytes. The handle is not freed.
pub(crate) fn read_block(native: &dyn NativeClipboard, handle: Handle) -> Result<Vec<u8>, ClipboardError> {
    let lock = BlockLock::acquire(native, handle)?;
    Ok(lock.as_slice().to_vec())
}
