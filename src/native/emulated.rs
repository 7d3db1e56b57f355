//! In-process clipboard implementing the native contract.
//!
//! Behaves like the Win32 clipboard as seen from one process: a single
//! session owner (by thread), format slots that own their blocks, heap
//! blocks with lock counts, and a per-thread last-error value. A few
//! hooks simulate conditions that are hard to produce on demand, such as
//! another process holding the clipboard.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use super::{Handle, NativeClipboard};

const ERROR_ACCESS_DENIED: u32 = 5;
const ERROR_INVALID_HANDLE: u32 = 6;
const ERROR_INVALID_PARAMETER: u32 = 87;
const ERROR_LOCKED: u32 = 158;
const ERROR_CLIPBOARD_NOT_OPEN: u32 = 1418;

/// Registered format codes start here, as on Windows.
const FIRST_REGISTERED_FORMAT: u32 = 0xC000;

thread_local! {
    static LAST_ERROR: Cell<u32> = const { Cell::new(0) };
}

fn set_last_error(code: u32) {
    LAST_ERROR.with(|e| e.set(code));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Thread(ThreadId),
    /// Held by something outside this process.
    Foreign,
}

#[derive(Debug)]
struct Block {
    data: Box<[u8]>,
    locks: u32,
    /// Set once the block has been handed to a format slot.
    on_clipboard: bool,
}

#[derive(Debug, Default)]
struct State {
    owner: Option<Owner>,
    slots: BTreeMap<u32, Handle>,
    blocks: HashMap<usize, Block>,
    next_handle: usize,
    registered: HashMap<String, u32>,
    fail_set_data: Option<u32>,
}

impl State {
    fn held_by_caller(&self) -> bool {
        self.owner == Some(Owner::Thread(thread::current().id()))
    }
}

/// Process-local clipboard with Win32 semantics.
#[derive(Debug, Default)]
pub struct EmulatedClipboard {
    state: Mutex<State>,
}

impl EmulatedClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open the clipboard on behalf of another process.
    ///
    /// Returns `false` if a session is already open.
    pub fn seize_for_foreign_process(&self) -> bool {
        let mut state = self.state();
        if state.owner.is_some() {
            return false;
        }
        state.owner = Some(Owner::Foreign);
        true
    }

    /// Close a session opened by [`seize_for_foreign_process`](Self::seize_for_foreign_process).
    pub fn release_foreign_process(&self) {
        let mut state = self.state();
        if state.owner == Some(Owner::Foreign) {
            state.owner = None;
        }
    }

    /// Make the next `set_data` call fail with `code`.
    pub fn fail_next_set_data(&self, code: u32) {
        self.state().fail_set_data = Some(code);
    }

    /// Blocks allocated but neither freed nor owned by the clipboard.
    pub fn outstanding_blocks(&self) -> usize {
        self.state()
            .blocks
            .values()
            .filter(|b| !b.on_clipboard)
            .count()
    }

    /// Blocks with a non-zero lock count.
    pub fn locked_blocks(&self) -> usize {
        self.state().blocks.values().filter(|b| b.locks > 0).count()
    }

    /// Format codes currently on the clipboard, in ascending order.
    pub fn available_formats(&self) -> Vec<u32> {
        self.state().slots.keys().copied().collect()
    }

    /// Whether any session (ours or foreign) is open.
    pub fn is_open(&self) -> bool {
        self.state().owner.is_some()
    }
}

// SAFETY: block data is a boxed slice that is never resized, and a block
// with a non-zero lock count is never removed by `global_free`.
unsafe impl NativeClipboard for EmulatedClipboard {
    fn open(&self) -> bool {
        let mut state = self.state();
        let me = Owner::Thread(thread::current().id());
        match state.owner {
            None => {
                state.owner = Some(me);
                true
            }
            Some(owner) if owner == me => true,
            Some(_) => {
                set_last_error(ERROR_ACCESS_DENIED);
                false
            }
        }
    }

    fn close(&self) -> bool {
        let mut state = self.state();
        if !state.held_by_caller() {
            set_last_error(ERROR_CLIPBOARD_NOT_OPEN);
            return false;
        }
        state.owner = None;
        true
    }

    fn empty(&self) -> bool {
        let mut state = self.state();
        if !state.held_by_caller() {
            set_last_error(ERROR_CLIPBOARD_NOT_OPEN);
            return false;
        }
        let handles: Vec<Handle> = std::mem::take(&mut state.slots).into_values().collect();
        for handle in handles {
            state.blocks.remove(&handle.0);
        }
        true
    }

    fn is_format_available(&self, format: u32) -> bool {
        self.state().slots.contains_key(&format)
    }

    fn get_data(&self, format: u32) -> Option<Handle> {
        let state = self.state();
        if !state.held_by_caller() {
            set_last_error(ERROR_CLIPBOARD_NOT_OPEN);
            return None;
        }
        state.slots.get(&format).copied()
    }

    fn set_data(&self, format: u32, handle: Handle) -> bool {
        let mut state = self.state();
        if !state.held_by_caller() {
            set_last_error(ERROR_CLIPBOARD_NOT_OPEN);
            return false;
        }
        if let Some(code) = state.fail_set_data.take() {
            set_last_error(code);
            return false;
        }
        match state.blocks.get_mut(&handle.0) {
            Some(block) if !block.on_clipboard => block.on_clipboard = true,
            _ => {
                set_last_error(ERROR_INVALID_HANDLE);
                return false;
            }
        }
        if let Some(previous) = state.slots.insert(format, handle) {
            state.blocks.remove(&previous.0);
        }
        true
    }

    fn register_format(&self, name: &str) -> Option<u32> {
        if name.is_empty() {
            set_last_error(ERROR_INVALID_PARAMETER);
            return None;
        }
        let mut state = self.state();
        let next = FIRST_REGISTERED_FORMAT + state.registered.len() as u32;
        // Format names are case-insensitive.
        Some(
            *state
                .registered
                .entry(name.to_ascii_lowercase())
                .or_insert(next),
        )
    }

    fn global_alloc(&self, bytes: usize) -> Option<Handle> {
        let mut state = self.state();
        state.next_handle += 1;
        let id = state.next_handle;
        state.blocks.insert(
            id,
            Block {
                data: vec![0u8; bytes].into_boxed_slice(),
                locks: 0,
                on_clipboard: false,
            },
        );
        Some(Handle(id))
    }

    fn global_lock(&self, handle: Handle) -> *mut u8 {
        let mut state = self.state();
        match state.blocks.get_mut(&handle.0) {
            Some(block) => {
                block.locks += 1;
                block.data.as_mut_ptr()
            }
            None => {
                set_last_error(ERROR_INVALID_HANDLE);
                std::ptr::null_mut()
            }
        }
    }

    fn global_unlock(&self, handle: Handle) {
        if let Some(block) = self.state().blocks.get_mut(&handle.0) {
            block.locks = block.locks.saturating_sub(1);
        }
    }

    fn global_size(&self, handle: Handle) -> usize {
        match self.state().blocks.get(&handle.0) {
            Some(block) => block.data.len(),
            None => {
                set_last_error(ERROR_INVALID_HANDLE);
                0
            }
        }
    }

    fn global_free(&self, handle: Handle) {
        let mut state = self.state();
        match state.blocks.get(&handle.0) {
            Some(block) if block.locks > 0 => set_last_error(ERROR_LOCKED),
            Some(block) if !block.on_clipboard => {
                state.blocks.remove(&handle.0);
            }
            _ => set_last_error(ERROR_INVALID_HANDLE),
        }
    }

    fn last_error(&self) -> u32 {
        LAST_ERROR.with(Cell::get)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_is_exclusive_across_threads() {
        let native = std::sync::Arc::new(EmulatedClipboard::new());
        assert!(native.open());

        let other = std::sync::Arc::clone(&native);
        let (opened, code) = thread::spawn(move || (other.open(), other.last_error()))
            .join()
            .unwrap();
        assert!(!opened);
        assert_eq!(code, ERROR_ACCESS_DENIED);

        assert!(native.close());
        assert!(!native.is_open());
    }

    #[test]
    fn reopen_from_same_thread_succeeds() {
        let native = EmulatedClipboard::new();
        assert!(native.open());
        assert!(native.open());
        assert!(native.close());
    }

    #[test]
    fn foreign_owner_blocks_open() {
        let native = EmulatedClipboard::new();
        assert!(native.seize_for_foreign_process());
        assert!(!native.open());
        assert_eq!(native.last_error(), ERROR_ACCESS_DENIED);
        native.release_foreign_process();
        assert!(native.open());
        assert!(native.close());
    }

    #[test]
    fn set_data_requires_open_session() {
        let native = EmulatedClipboard::new();
        let handle = native.global_alloc(1).unwrap();
        assert!(!native.set_data(1, handle));
        assert_eq!(native.last_error(), ERROR_CLIPBOARD_NOT_OPEN);
        native.global_free(handle);
        assert_eq!(native.outstanding_blocks(), 0);
    }

    #[test]
    fn empty_releases_clipboard_blocks() {
        let native = EmulatedClipboard::new();
        assert!(native.open());
        let a = native.global_alloc(2).unwrap();
        let b = native.global_alloc(2).unwrap();
        assert!(native.set_data(1, a));
        assert!(native.set_data(13, b));
        assert_eq!(native.available_formats(), vec![1, 13]);

        assert!(native.empty());
        assert!(native.close());
        assert!(native.available_formats().is_empty());
        assert_eq!(native.global_size(a), 0);
    }

    #[test]
    fn replacing_a_slot_frees_previous_block() {
        let native = EmulatedClipboard::new();
        assert!(native.open());
        let first = native.global_alloc(2).unwrap();
        let second = native.global_alloc(2).unwrap();
        assert!(native.set_data(1, first));
        assert!(native.set_data(1, second));
        assert!(native.close());

        assert_eq!(native.global_size(first), 0);
        assert_eq!(native.global_size(second), 2);
    }

    #[test]
    fn clipboard_owned_block_cannot_be_freed() {
        let native = EmulatedClipboard::new();
        assert!(native.open());
        let handle = native.global_alloc(3).unwrap();
        assert!(native.set_data(1, handle));
        native.global_free(handle);
        assert_eq!(native.last_error(), ERROR_INVALID_HANDLE);
        assert_eq!(native.global_size(handle), 3);
        assert!(native.close());
    }

    #[test]
    fn registered_formats_are_stable_and_case_insensitive() {
        let native = EmulatedClipboard::new();
        let html = native.register_format("HTML Format").unwrap();
        let rtf = native.register_format("Rich Text Format").unwrap();
        assert_eq!(html, FIRST_REGISTERED_FORMAT);
        assert_ne!(html, rtf);
        assert_eq!(native.register_format("html format"), Some(html));
        assert_eq!(native.register_format(""), None);
    }

    #[test]
    fn locked_block_cannot_be_freed() {
        let native = EmulatedClipboard::new();
        let handle = native.global_alloc(8).unwrap();
        let ptr = native.global_lock(handle);
        assert!(!ptr.is_null());

        native.global_free(handle);
        assert_eq!(native.last_error(), ERROR_LOCKED);
        assert_eq!(native.outstanding_blocks(), 1);

        let other = native.global_alloc(8).unwrap();
        assert_ne!(other, handle);
        assert_eq!(native.global_lock(handle), ptr);
        native.global_unlock(handle);
        native.global_unlock(handle);

        native.global_free(handle);
        native.global_free(other);
        assert_eq!(native.outstanding_blocks(), 0);
    }

    #[test]
    fn lock_counts_are_tracked() {
        let native = EmulatedClipboard::new();
        let handle = native.global_alloc(4).unwrap();
        assert!(!native.global_lock(handle).is_null());
        assert_eq!(native.locked_blocks(), 1);
        native.global_unlock(handle);
        assert_eq!(native.locked_blocks(), 0);
        assert!(native.global_lock(Handle(9999)).is_null());
        native.global_free(handle);
    }
}
