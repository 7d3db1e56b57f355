//! Native memory bridge — text in and out of global memory blocks.
//!
//! Handles the two native text codes: `CF_TEXT` (one byte per unit) and
//! `CF_UNICODETEXT` (UTF-16LE, two bytes per unit). Every payload carries
//! one terminating NUL unit.
//!
//! Single-byte text is Latin-1: characters above U+00FF are written as
//! `?`, the same substitution the platform makes for unmappable
//! characters.

use crate::error::ClipboardError;
use crate::native::block::{self, GlobalBlock};
use crate::native::{CF_UNICODETEXT, NativeClipboard};

/// Replacement byte for characters with no single-byte form.
const UNMAPPABLE: u8 = b'?';

/// Width of one text unit for a native format code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextUnit {
    Byte,
    Wide,
}

impl TextUnit {
    pub fn for_format(format: u32) -> Self {
        if format == CF_UNICODETEXT {
            TextUnit::Wide
        } else {
            TextUnit::Byte
        }
    }

    pub fn width(self) -> usize {
        match self {
            TextUnit::Byte => 1,
            TextUnit::Wide => 2,
        }
    }
}

/// Encode `text` for `unit`, including the terminating NUL unit.
pub fn encode(text: &str, unit: TextUnit) -> Vec<u8> {
    match unit {
        TextUnit::Byte => text
            .chars()
            .map(|c| u8::try_from(u32::from(c)).unwrap_or(UNMAPPABLE))
            .chain(std::iter::once(0))
            .collect(),
        TextUnit::Wide => text
            .encode_utf16()
            .chain(std::iter::once(0))
            .flat_map(u16::to_le_bytes)
            .collect(),
    }
}

/// Decode a block's bytes, stopping at the first NUL unit.
///
/// Blocks may be larger than the text they hold, so anything after the
/// terminator is ignored.
pub fn decode(bytes: &[u8], unit: TextUnit) -> String {
    match unit {
        TextUnit::Byte => bytes
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| char::from(b))
            .collect(),
        TextUnit::Wide => {
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .take_while(|&u| u != 0)
                .collect();
            String::from_utf16_lossy(&units)
        }
    }
}

/// Encode `text` into a fresh block and hand it to the clipboard.
///
/// The clipboard must be open. The block is freed here if the hand-off
/// fails and left alone if it succeeds.
pub fn encode_and_set(
    native: &dyn NativeClipboard,
    text: &str,
    format: u32,
) -> Result<(), ClipboardError> {
    let payload = encode(text, TextUnit::for_format(format));
    tracing::debug!(format, bytes = payload.len(), "setting native text");
    GlobalBlock::publish(native, format, &payload)
}

/// Read and decode the text stored under `format`.
///
/// The clipboard must be open. Returns `None` when the format is absent.
/// The clipboard keeps ownership of the block.
pub fn get_and_decode(
    native: &dyn NativeClipboard,
    format: u32,
) -> Result<Option<String>, ClipboardError> {
    if !native.is_format_available(format) {
        return Ok(None);
    }
    let Some(handle) = native.get_data(format) else {
        return Ok(None);
    };
    let bytes = block::read_block(native, handle)?;
    Ok(Some(decode(&bytes, TextUnit::for_format(format))))
}
