//! Named-format accessor and file-drop lists.
//!
//! Rich text formats are stored under their registered names as UTF-8
//! with a NUL terminator. File-drop lists use `CF_HDROP`: a 20-byte
//! `DROPFILES` header followed by NUL-separated wide paths and a final
//! empty entry.
//!
//! All functions expect the clipboard to be open.

use std::path::PathBuf;

use bytes::{Buf, BufMut, BytesMut};

use super::format::NamedFormat;
use crate::error::ClipboardError;
use crate::native::block::{self, GlobalBlock};
use crate::native::{CF_HDROP, NativeClipboard};

/// `sizeof(DROPFILES)`; also the offset of the path list.
const DROPFILES_SIZE: usize = 20;

fn format_code(native: &dyn NativeClipboard, format: NamedFormat) -> Result<u32, ClipboardError> {
    native
        .register_format(format.name())
        .ok_or_else(|| ClipboardError::NativeOperationFailed {
            code: native.last_error(),
        })
}

/// Store `text` under a registered format name.
pub fn set_named(
    native: &dyn NativeClipboard,
    format: NamedFormat,
    text: &str,
) -> Result<(), ClipboardError> {
    let code = format_code(native, format)?;
    let mut payload = Vec::with_capacity(text.len() + 1);
    payload.extend_from_slice(text.as_bytes());
    payload.push(0);

    tracing::debug!(format = format.name(), code, bytes = payload.len(), "setting named format");
    GlobalBlock::publish(native, code, &payload)
}

/// Read the text stored under a registered format name.
///
/// Returns `None` when the format is not on the clipboard.
pub fn get_named(
    native: &dyn NativeClipboard,
    format: NamedFormat,
) -> Result<Option<String>, ClipboardError> {
    let code = format_code(native, format)?;
    if !native.is_format_available(code) {
        return Ok(None);
    }
    let Some(handle) = native.get_data(code) else {
        return Ok(None);
    };
    let bytes = block::read_block(native, handle)?;
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    Ok(Some(String::from_utf8_lossy(&bytes[..end]).into_owned()))
}

/// Publish `paths` as a file-drop list.
pub fn set_file_drop_list(
    native: &dyn NativeClipboard,
    paths: &[PathBuf],
) -> Result<(), ClipboardError> {
    let payload = encode_drop_files(paths);
    tracing::debug!(count = paths.len(), bytes = payload.len(), "setting file-drop list");
    GlobalBlock::publish(native, CF_HDROP, &payload)
}

/// Read the current file-drop list; empty when none is present.
pub fn file_drop_list(native: &dyn NativeClipboard) -> Result<Vec<PathBuf>, ClipboardError> {
    if !native.is_format_available(CF_HDROP) {
        return Ok(Vec::new());
    }
    let Some(handle) = native.get_data(CF_HDROP) else {
        return Ok(Vec::new());
    };
    let bytes = block::read_block(native, handle)?;
    Ok(decode_drop_files(&bytes))
}

/// Build a wide-character `DROPFILES` payload.
pub fn encode_drop_files(paths: &[PathBuf]) -> BytesMut {
    let mut buf = BytesMut::with_capacity(DROPFILES_SIZE + 2);
    buf.put_u32_le(DROPFILES_SIZE as u32); // pFiles
    buf.put_i32_le(0); // pt.x
    buf.put_i32_le(0); // pt.y
    buf.put_i32_le(0); // fNC
    buf.put_i32_le(1); // fWide

    for path in paths {
        for unit in path.to_string_lossy().encode_utf16() {
            buf.put_u16_le(unit);
        }
        buf.put_u16_le(0);
    }
    buf.put_u16_le(0);
    buf
}

/// Parse a `DROPFILES` payload in either character width.
pub fn decode_drop_files(bytes: &[u8]) -> Vec<PathBuf> {
    if bytes.len() < DROPFILES_SIZE {
        return Vec::new();
    }
    let mut header = &bytes[..DROPFILES_SIZE];
    let offset = header.get_u32_le() as usize;
    header.advance(12); // pt, fNC
    let wide = header.get_i32_le() != 0;

    let list = bytes.get(offset..).unwrap_or_default();
    if wide {
        let units: Vec<u16> = list
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        units
            .split(|&u| u == 0)
            .take_while(|entry| !entry.is_empty())
            .map(|entry| PathBuf::from(String::from_utf16_lossy(entry)))
            .collect()
    } else {
        list.split(|&b| b == 0)
            .take_while(|entry| !entry.is_empty())
            .map(|entry| PathBuf::from(entry.iter().map(|&b| char::from(b)).collect::<String>()))
            .collect()
    }
}
