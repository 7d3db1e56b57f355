//! Path payloads — normalization and existence checks.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use path_absolutize::Absolutize;

/// U+202A LEFT-TO-RIGHT EMBEDDING, which shell "copy as path" actions
/// often prepend invisibly.
const LEFT_TO_RIGHT_EMBEDDING: char = '\u{202A}';

/// Longest file path usable without the extended-length prefix.
pub const MAX_FILE_PATH: usize = 259;

/// Longest directory path usable without the extended-length prefix.
pub const MAX_DIRECTORY_PATH: usize = 247;

/// Answers whether a file or directory exists at a path.
///
/// Implementations never fail: any I/O error means "does not exist".
pub trait PathProbe: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
}

/// [`PathProbe`] backed by the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsPathProbe;

impl PathProbe for FsPathProbe {
    fn exists(&self, path: &Path) -> bool {
        is_file(path) || is_directory(path)
    }
}

fn is_file(path: &Path) -> bool {
    let path = platform_path(path, MAX_FILE_PATH);
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

fn is_directory(path: &Path) -> bool {
    let path = platform_path(path, MAX_DIRECTORY_PATH);
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

#[cfg(windows)]
fn platform_path(path: &Path, limit: usize) -> PathBuf {
    extended_length(path, limit)
}

#[cfg(not(windows))]
fn platform_path(path: &Path, _limit: usize) -> PathBuf {
    path.to_path_buf()
}

/// Prefix `path` with `\\?\` when it is longer than `limit` UTF-16 units
/// and not already in `\\` form.
pub fn extended_length(path: &Path, limit: usize) -> PathBuf {
    let raw = path.to_string_lossy();
    if raw.encode_utf16().count() > limit && !raw.starts_with(r"\\") {
        PathBuf::from(format!(r"\\?\{raw}"))
    } else {
        path.to_path_buf()
    }
}

/// Strip embedding marks and resolve `raw` to an absolute, normalized path.
///
/// `.` and `..` components are resolved lexically; the path need not exist.
/// Input that is blank once the marks are gone is rejected with
/// [`io::ErrorKind::InvalidInput`] rather than resolving to the working
/// directory.
pub fn normalize(raw: &str) -> io::Result<PathBuf> {
    let cleaned: String = raw
        .chars()
        .filter(|&c| c != LEFT_TO_RIGHT_EMBEDDING)
        .collect();
    if cleaned.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "path is empty",
        ));
    }
    Ok(Path::new(&cleaned).absolutize()?.into_owned())
}
