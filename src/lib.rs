//! Apartment-safe access to the Windows clipboard.
//!
//! [`ClipboardManager`] opens the shared clipboard with bounded retry,
//! marshals text through global memory blocks, and publishes paths as
//! file-drop lists. Every operation runs on its own single-threaded
//! apartment worker and comes in blocking and `async` forms.
//!
//! ```no_run
//! use clipsta::{ClipboardConfig, ClipboardManager, ContentKind, TextFormat};
//!
//! let clipboard = ClipboardManager::system(ClipboardConfig::default())?;
//! clipboard.set_text("hello", ContentKind::Text, TextFormat::PlainUnicode)?;
//! assert_eq!(clipboard.get_text(TextFormat::PlainUnicode)?.as_deref(), Some("hello"));
//! # Ok::<(), clipsta::ClipboardError>(())
//! ```

pub mod bridge;
pub mod clipboard;
pub mod error;
pub mod native;

pub use clipboard::format::{ContentKind, NamedFormat, TextFormat};
pub use clipboard::path::{FsPathProbe, PathProbe};
pub use clipboard::{ClipboardConfig, ClipboardManager};
pub use error::ClipboardError;
