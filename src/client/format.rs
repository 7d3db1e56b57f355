//! Output formatting for CLI client commands.
//!
//! Clipboard text goes to stdout unmodified so that piping works
//! (`clipsta get --format html > page.html`). Status lines for empty
//! results go to stderr.

use std::io::{self, Write};
use std::path::PathBuf;

use clipsta::clipboard::path;
use clipsta::{ContentKind, TextFormat};

/// Print a confirmation for a successful `set`.
pub fn print_set(kind: ContentKind, format: TextFormat, content: &str) {
    println!("{}", describe_set(kind, format, content));
}

/// Print clipboard text, or a note on stderr when the format is absent.
pub fn print_text(format: TextFormat, text: Option<&str>) -> Result<(), io::Error> {
    match text {
        Some(text) => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
        None => eprintln!("No {} on the clipboard", format.description()),
    }
    Ok(())
}

/// Print file-drop list entries, one per line.
pub fn print_files(paths: &[PathBuf]) {
    if paths.is_empty() {
        eprintln!("No files on the clipboard");
        return;
    }
    for path in paths {
        println!("{}", path.display());
    }
}

/// Print clear success.
pub fn print_cleared() {
    println!("Clipboard cleared");
}

fn describe_set(kind: ContentKind, format: TextFormat, content: &str) -> String {
    if content.trim().is_empty() {
        return "Nothing to copy (blank content)".to_string();
    }
    match kind {
        ContentKind::Path => match path::normalize(content) {
            Ok(published) => format!("Copied path {}", published.display()),
            Err(_) => "Copied path to file-drop list".to_string(),
        },
        ContentKind::Text => format!(
            "Copied {} chars as {}",
            content.chars().count(),
            format.description()
        ),
    }
}
