//! CLI client for clipboard operations.
//!
//! Each subcommand performs one clipboard operation through the async
//! API, prints the result, and returns.

mod format;

use clipsta::{ClipboardConfig, ClipboardError, ClipboardManager, ContentKind};

use crate::cli::Command;

/// Client error type.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the client command against the system clipboard.
pub async fn run(command: Command, config: ClipboardConfig) -> Result<(), ClientError> {
    let clipboard = ClipboardManager::system(config)?;
    execute(&clipboard, command).await
}

/// Perform `command` on `clipboard` and print the outcome.
async fn execute(clipboard: &ClipboardManager, command: Command) -> Result<(), ClientError> {
    match command {
        Command::Set {
            content,
            path,
            format,
        } => {
            let kind = if path {
                ContentKind::Path
            } else {
                ContentKind::Text
            };
            clipboard.set_text_async(&content, kind, format).await?;
            format::print_set(kind, format, &content);
        }
        Command::Get { format } => {
            let text = clipboard.get_text_async(format).await?;
            format::print_text(format, text.as_deref())?;
        }
        Command::Files => {
            let paths = clipboard.file_drop_list_async().await?;
            format::print_files(&paths);
        }
        Command::Clear => {
            clipboard.clear_async().await?;
            format::print_cleared();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(windows))]
    #[tokio::test]
    async fn system_clipboard_unavailable_off_windows() {
        let err = run(Command::Clear, ClipboardConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Clipboard(ClipboardError::Unavailable)
        ));
    }

    /// Run with `cargo test --features emulated`.
    #[cfg(feature = "emulated")]
    mod emulated {
        use std::sync::Arc;
        use std::time::Duration;

        use clipsta::native::EmulatedClipboard;
        use clipsta::{FsPathProbe, TextFormat};

        use super::super::*;

        fn emulated() -> ClipboardManager {
            let config = ClipboardConfig {
                open_attempts: 2,
                retry_interval: Duration::from_millis(1),
                ..ClipboardConfig::default()
            };
            ClipboardManager::new(
                Arc::new(EmulatedClipboard::new()),
                Arc::new(FsPathProbe),
                config,
            )
        }

        #[tokio::test]
        async fn set_then_get() {
            let clipboard = emulated();
            execute(
                &clipboard,
                Command::Set {
                    content: "from cli".into(),
                    path: false,
                    format: TextFormat::Html,
                },
            )
            .await
            .unwrap();

            assert_eq!(
                clipboard.get_text(TextFormat::Html).unwrap().as_deref(),
                Some("from cli")
            );
            execute(&clipboard, Command::Get { format: TextFormat::Html })
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn set_path_then_files() {
            let clipboard = emulated();
            let dir = tempfile::tempdir().unwrap();
            execute(
                &clipboard,
                Command::Set {
                    content: dir.path().display().to_string(),
                    path: true,
                    format: TextFormat::PlainUnicode,
                },
            )
            .await
            .unwrap();

            execute(&clipboard, Command::Files).await.unwrap();
            assert_eq!(
                clipboard.file_drop_list().unwrap(),
                vec![dir.path().to_path_buf()]
            );
        }

        #[tokio::test]
        async fn missing_path_surfaces_error() {
            let clipboard = emulated();
            let err = execute(
                &clipboard,
                Command::Set {
                    content: "/definitely/not/here/clipsta".into(),
                    path: true,
                    format: TextFormat::PlainUnicode,
                },
            )
            .await
            .unwrap_err();

            assert!(err.to_string().contains("path not found"));
        }

        #[tokio::test]
        async fn clear_then_get_prints_nothing() {
            let clipboard = emulated();
            execute(&clipboard, Command::Clear).await.unwrap();
            execute(&clipboard, Command::Get { format: TextFormat::Rtf })
                .await
                .unwrap();
        }
    }
}
