use clap::{Parser, Subcommand};
use clipsta::TextFormat;

#[derive(Parser)]
#[command(name = "clipsta", about = "Apartment-safe Windows clipboard access")]
pub struct Cli {
    /// Attempts made to open the clipboard before giving up
    #[arg(long, global = true, default_value_t = 10)]
    pub open_attempts: u32,

    /// Pause between open attempts, in milliseconds
    #[arg(long, global = true, default_value_t = 100)]
    pub retry_interval_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Put text on the clipboard
    Set {
        /// Text to copy, or a filesystem path with --path
        content: String,

        /// Publish CONTENT as a file-drop list instead of text
        #[arg(long)]
        path: bool,

        /// Text format: ansi, unicode, rtf, html, csv, xaml
        #[arg(long, default_value = "unicode")]
        format: TextFormat,
    },

    /// Print clipboard text in one format
    Get {
        /// Text format: ansi, unicode, rtf, html, csv, xaml
        #[arg(long, default_value = "unicode")]
        format: TextFormat,
    },

    /// List paths on the clipboard's file-drop list
    Files,

    /// Empty the clipboard
    Clear,
}

impl Command {
    /// Subcommand name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set { .. } => "set",
            Command::Get { .. } => "get",
            Command::Files => "files",
            Command::Clear => "clear",
        }
    }
}
