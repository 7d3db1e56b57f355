//! Content kinds and text formats.
//!
//! [`TextFormat`] is closed: two variants travel as native text codes,
//! the other four as registered format names from [`NamedFormat`].

use std::fmt;
use std::str::FromStr;

use crate::native::{CF_TEXT, CF_UNICODETEXT};

/// How a `set_text` payload is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentKind {
    /// Opaque text in the requested [`TextFormat`].
    #[default]
    Text,
    /// A filesystem path, published as a one-element file-drop list.
    Path,
}

impl ContentKind {
    /// Human-readable label.
    pub fn description(self) -> &'static str {
        match self {
            ContentKind::Text => "Text",
            ContentKind::Path => "Path",
        }
    }
}

/// Text formats supported by `set_text` / `get_text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextFormat {
    /// Single-byte text (`CF_TEXT`).
    PlainAnsi,
    /// UTF-16 text (`CF_UNICODETEXT`).
    #[default]
    PlainUnicode,
    Rtf,
    Html,
    /// Comma-separated values.
    DelimitedValues,
    /// XAML markup.
    Markup,
}

/// The registered-name subset of [`TextFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedFormat {
    Rtf,
    Html,
    Csv,
    Xaml,
}

impl NamedFormat {
    /// The name the platform registers this format under.
    pub fn name(self) -> &'static str {
        match self {
            NamedFormat::Rtf => "Rich Text Format",
            NamedFormat::Html => "HTML Format",
            NamedFormat::Csv => "CSV",
            NamedFormat::Xaml => "Xaml",
        }
    }
}

/// Where a [`TextFormat`] is read from and written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatRoute {
    /// Native format code, handled by the memory bridge.
    Native(u32),
    /// Registered format name, handled by the data-object accessor.
    Named(NamedFormat),
}

impl TextFormat {
    pub const ALL: [TextFormat; 6] = [
        TextFormat::PlainAnsi,
        TextFormat::PlainUnicode,
        TextFormat::Rtf,
        TextFormat::Html,
        TextFormat::DelimitedValues,
        TextFormat::Markup,
    ];

    pub fn route(self) -> FormatRoute {
        match self {
            TextFormat::PlainAnsi => FormatRoute::Native(CF_TEXT),
            TextFormat::PlainUnicode => FormatRoute::Native(CF_UNICODETEXT),
            TextFormat::Rtf => FormatRoute::Named(NamedFormat::Rtf),
            TextFormat::Html => FormatRoute::Named(NamedFormat::Html),
            TextFormat::DelimitedValues => FormatRoute::Named(NamedFormat::Csv),
            TextFormat::Markup => FormatRoute::Named(NamedFormat::Xaml),
        }
    }

    /// Human-readable label.
    pub fn description(self) -> &'static str {
        match self {
            TextFormat::PlainAnsi => "Text",
            TextFormat::PlainUnicode => "Unicode Text",
            TextFormat::Rtf => "Rich Text Format",
            TextFormat::Html => "HTML",
            TextFormat::DelimitedValues => "Comma-Separated Values",
            TextFormat::Markup => "XAML",
        }
    }

    /// Short name accepted by [`FromStr`].
    pub fn short_name(self) -> &'static str {
        match self {
            TextFormat::PlainAnsi => "ansi",
            TextFormat::PlainUnicode => "unicode",
            TextFormat::Rtf => "rtf",
            TextFormat::Html => "html",
            TextFormat::DelimitedValues => "csv",
            TextFormat::Markup => "xaml",
        }
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Unrecognized text format name.
#[derive(Debug, thiserror::Error)]
#[error("unknown text format: {0} (expected: ansi, unicode, rtf, html, csv, xaml)")]
pub struct UnknownFormat(String);

impl FromStr for TextFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ansi" | "text" => Ok(TextFormat::PlainAnsi),
            "unicode" => Ok(TextFormat::PlainUnicode),
            "rtf" => Ok(TextFormat::Rtf),
            "html" => Ok(TextFormat::Html),
            "csv" => Ok(TextFormat::DelimitedValues),
            "xaml" => Ok(TextFormat::Markup),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_formats_use_native_codes() {
        assert_eq!(TextFormat::PlainAnsi.route(), FormatRoute::Native(1));
        assert_eq!(TextFormat::PlainUnicode.route(), FormatRoute::Native(13));
    }

    #[test]
    fn rich_formats_use_registered_names() {
        let names: Vec<&str> = TextFormat::ALL
            .iter()
            .filter_map(|f| match f.route() {
                FormatRoute::Named(named) => Some(named.name()),
                FormatRoute::Native(_) => None,
            })
            .collect();
        assert_eq!(names, ["Rich Text Format", "HTML Format", "CSV", "Xaml"]);
    }

    #[test]
    fn short_names_parse_back() {
        for format in TextFormat::ALL {
            assert_eq!(format.short_name().parse::<TextFormat>().unwrap(), format);
        }
        assert_eq!("TEXT".parse::<TextFormat>().unwrap(), TextFormat::PlainAnsi);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = "bitmap".parse::<TextFormat>().unwrap_err();
        assert!(err.to_string().contains("bitmap"));
    }

    #[test]
    fn content_kind_labels() {
        assert_eq!(ContentKind::Text.description(), "Text");
        assert_eq!(ContentKind::Path.description(), "Path");
    }
}
