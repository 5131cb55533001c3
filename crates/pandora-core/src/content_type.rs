//! # Content-Type Descriptors
//!
//! Static description of every file type Pandora can serve. A descriptor
//! says how a request path is normalised (default name, canonical
//! extension), which requests route to it (extensions, directory prefixes),
//! and which body builder produces it ([`BodyKind`]).
//!
//! The set is closed: adding a kind forces every `match` on [`BodyKind`]
//! (builders, prompts, chains) to handle it.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

/// The body builder family for a content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    Html,
    Text,
    Json,
    Csv,
    Stylesheet,
    Script,
    #[serde(rename = "doc")]
    Document,
    Spreadsheet,
    Presentation,
    Pdf,
    Image,
    #[serde(rename = "onenote")]
    OneNote,
    Zip,
    Tar,
    Binary,
    Audio,
    Video,
}

impl BodyKind {
    /// Every kind, in registry order.
    pub const ALL: [BodyKind; 17] = [
        Self::Html,
        Self::Text,
        Self::Json,
        Self::Csv,
        Self::Stylesheet,
        Self::Script,
        Self::Document,
        Self::Spreadsheet,
        Self::Presentation,
        Self::Pdf,
        Self::Image,
        Self::OneNote,
        Self::Zip,
        Self::Tar,
        Self::Binary,
        Self::Audio,
        Self::Video,
    ];

    /// Stable lowercase name, also used as the per-type cache subdirectory.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Text => "text",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Stylesheet => "stylesheet",
            Self::Script => "script",
            Self::Document => "doc",
            Self::Spreadsheet => "spreadsheet",
            Self::Presentation => "presentation",
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::OneNote => "onenote",
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::Binary => "binary",
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }

    /// Whether the body is human-readable text that a language model can
    /// write directly or be poured into.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            Self::Html
                | Self::Text
                | Self::Json
                | Self::Csv
                | Self::Stylesheet
                | Self::Script
                | Self::Document
                | Self::Spreadsheet
                | Self::Presentation
                | Self::Pdf
        )
    }
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or(CoreError::UnknownKind(wanted))
    }
}

/// The `{default_name, extension}` pair the resolver needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor<'a> {
    pub default_name: &'a str,
    pub extension: &'a str,
}

/// A registered content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContentType {
    /// Body builder family; doubles as the type tag.
    pub kind: BodyKind,
    /// File name used for empty or directory-style request paths.
    pub default_name: &'static str,
    /// Canonical extension for prefix-routed requests.
    pub extension: &'static str,
    /// Every extension that routes to this type (lowercase, no dot).
    pub extensions: &'static [&'static str],
    /// Directory prefixes that route to this type (leading `/`, no trailing `/`).
    pub prefixes: &'static [&'static str],
    /// Media type used when the extension lookup has no entry.
    pub media_type: &'static str,
    /// Whether the unknown-path fallback may pick this type at random.
    pub random_eligible: bool,
}

impl ContentType {
    /// Descriptor using the canonical extension.
    pub fn descriptor(&self) -> Descriptor<'static> {
        Descriptor {
            default_name: self.default_name,
            extension: self.extension,
        }
    }

    /// Descriptor using an explicit request extension.
    ///
    /// An explicit extension wins over the canonical one, so a request for
    /// `plan.doc` stays `plan.doc` rather than becoming `plan.doc.docx`.
    pub fn descriptor_for<'a>(&self, extension: &'a str) -> Descriptor<'a> {
        Descriptor {
            default_name: self.default_name,
            extension,
        }
    }

    /// Whether `extension` (any case) routes to this type.
    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }
}

/// The built-in registry contents.
pub const BUILTIN_TYPES: &[ContentType] = &[
    ContentType {
        kind: BodyKind::Html,
        default_name: "index",
        extension: "html",
        extensions: &["html", "htm"],
        prefixes: &[],
        media_type: "text/html",
        random_eligible: true,
    },
    ContentType {
        kind: BodyKind::Text,
        default_name: "document",
        extension: "txt",
        extensions: &["txt"],
        prefixes: &["/text"],
        media_type: "text/plain",
        random_eligible: true,
    },
    ContentType {
        kind: BodyKind::Json,
        default_name: "data",
        extension: "json",
        extensions: &["json"],
        prefixes: &["/json", "/api"],
        media_type: "application/json",
        random_eligible: true,
    },
    ContentType {
        kind: BodyKind::Csv,
        default_name: "export",
        extension: "csv",
        extensions: &["csv"],
        prefixes: &["/csv"],
        media_type: "text/csv",
        random_eligible: true,
    },
    ContentType {
        kind: BodyKind::Stylesheet,
        default_name: "styles",
        extension: "css",
        extensions: &["css"],
        prefixes: &["/css", "/styles"],
        media_type: "text/css",
        random_eligible: true,
    },
    ContentType {
        kind: BodyKind::Script,
        default_name: "script",
        extension: "js",
        extensions: &["js"],
        prefixes: &["/js", "/scripts"],
        media_type: "application/javascript",
        random_eligible: true,
    },
    ContentType {
        kind: BodyKind::Document,
        default_name: "document",
        extension: "docx",
        extensions: &["docx", "doc", "dotx", "dot", "docm", "dotm", "odt"],
        prefixes: &["/docs", "/doc"],
        media_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        random_eligible: true,
    },
    ContentType {
        kind: BodyKind::Spreadsheet,
        default_name: "workbook",
        extension: "xlsx",
        extensions: &["xlsx", "xls", "xlsm", "xlsb", "xltm", "xla", "xlam", "ods"],
        prefixes: &["/sheets", "/xlsx"],
        media_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        random_eligible: true,
    },
    ContentType {
        kind: BodyKind::Presentation,
        default_name: "presentation",
        extension: "pptx",
        extensions: &[
            "pptx", "ppt", "potx", "pot", "ppsx", "pps", "pptm", "potm", "ppsm", "odp",
        ],
        prefixes: &["/slides", "/ppt"],
        media_type: "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        random_eligible: true,
    },
    ContentType {
        kind: BodyKind::Pdf,
        default_name: "document",
        extension: "pdf",
        extensions: &["pdf"],
        prefixes: &["/pdf"],
        media_type: "application/pdf",
        random_eligible: true,
    },
    ContentType {
        kind: BodyKind::Image,
        default_name: "image",
        extension: "png",
        extensions: &["png", "jpg", "jpeg", "gif", "ico"],
        prefixes: &["/img", "/images", "/i"],
        media_type: "image/png",
        random_eligible: true,
    },
    ContentType {
        kind: BodyKind::OneNote,
        default_name: "notebook",
        extension: "one",
        extensions: &["one"],
        prefixes: &["/onenote", "/notebook"],
        media_type: "application/onenote",
        random_eligible: true,
    },
    ContentType {
        kind: BodyKind::Zip,
        default_name: "archive",
        extension: "zip",
        extensions: &["zip"],
        prefixes: &["/zip"],
        media_type: "application/zip",
        random_eligible: true,
    },
    ContentType {
        kind: BodyKind::Tar,
        default_name: "archive",
        extension: "tar",
        extensions: &["tar", "gz"],
        prefixes: &["/tar"],
        media_type: "application/x-tar",
        random_eligible: true,
    },
    ContentType {
        kind: BodyKind::Binary,
        default_name: "data",
        extension: "bin",
        extensions: &["bin", "exe", "msi", "iso", "rar", "chm"],
        prefixes: &["/binary"],
        media_type: "application/octet-stream",
        random_eligible: true,
    },
    ContentType {
        kind: BodyKind::Audio,
        default_name: "recording",
        extension: "wav",
        extensions: &["wav"],
        prefixes: &["/audio"],
        media_type: "audio/wav",
        random_eligible: true,
    },
    ContentType {
        kind: BodyKind::Video,
        default_name: "video",
        extension: "mp4",
        extensions: &["mp4"],
        prefixes: &["/video"],
        media_type: "video/mp4",
        random_eligible: true,
    },
];
