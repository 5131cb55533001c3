//! # Content Identity Resolution
//!
//! Turns a raw request path into the canonical identity used as the cache
//! key and as the source of the response file name.
//!
//! ## Invariants
//!
//! - `relative_path` always ends in `.{extension}`.
//! - `relative_path` is `/`-separated and contains no empty, `.` or `..`
//!   segments, so `root.join(relative_path)` never leaves `root`.
//! - Resolution is pure and total: every input string, including empty,
//!   malformed percent-escapes and non-UTF-8 escapes, yields an identity.
//!
//! ## Rules
//!
//! 1. Percent-escapes are decoded (invalid UTF-8 is replaced lossily).
//! 2. Leading separators are stripped; `\` is treated like `/`.
//! 3. An empty path, or one ending in a separator, gets
//!    `{default_name}.{extension}` appended.
//! 4. Otherwise `.{extension}` is appended unless the last segment already
//!    ends with it. A different existing extension is kept, not replaced.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use serde::Serialize;

use crate::content_type::Descriptor;

/// Canonical resolved form of a request path.
///
/// Created per request; immutable; never persisted as an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ContentIdentity {
    /// Store root the relative path is anchored under.
    pub root: PathBuf,
    /// `/`-separated path below `root`, ending in `.{extension}`.
    pub relative_path: String,
    /// Last segment of `relative_path`.
    pub file_name: String,
    /// Extension without the leading dot.
    pub extension: String,
}

impl ContentIdentity {
    /// Resolve `raw_path` against a content-type descriptor.
    pub fn resolve(root: impl Into<PathBuf>, raw_path: &str, descriptor: &Descriptor<'_>) -> Self {
        let extension = match descriptor.extension.trim_start_matches('.') {
            "" => "bin",
            ext => ext,
        };
        let default_name = match descriptor.default_name.trim() {
            "" => "index",
            name => name,
        };

        let decoded = percent_decode_str(raw_path).decode_utf8_lossy();
        let trimmed = decoded.trim();
        let wants_default = trimmed.is_empty() || trimmed.ends_with(['/', '\\']);

        let mut segments: Vec<String> = trimmed
            .split(['/', '\\'])
            .map(|s| s.chars().filter(|c| !c.is_control()).collect::<String>())
            .filter(|s| !s.is_empty() && s != "." && s != "..")
            .collect();

        let suffix = format!(".{extension}");
        let mut resolved_extension = extension.to_string();

        match segments.last_mut() {
            Some(last) if !wants_default => {
                if has_suffix_ignore_case(last, &suffix) {
                    // Keep the caller's spelling so the invariant holds byte-for-byte.
                    resolved_extension = last[last.len() - extension.len()..].to_string();
                } else {
                    last.push_str(&suffix);
                }
            }
            _ => segments.push(format!("{default_name}{suffix}")),
        }

        let relative_path = segments.join("/");
        let file_name = segments.last().cloned().unwrap_or_default();

        Self {
            root: root.into(),
            relative_path,
            file_name,
            extension: resolved_extension,
        }
    }

    /// Absolute location of the cached artifact for this identity.
    pub fn full_path(&self) -> PathBuf {
        let mut path = self.root.clone();
        for segment in self.relative_path.split('/') {
            path.push(segment);
        }
        path
    }

    /// Directory that must exist before the artifact can be written.
    pub fn parent_dir(&self) -> PathBuf {
        self.full_path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone())
    }

    /// File name without its extension, e.g. `quarterly_report` for
    /// `quarterly_report.docx`.
    pub fn stem(&self) -> &str {
        self.file_name
            .strip_suffix(&self.extension)
            .and_then(|s| s.strip_suffix('.'))
            .unwrap_or(&self.file_name)
    }

    /// Human-readable topic derived from the file name, used to seed prompts.
    ///
    /// Separators (`_`, `-`, `.`, `+`) become spaces. Returns `None` when the
    /// stem carries no letters, e.g. `12345.pdf`.
    pub fn topic(&self) -> Option<String> {
        let words: Vec<&str> = self
            .stem()
            .split(['_', '-', '.', '+', ' '])
            .filter(|w| !w.is_empty())
            .collect();
        let topic = words.join(" ");
        if topic.chars().any(char::is_alphabetic) {
            Some(topic)
        } else {
            None
        }
    }
}

fn has_suffix_ignore_case(value: &str, suffix: &str) -> bool {
    value.len() >= suffix.len()
        && value.is_char_boundary(value.len() - suffix.len())
        && value[value.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DOCX: Descriptor<'static> = Descriptor {
        default_name: "document",
        extension: "docx",
    };

    fn resolve(raw: &str) -> ContentIdentity {
        ContentIdentity::resolve("/cache/doc", raw, &DOCX)
    }

    #[test]
    fn empty_path_uses_default_name() {
        let id = resolve("");
        assert_eq!(id.relative_path, "document.docx");
        assert_eq!(id.file_name, "document.docx");
        assert_eq!(id.extension, "docx");
    }

    #[test]
    fn trailing_slash_uses_default_name() {
        let id = resolve("/docs/finance/");
        assert_eq!(id.relative_path, "docs/finance/document.docx");
    }

    #[test]
    fn bare_name_gets_extension() {
        let id = resolve("/docs/quarterly_report");
        assert_eq!(id.relative_path, "docs/quarterly_report.docx");
        assert_eq!(id.file_name, "quarterly_report.docx");
    }

    #[test]
    fn qualified_name_is_untouched() {
        let id = resolve("/docs/plan.docx");
        assert_eq!(id.relative_path, "docs/plan.docx");
    }

    #[test]
    fn different_extension_is_kept_and_suffixed() {
        let id = resolve("/docs/plan.doc");
        assert_eq!(id.relative_path, "docs/plan.doc.docx");
        assert_eq!(id.extension, "docx");
    }

    #[test]
    fn extension_match_ignores_case_and_keeps_spelling() {
        let id = resolve("/docs/PLAN.DOCX");
        assert_eq!(id.relative_path, "docs/PLAN.DOCX");
        assert_eq!(id.extension, "DOCX");
        assert!(id.relative_path.ends_with(&format!(".{}", id.extension)));
    }

    #[test]
    fn percent_escapes_are_decoded() {
        let id = resolve("/docs/annual%20review");
        assert_eq!(id.file_name, "annual review.docx");
    }

    #[test]
    fn traversal_segments_are_dropped() {
        let id = resolve("/../../etc/./passwd");
        assert_eq!(id.relative_path, "etc/passwd.docx");
        let encoded = resolve("%2e%2e%2f%2e%2e%2fsecret");
        assert_eq!(encoded.relative_path, "secret.docx");
    }

    #[test]
    fn backslashes_are_separators() {
        let id = resolve("\\share\\notes");
        assert_eq!(id.relative_path, "share/notes.docx");
    }

    #[test]
    fn only_dots_degrades_to_default() {
        let id = resolve("/../..");
        assert_eq!(id.relative_path, "document.docx");
    }

    #[test]
    fn full_path_stays_under_root() {
        let id = resolve("/a/b/c");
        assert_eq!(id.full_path(), PathBuf::from("/cache/doc/a/b/c.docx"));
        assert_eq!(id.parent_dir(), PathBuf::from("/cache/doc/a/b"));
    }

    #[test]
    fn topic_comes_from_stem() {
        assert_eq!(
            resolve("/docs/budget_plan-2024").topic().as_deref(),
            Some("budget plan 2024")
        );
        assert_eq!(resolve("/docs/2024").topic(), None);
        assert_eq!(resolve("/docs/plan.docx").stem(), "plan");
    }

    #[test]
    fn empty_descriptor_fields_degrade() {
        let blank = Descriptor {
            default_name: " ",
            extension: "",
        };
        let id = ContentIdentity::resolve("/r", "", &blank);
        assert_eq!(id.relative_path, "index.bin");
    }

    proptest! {
        /// Resolution terminates for every input and honors the extension invariant.
        #[test]
        fn resolve_is_total(raw in ".*") {
            let id = resolve(&raw);
            let suffix = format!(".{}", id.extension);
            prop_assert!(id.relative_path.ends_with(&suffix));
            prop_assert!(id.extension.eq_ignore_ascii_case("docx"));
        }

        /// No segment of the relative path can climb out of the root.
        #[test]
        fn resolve_never_escapes_root(raw in "[a-z./\\\\%0-9]{0,40}") {
            let id = resolve(&raw);
            prop_assert!(!id.relative_path.starts_with('/'));
            prop_assert!(id.relative_path.split('/').all(|s| !s.is_empty() && s != ".." && s != "."));
        }
    }
}
