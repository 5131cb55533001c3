//! # Body Builders
//!
//! One builder per [`BodyKind`]. A builder takes a seed and, optionally, text
//! written by the language model, and returns a structurally valid file of
//! its kind. With no text it fills the file from [`Faker`]; with text it
//! pours the text into the same structure, so a model answer for a
//! spreadsheet still yields a spreadsheet.
//!
//! ## Guarantees
//!
//! - Deterministic: the same `(kind, extension, seed, text)` gives the same
//!   bytes.
//! - Non-empty output for every kind except [`BodyKind::Video`], which has
//!   no synthetic builder and is served from a static fixture.
//! - An `Err` from a supported kind is a bug in the builder, not a runtime
//!   condition.

mod archive;
mod audio;
mod binary;
mod office;
mod pdf;
mod raster;
mod text;
pub(crate) mod zipfile;

use pandora_core::BodyKind;
use thiserror::Error;

use crate::faker::Faker;

/// Builder failures.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The kind has no synthetic builder.
    #[error("no synthetic builder for {0}")]
    Unsupported(BodyKind),

    /// An encoder rejected its input.
    #[error("{kind} encoder failed: {message}")]
    Encode { kind: BodyKind, message: String },

    #[error("{kind} write failed: {source}")]
    Io {
        kind: BodyKind,
        #[source]
        source: std::io::Error,
    },
}

/// Whether [`build`] can produce `kind` without external input.
pub fn has_builder(kind: BodyKind) -> bool {
    !matches!(kind, BodyKind::Video)
}

/// Build a body of `kind`.
///
/// `extension` selects the variant within a kind (`jpg` vs `png`, `gz` vs
/// `tar`, `exe` vs `iso`). `text` is model output to embed, if any.
pub fn build(
    kind: BodyKind,
    extension: &str,
    seed: u64,
    text: Option<&str>,
) -> Result<Vec<u8>, BuildError> {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    let text = text.map(str::trim).filter(|t| !t.is_empty());
    let mut fake = Faker::new(seed);

    let bytes = match kind {
        BodyKind::Html => text::html(&mut fake, text).into_bytes(),
        BodyKind::Text => text::plain(&mut fake, text).into_bytes(),
        BodyKind::Json => text::json(&mut fake, text).into_bytes(),
        BodyKind::Csv => text::csv(&mut fake, text).into_bytes(),
        BodyKind::Stylesheet => text::stylesheet(&mut fake, text).into_bytes(),
        BodyKind::Script => text::script(&mut fake, text).into_bytes(),
        BodyKind::Document => office::docx(&mut fake, text).map_err(|e| io(kind, e))?,
        BodyKind::Spreadsheet => office::xlsx(&mut fake, text).map_err(|e| io(kind, e))?,
        BodyKind::Presentation => office::pptx(&mut fake, text).map_err(|e| io(kind, e))?,
        BodyKind::Pdf => pdf::pdf(&mut fake, text),
        BodyKind::Image => raster::render(&mut fake, &ext)?,
        BodyKind::OneNote => binary::onenote(&mut fake),
        BodyKind::Zip => archive::zip(&mut fake).map_err(|e| io(kind, e))?,
        BodyKind::Tar => archive::tar(&mut fake, ext == "gz").map_err(|e| io(kind, e))?,
        BodyKind::Binary => binary::binary(&mut fake, &ext),
        BodyKind::Audio => audio::wav(&mut fake),
        BodyKind::Video => return Err(BuildError::Unsupported(kind)),
    };
    Ok(bytes)
}

fn io(kind: BodyKind, source: std::io::Error) -> BuildError {
    BuildError::Io { kind, source }
}

/// Split model output into non-empty paragraphs.
pub(crate) fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            continue;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(line.trim_start_matches('#').trim());
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Drop a surrounding Markdown code fence, which models add even when told
/// not to.
pub(crate) fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Escape text for XML element content and attribute values.
pub(crate) fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() && c != '\n' && c != '\t' => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUPPORTED: &[(BodyKind, &str)] = &[
        (BodyKind::Html, "html"),
        (BodyKind::Text, "txt"),
        (BodyKind::Json, "json"),
        (BodyKind::Csv, "csv"),
        (BodyKind::Stylesheet, "css"),
        (BodyKind::Script, "js"),
        (BodyKind::Document, "docx"),
        (BodyKind::Spreadsheet, "xlsx"),
        (BodyKind::Presentation, "pptx"),
        (BodyKind::Pdf, "pdf"),
        (BodyKind::Image, "png"),
        (BodyKind::Image, "jpg"),
        (BodyKind::Image, "gif"),
        (BodyKind::OneNote, "one"),
        (BodyKind::Zip, "zip"),
        (BodyKind::Tar, "tar"),
        (BodyKind::Tar, "gz"),
        (BodyKind::Binary, "exe"),
        (BodyKind::Audio, "wav"),
    ];

    #[test]
    fn every_supported_kind_builds_non_empty() {
        for (kind, ext) in SUPPORTED {
            let bytes = build(*kind, ext, 11, None).unwrap();
            assert!(!bytes.is_empty(), "{kind}/{ext} built nothing");
        }
    }

    #[test]
    fn builds_are_deterministic_per_seed() {
        for (kind, ext) in SUPPORTED {
            let a = build(*kind, ext, 99, None).unwrap();
            let b = build(*kind, ext, 99, None).unwrap();
            assert_eq!(a, b, "{kind}/{ext} is not deterministic");
        }
    }

    #[test]
    fn every_kind_but_video_has_a_builder() {
        for kind in BodyKind::ALL {
            assert_eq!(has_builder(kind), kind != BodyKind::Video);
        }
        assert!(matches!(
            build(BodyKind::Video, "mp4", 1, None),
            Err(BuildError::Unsupported(BodyKind::Video))
        ));
    }

    #[test]
    fn magic_numbers_match_extension() {
        assert!(build(BodyKind::Image, "png", 1, None).unwrap().starts_with(b"\x89PNG"));
        assert!(build(BodyKind::Image, "jpeg", 1, None).unwrap().starts_with(&[0xFF, 0xD8]));
        assert!(build(BodyKind::Image, "gif", 1, None).unwrap().starts_with(b"GIF8"));
        assert!(build(BodyKind::Image, "ico", 1, None).unwrap().starts_with(&[0, 0, 1, 0]));
        assert!(build(BodyKind::Pdf, "pdf", 1, None).unwrap().starts_with(b"%PDF-"));
        assert!(build(BodyKind::Document, "docx", 1, None).unwrap().starts_with(b"PK\x03\x04"));
        assert!(build(BodyKind::Zip, "zip", 1, None).unwrap().starts_with(b"PK\x03\x04"));
        assert!(build(BodyKind::Tar, "gz", 1, None).unwrap().starts_with(&[0x1f, 0x8b]));
        assert!(build(BodyKind::Audio, "wav", 1, None).unwrap().starts_with(b"RIFF"));
        assert!(build(BodyKind::Binary, "exe", 1, None).unwrap().starts_with(b"MZ"));
    }

    #[test]
    fn model_text_is_embedded() {
        let text = "Harbor expansion\n\nThe harbor expansion adds two berths.";
        let html = String::from_utf8(build(BodyKind::Html, "html", 1, Some(text)).unwrap()).unwrap();
        assert!(html.contains("The harbor expansion adds two berths."));
        let plain = build(BodyKind::Text, "txt", 1, Some(text)).unwrap();
        assert_eq!(plain, text.as_bytes());
    }

    #[test]
    fn blank_text_counts_as_none() {
        assert_eq!(
            build(BodyKind::Text, "txt", 5, Some("   ")).unwrap(),
            build(BodyKind::Text, "txt", 5, None).unwrap()
        );
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let p = paragraphs("# Title\n\nfirst line\nsecond line\n\n\nlast");
        assert_eq!(p, vec!["Title", "first line second line", "last"]);
    }

    #[test]
    fn code_fences_are_stripped() {
        assert_eq!(strip_code_fence("```js\nconsole.log(1);\n```"), "console.log(1);");
        assert_eq!(strip_code_fence("plain"), "plain");
    }

    #[test]
    fn xml_escape_handles_markup() {
        assert_eq!(xml_escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }
}
