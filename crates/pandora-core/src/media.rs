//! # Media-Type Lookup
//!
//! Derives a response `Content-Type` from a file extension. Pure lookup;
//! the produced bytes are never sniffed.

/// Fallback when nothing better is known.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Guess the media type for an extension (case-insensitive, dot optional).
pub fn guess_media_type(extension: &str) -> Option<&'static str> {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    let media = match ext.as_str() {
        "html" | "htm" => "text/html",
        "txt" => "text/plain",
        "json" => "application/json",
        "csv" => "text/csv",
        "css" => "text/css",
        "js" => "application/javascript",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "dotx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.template",
        "doc" | "dot" => "application/msword",
        "docm" => "application/vnd.ms-word.document.macroEnabled.12",
        "dotm" => "application/vnd.ms-word.template.macroEnabled.12",
        "odt" => "application/vnd.oasis.opendocument.text",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" | "xla" => "application/vnd.ms-excel",
        "xlsm" => "application/vnd.ms-excel.sheet.macroEnabled.12",
        "xlsb" => "application/vnd.ms-excel.sheet.binary.macroEnabled.12",
        "xltm" => "application/vnd.ms-excel.template.macroEnabled.12",
        "xlam" => "application/vnd.ms-excel.addin.macroEnabled.12",
        "ods" => "application/vnd.oasis.opendocument.spreadsheet",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "potx" => "application/vnd.openxmlformats-officedocument.presentationml.template",
        "ppsx" => "application/vnd.openxmlformats-officedocument.presentationml.slideshow",
        "ppt" | "pot" | "pps" => "application/vnd.ms-powerpoint",
        "pptm" => "application/vnd.ms-powerpoint.presentation.macroEnabled.12",
        "potm" => "application/vnd.ms-powerpoint.template.macroEnabled.12",
        "ppsm" => "application/vnd.ms-powerpoint.slideshow.macroEnabled.12",
        "odp" => "application/vnd.oasis.opendocument.presentation",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "one" => "application/onenote",
        "zip" => "application/zip",
        "tar" => "application/x-tar",
        "gz" => "application/gzip",
        "exe" => "application/vnd.microsoft.portable-executable",
        "msi" => "application/x-msi",
        "iso" => "application/x-iso9660-image",
        "rar" => "application/vnd.rar",
        "chm" => "application/vnd.ms-htmlhelp",
        "bin" => OCTET_STREAM,
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        _ => return None,
    };
    Some(media)
}

/// Guess the media type, falling back to `default` and then to
/// `application/octet-stream`.
pub fn media_type_or_default(extension: &str, default: Option<&'static str>) -> &'static str {
    guess_media_type(extension)
        .or(default)
        .unwrap_or(OCTET_STREAM)
}
