//! Payload replay: fixed files served for configured path prefixes.
//!
//! ```yaml
//! payloads:
//!   - prefix: /downloads/invoice
//!     file: files/invoice.docm
//!   - prefix: /update
//!     file: /srv/payloads/agent.bin
//!     media_type: application/octet-stream
//! ```
//!
//! Relative `file` entries are resolved against the directory holding the
//! YAML file. Files are read per request so they can be swapped on disk.

use std::path::{Path, PathBuf};

use pandora_core::media_type_or_default;
use serde::Deserialize;

use crate::error::PayloadError;

/// One replay route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub prefix: String,
    pub file: PathBuf,
    pub media_type: String,
}

impl Payload {
    /// Name used in `Content-Disposition`.
    pub fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "payload.bin".to_string())
    }
}

#[derive(Debug, Deserialize)]
struct PayloadFile {
    #[serde(default)]
    payloads: Vec<PayloadEntry>,
}

#[derive(Debug, Deserialize)]
struct PayloadEntry {
    prefix: String,
    file: PathBuf,
    #[serde(default)]
    media_type: Option<String>,
}

/// Parse payload routes from YAML text. `base` anchors relative files.
pub fn parse_payloads(yaml: &str, base: &Path, origin: &Path) -> Result<Vec<Payload>, PayloadError> {
    let parsed: PayloadFile = serde_yaml::from_str(yaml).map_err(|source| PayloadError::Yaml {
        path: origin.to_path_buf(),
        source,
    })?;

    parsed
        .payloads
        .into_iter()
        .map(|entry| {
            if !entry.prefix.starts_with('/') {
                return Err(PayloadError::BadPrefix(entry.prefix));
            }
            let file = if entry.file.is_absolute() {
                entry.file
            } else {
                base.join(entry.file)
            };
            let media_type = entry.media_type.unwrap_or_else(|| {
                let ext = file.extension().and_then(|e| e.to_str()).unwrap_or("");
                media_type_or_default(ext, None).to_string()
            });
            Ok(Payload {
                prefix: entry.prefix,
                file,
                media_type,
            })
        })
        .collect()
}

/// Load payload routes from a YAML file.
pub fn load_payloads(path: &Path) -> Result<Vec<Payload>, PayloadError> {
    let yaml = std::fs::read_to_string(path).map_err(|source| PayloadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    parse_payloads(&yaml, base, path)
}
