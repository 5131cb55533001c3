//! # Content Registry
//!
//! Immutable after startup. Maps a request path to a registered content type
//! (with its generator chain), a payload replay, or nothing.
//!
//! ## Routing precedence
//!
//! 1. Payload prefix (checked against the raw path).
//! 2. File extension of the last path segment, case-insensitive.
//! 3. Longest matching directory prefix.
//! 4. The empty path, which serves the HTML root.
//! 5. Otherwise unknown.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use pandora_core::{BodyKind, ContentType, CoreError, Descriptor, BUILTIN_TYPES};
use pandora_textgen::TextGenerator;
use percent_encoding::percent_decode_str;

use crate::builders;
use crate::chain::{GenerativeStrategy, GeneratorChain, StaticStrategy, SyntheticStrategy};
use crate::payload::Payload;

/// File name of the video fixture inside the static directory.
pub const VIDEO_FIXTURE: &str = "test_movie.mp4";

/// A content type together with the chain that produces it.
#[derive(Debug, Clone)]
pub struct RegisteredType {
    pub content_type: ContentType,
    pub chain: GeneratorChain,
}

impl RegisteredType {
    pub fn new(content_type: ContentType, chain: GeneratorChain) -> Self {
        Self {
            content_type,
            chain,
        }
    }

    pub fn kind(&self) -> BodyKind {
        self.content_type.kind
    }

    /// Eligible for the unknown-path fallback: flagged so, and backed by a
    /// tier that cannot fail.
    pub fn is_random_eligible(&self) -> bool {
        self.content_type.random_eligible && self.chain.has_guaranteed_tier()
    }
}

// -- Chain construction --------------------------------------------------------

/// Language-model settings for the primary tier.
#[derive(Clone)]
pub struct PrimarySettings {
    pub generator: Arc<dyn TextGenerator>,
    pub model: String,
    /// Model used for HTML pages.
    pub html_model: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for PrimarySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimarySettings")
            .field("model", &self.model)
            .field("html_model", &self.html_model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Everything needed to build the default chains.
#[derive(Debug, Clone, Default)]
pub struct ChainSettings {
    /// `None` disables the primary tier everywhere.
    pub primary: Option<PrimarySettings>,
    /// Directory holding static fixtures.
    pub static_dir: PathBuf,
}

/// The default chain for a content type.
///
/// Textual kinds try the model first and fall back to synthetic output.
/// Every other kind with a builder is synthetic only. Video has no builder
/// and is served from a fixture.
pub fn default_chain(content_type: &ContentType, settings: &ChainSettings) -> GeneratorChain {
    let kind = content_type.kind;
    let mut chain = GeneratorChain::default();

    if kind.is_textual() {
        if let Some(primary) = &settings.primary {
            let model = if kind == BodyKind::Html {
                &primary.html_model
            } else {
                &primary.model
            };
            chain = chain.with(GenerativeStrategy::new(
                primary.generator.clone(),
                model.clone(),
                primary.timeout,
            ));
        }
    }
    if builders::has_builder(kind) {
        chain = chain.with(SyntheticStrategy);
    }
    if kind == BodyKind::Video {
        chain = chain.with(StaticStrategy::new(settings.static_dir.join(VIDEO_FIXTURE)));
    }
    chain
}

// -- Routing -------------------------------------------------------------------

/// Where a request path goes.
#[derive(Debug)]
pub enum Route<'r> {
    Payload(&'r Payload),
    Typed {
        entry: &'r RegisteredType,
        /// Explicit request extension for extension routes, canonical otherwise.
        descriptor: Descriptor<'static>,
    },
    Unknown,
}

#[derive(Debug)]
pub struct ContentRegistry {
    types: Vec<RegisteredType>,
    by_extension: HashMap<&'static str, (usize, &'static str)>,
    /// Longest first.
    prefixes: Vec<(&'static str, usize)>,
    html: Option<usize>,
    eligible: Vec<usize>,
    payloads: Vec<Payload>,
}

impl ContentRegistry {
    /// Build a registry, rejecting overlapping extensions or prefixes.
    pub fn new(types: Vec<RegisteredType>, payloads: Vec<Payload>) -> Result<Self, CoreError> {
        let mut by_extension: HashMap<&'static str, (usize, &'static str)> = HashMap::new();
        let mut prefixes: Vec<(&'static str, usize)> = Vec::new();

        for (idx, entry) in types.iter().enumerate() {
            let ct = &entry.content_type;
            for &ext in ct.extensions {
                if let Some(&(first, _)) = by_extension.get(ext) {
                    return Err(CoreError::DuplicateExtension {
                        extension: ext.to_string(),
                        first: types[first].kind().to_string(),
                        second: ct.kind.to_string(),
                    });
                }
                by_extension.insert(ext, (idx, ext));
            }
            for &prefix in ct.prefixes {
                if let Some(&(_, first)) = prefixes.iter().find(|(p, _)| *p == prefix) {
                    return Err(CoreError::DuplicatePrefix {
                        prefix: prefix.to_string(),
                        first: types[first].kind().to_string(),
                        second: ct.kind.to_string(),
                    });
                }
                prefixes.push((prefix, idx));
            }
        }
        prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let html = types.iter().position(|t| t.kind() == BodyKind::Html);
        let eligible = types
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_random_eligible())
            .map(|(i, _)| i)
            .collect();

        Ok(Self {
            types,
            by_extension,
            prefixes,
            html,
            eligible,
            payloads,
        })
    }

    /// Registry of every built-in type with its default chain.
    pub fn builtin(settings: &ChainSettings, payloads: Vec<Payload>) -> Result<Self, CoreError> {
        let types = BUILTIN_TYPES
            .iter()
            .map(|ct| RegisteredType::new(*ct, default_chain(ct, settings)))
            .collect();
        Self::new(types, payloads)
    }

    pub fn types(&self) -> &[RegisteredType] {
        &self.types
    }

    pub fn payloads(&self) -> &[Payload] {
        &self.payloads
    }

    pub fn get(&self, kind: BodyKind) -> Option<&RegisteredType> {
        self.types.iter().find(|t| t.kind() == kind)
    }

    /// Types the unknown-path fallback may pick from.
    pub fn eligible(&self) -> Vec<&RegisteredType> {
        self.eligible.iter().map(|&i| &self.types[i]).collect()
    }

    /// Route a raw (still percent-encoded) request path.
    pub fn route(&self, raw_path: &str) -> Route<'_> {
        if let Some(payload) = self.payloads.iter().find(|p| raw_path.starts_with(&p.prefix)) {
            return Route::Payload(payload);
        }

        let decoded = percent_decode_str(raw_path).decode_utf8_lossy();
        let path = decoded.trim();

        if let Some(ext) = last_extension(path) {
            if let Some(&(idx, canonical)) = self.by_extension.get(ext.to_ascii_lowercase().as_str()) {
                let entry = &self.types[idx];
                return Route::Typed {
                    entry,
                    descriptor: entry.content_type.descriptor_for(canonical),
                };
            }
        }

        let normalised = path.replace('\\', "/");
        let rooted = format!("/{}", normalised.trim_start_matches('/'));
        for &(prefix, idx) in &self.prefixes {
            let matches = rooted
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
            if matches {
                let entry = &self.types[idx];
                return Route::Typed {
                    entry,
                    descriptor: entry.content_type.descriptor(),
                };
            }
        }

        if rooted == "/" {
            if let Some(idx) = self.html {
                let entry = &self.types[idx];
                return Route::Typed {
                    entry,
                    descriptor: entry.content_type.descriptor(),
                };
            }
        }

        Route::Unknown
    }
}

/// Whether a raw request path names the site root.
pub fn is_site_root(raw_path: &str) -> bool {
    let decoded = percent_decode_str(raw_path).decode_utf8_lossy();
    decoded
        .trim()
        .trim_start_matches(['/', '\\'])
        .is_empty()
}

/// Extension of the last path segment, if it has a non-empty stem.
fn last_extension(path: &str) -> Option<&str> {
    let last = path.rsplit(['/', '\\']).next()?;
    let (stem, ext) = last.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ContentRegistry {
        ContentRegistry::builtin(&ChainSettings::default(), Vec::new()).unwrap()
    }

    fn kind_of(registry: &ContentRegistry, path: &str) -> Option<(BodyKind, &'static str)> {
        match registry.route(path) {
            Route::Typed { entry, descriptor } => Some((entry.kind(), descriptor.extension)),
            _ => None,
        }
    }

    #[test]
    fn extension_routes_keep_the_requested_extension() {
        let r = registry();
        assert_eq!(kind_of(&r, "/reports/q3.DOC"), Some((BodyKind::Document, "doc")));
        assert_eq!(kind_of(&r, "/a/b/photo.jpeg"), Some((BodyKind::Image, "jpeg")));
        assert_eq!(kind_of(&r, "/favicon.ico"), Some((BodyKind::Image, "ico")));
        assert_eq!(kind_of(&r, "/dump.tar"), Some((BodyKind::Tar, "tar")));
    }

    #[test]
    fn extension_beats_prefix() {
        let r = registry();
        assert_eq!(kind_of(&r, "/docs/budget.pdf"), Some((BodyKind::Pdf, "pdf")));
    }

    #[test]
    fn prefix_routes_use_the_canonical_extension() {
        let r = registry();
        assert_eq!(kind_of(&r, "/docs/budget"), Some((BodyKind::Document, "docx")));
        assert_eq!(kind_of(&r, "/images"), Some((BodyKind::Image, "png")));
        assert_eq!(kind_of(&r, "/i/x"), Some((BodyKind::Image, "png")));
    }

    #[test]
    fn prefix_match_respects_segment_boundaries() {
        let r = registry();
        assert!(matches!(r.route("/docsify/x"), Route::Unknown));
        assert!(matches!(r.route("/imagery"), Route::Unknown));
    }

    #[test]
    fn empty_path_is_the_html_root() {
        let r = registry();
        assert_eq!(kind_of(&r, "/"), Some((BodyKind::Html, "html")));
        assert_eq!(kind_of(&r, ""), Some((BodyKind::Html, "html")));
    }

    #[test]
    fn site_root_detection_matches_routing() {
        for root in ["", "/", "//", "%2F"] {
            assert!(is_site_root(root), "{root:?}");
        }
        for other in ["/index", "/docs/", "/a.html"] {
            assert!(!is_site_root(other), "{other:?}");
        }
        let r = registry();
        assert_eq!(kind_of(&r, "%2F"), Some((BodyKind::Html, "html")));
    }

    #[test]
    fn unregistered_paths_are_unknown() {
        let r = registry();
        assert!(matches!(r.route("/wp-login"), Route::Unknown));
        assert!(matches!(r.route("/file.xyz"), Route::Unknown));
        assert!(matches!(r.route("/.htaccess"), Route::Unknown));
    }

    #[test]
    fn percent_encoded_extension_is_decoded() {
        let r = registry();
        assert_eq!(kind_of(&r, "/q%2Epdf"), Some((BodyKind::Pdf, "pdf")));
    }

    #[test]
    fn payload_prefix_wins_over_everything() {
        let payload = Payload {
            prefix: "/docs/secret".to_string(),
            file: PathBuf::from("/srv/p.docx"),
            media_type: "application/octet-stream".to_string(),
        };
        let r = ContentRegistry::builtin(&ChainSettings::default(), vec![payload]).unwrap();
        assert!(matches!(r.route("/docs/secret/plan.docx"), Route::Payload(_)));
        assert!(matches!(r.route("/docs/other.docx"), Route::Typed { .. }));
    }

    #[test]
    fn video_without_guaranteed_tier_is_not_eligible() {
        let r = registry();
        let eligible: Vec<BodyKind> = r.eligible().iter().map(|t| t.kind()).collect();
        assert!(!eligible.contains(&BodyKind::Video));
        assert_eq!(eligible.len(), BodyKind::ALL.len() - 1);
    }

    #[test]
    fn duplicate_extensions_are_rejected() {
        let html = BUILTIN_TYPES[0];
        let types = vec![
            RegisteredType::new(html, GeneratorChain::default()),
            RegisteredType::new(html, GeneratorChain::default()),
        ];
        assert!(matches!(
            ContentRegistry::new(types, Vec::new()),
            Err(CoreError::DuplicateExtension { .. })
        ));
    }

    #[test]
    fn duplicate_prefixes_are_rejected() {
        let mut a = BUILTIN_TYPES[1];
        let mut b = BUILTIN_TYPES[2];
        a.prefixes = &["/shared"];
        b.prefixes = &["/shared"];
        let types = vec![
            RegisteredType::new(a, GeneratorChain::default()),
            RegisteredType::new(b, GeneratorChain::default()),
        ];
        assert!(matches!(
            ContentRegistry::new(types, Vec::new()),
            Err(CoreError::DuplicatePrefix { .. })
        ));
    }

    #[test]
    fn default_chains_match_kind() {
        let r = registry();
        for t in r.types() {
            let tiers = t.chain.tiers();
            if t.kind() == BodyKind::Video {
                assert_eq!(tiers, vec![crate::chain::Tier::Tertiary]);
            } else {
                assert_eq!(tiers, vec![crate::chain::Tier::Secondary], "{}", t.kind());
            }
        }
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn routed_identities_carry_the_descriptor_extension(path in "\\PC{0,40}") {
                let r = registry();
                if let Route::Typed { entry, descriptor } = r.route(&path) {
                    let id = pandora_core::ContentIdentity::resolve("/cache", &path, &descriptor);
                    prop_assert!(id.extension.eq_ignore_ascii_case(descriptor.extension));
                    prop_assert!(entry.content_type.accepts_extension(&id.extension));
                }
            }
        }
    }
}
