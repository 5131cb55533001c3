//! # Dispatcher
//!
//! Turns a resolved identity into bytes: cache first, then the type's
//! generator chain, then a best-effort save back into the cache.
//!
//! Cache and save-through failures only ever cost performance. The single
//! error that escapes is [`DispatchError::Exhausted`].
//!
//! Concurrent misses for the same identity may both generate; the store's
//! atomic rename keeps the file whole and the last writer wins.

use pandora_core::{ContentIdentity, Descriptor};
use pandora_store::ContentStore;
use serde::Serialize;

use crate::chain::{GenerationContext, Tier};
use crate::error::DispatchError;
use crate::registry::RegisteredType;

/// Where the served bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Cache,
    Generated(Tier),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub bytes: Vec<u8>,
    pub source: Source,
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    store: ContentStore,
}

impl Dispatcher {
    pub fn new(store: ContentStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Resolve `raw_path` to an identity under the cache root for `entry`.
    pub fn identify(
        &self,
        entry: &RegisteredType,
        raw_path: &str,
        descriptor: &Descriptor<'_>,
    ) -> ContentIdentity {
        ContentIdentity::resolve(self.store.root_for(entry.kind()), raw_path, descriptor)
    }

    /// Serve `identity` with a fresh random seed.
    pub async fn resolve(
        &self,
        identity: &ContentIdentity,
        entry: &RegisteredType,
    ) -> Result<Generated, DispatchError> {
        self.resolve_seeded(identity, entry, rand::random()).await
    }

    /// Serve `identity`, using `seed` for any generation.
    pub async fn resolve_seeded(
        &self,
        identity: &ContentIdentity,
        entry: &RegisteredType,
        seed: u64,
    ) -> Result<Generated, DispatchError> {
        if self.store.exists(identity).await {
            match self.store.load(identity).await {
                Ok(Some(bytes)) => {
                    tracing::debug!(path = %identity.relative_path, "cache hit");
                    return Ok(Generated {
                        bytes,
                        source: Source::Cache,
                    });
                }
                // Evicted between the check and the read.
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(path = %identity.relative_path, error = %e, "cache read failed");
                }
            }
        }

        let ctx = GenerationContext {
            identity,
            kind: entry.kind(),
            seed,
        };
        let produced = entry.chain.run(&ctx).await.map_err(|attempts| {
            tracing::error!(
                path = %identity.relative_path,
                kind = %entry.kind(),
                attempts,
                "every generation tier failed"
            );
            DispatchError::Exhausted {
                path: identity.relative_path.clone(),
                kind: entry.kind(),
                attempts,
            }
        })?;

        if let Err(e) = self.store.save(identity, &produced.bytes).await {
            tracing::warn!(path = %identity.relative_path, error = %e, "cache save failed");
        }

        tracing::info!(
            path = %identity.relative_path,
            kind = %entry.kind(),
            tier = %produced.tier,
            bytes = produced.bytes.len(),
            "generated content"
        );
        Ok(Generated {
            bytes: produced.bytes,
            source: Source::Generated(produced.tier),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::tests::StubGenerator;
    use crate::chain::{GenerativeStrategy, GeneratorChain, StaticStrategy, SyntheticStrategy};
    use pandora_core::{BodyKind, BUILTIN_TYPES};
    use pandora_store::StoreConfig;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn content_type(kind: BodyKind) -> pandora_core::ContentType {
        *BUILTIN_TYPES.iter().find(|t| t.kind == kind).unwrap()
    }

    fn text_entry(stub: Arc<StubGenerator>) -> RegisteredType {
        RegisteredType::new(
            content_type(BodyKind::Text),
            GeneratorChain::default()
                .with(GenerativeStrategy::new(stub, "m", Duration::from_secs(5)))
                .with(SyntheticStrategy),
        )
    }

    #[tokio::test]
    async fn second_request_is_served_from_cache() {
        let dir = TempDir::new().unwrap();
        let dispatcher = Dispatcher::new(ContentStore::new(StoreConfig::new(true, dir.path())));
        let stub = Arc::new(StubGenerator::reply("first answer"));
        let entry = text_entry(stub.clone());
        let id = dispatcher.identify(&entry, "/notes/minutes", &entry.content_type.descriptor());

        let first = dispatcher.resolve_seeded(&id, &entry, 1).await.unwrap();
        let second = dispatcher.resolve_seeded(&id, &entry, 2).await.unwrap();

        assert_eq!(first.source, Source::Generated(Tier::Primary));
        assert_eq!(second.source, Source::Cache);
        assert_eq!(first.bytes, second.bytes);
        assert_eq!(stub.calls(), 1);
        assert!(dir.path().join("text/notes/minutes.txt").is_file());
    }

    #[tokio::test]
    async fn disabled_cache_generates_every_time() {
        let dispatcher = Dispatcher::new(ContentStore::new(StoreConfig::disabled()));
        let stub = Arc::new(StubGenerator::reply("answer"));
        let entry = text_entry(stub.clone());
        let id = dispatcher.identify(&entry, "/a", &entry.content_type.descriptor());

        for seed in 0..3 {
            let out = dispatcher.resolve_seeded(&id, &entry, seed).await.unwrap();
            assert_eq!(out.source, Source::Generated(Tier::Primary));
        }
        assert_eq!(stub.calls(), 3);
    }

    #[tokio::test]
    async fn unwritable_cache_still_serves() {
        let dir = TempDir::new().unwrap();
        // A file where the cache directory should be.
        let blocker = dir.path().join("cache");
        std::fs::write(&blocker, b"x").unwrap();
        let dispatcher = Dispatcher::new(ContentStore::new(StoreConfig::new(true, &blocker)));
        let entry = RegisteredType::new(
            content_type(BodyKind::Csv),
            GeneratorChain::default().with(SyntheticStrategy),
        );
        let id = dispatcher.identify(&entry, "/export", &entry.content_type.descriptor());

        let out = dispatcher.resolve_seeded(&id, &entry, 5).await.unwrap();
        assert_eq!(out.source, Source::Generated(Tier::Secondary));
        assert!(!out.bytes.is_empty());
    }

    #[tokio::test]
    async fn exhausted_chain_is_the_only_error() {
        let dir = TempDir::new().unwrap();
        let dispatcher = Dispatcher::new(ContentStore::new(StoreConfig::new(true, dir.path())));
        let entry = RegisteredType::new(
            content_type(BodyKind::Video),
            GeneratorChain::default().with(StaticStrategy::new(dir.path().join("missing.mp4"))),
        );
        let id = dispatcher.identify(&entry, "/video/clip", &entry.content_type.descriptor());

        let err = dispatcher.resolve_seeded(&id, &entry, 1).await.unwrap_err();
        let DispatchError::Exhausted { path, kind, attempts } = err;
        assert_eq!(path, "video/clip.mp4");
        assert_eq!(kind, BodyKind::Video);
        assert_eq!(attempts, 1);
        assert!(!dir.path().join("video").exists());
    }

    #[tokio::test]
    async fn empty_chain_is_exhausted() {
        let dispatcher = Dispatcher::new(ContentStore::new(StoreConfig::disabled()));
        let entry = RegisteredType::new(content_type(BodyKind::Pdf), GeneratorChain::default());
        let id = dispatcher.identify(&entry, "x", &entry.content_type.descriptor());
        assert!(dispatcher.resolve_seeded(&id, &entry, 1).await.is_err());
    }

    #[tokio::test]
    async fn pre_seeded_cache_file_is_served_verbatim() {
        let dir = TempDir::new().unwrap();
        let dispatcher = Dispatcher::new(ContentStore::new(StoreConfig::new(true, dir.path())));
        let stub = Arc::new(StubGenerator::reply("never used"));
        let entry = text_entry(stub.clone());
        let id = dispatcher.identify(&entry, "/seeded", &entry.content_type.descriptor());
        std::fs::create_dir_all(id.parent_dir()).unwrap();
        std::fs::write(id.full_path(), b"planted").unwrap();

        let out = dispatcher.resolve(&id, &entry).await.unwrap();
        assert_eq!(out.bytes, b"planted");
        assert_eq!(out.source, Source::Cache);
        assert_eq!(stub.calls(), 0);
    }
}
