//! # Generator Chains
//!
//! A chain is the ordered list of strategies for one content type. Tiers
//! run strictly in order, each at most once per request, and the first
//! non-empty output wins. There is no merging between tiers and no retry.
//!
//! | Tier | Strategy | Can fail? |
//! |------|----------|-----------|
//! | Primary | [`GenerativeStrategy`]: model text poured into the builder | yes, soft |
//! | Secondary | [`SyntheticStrategy`]: seeded builder output | no, for every kind with a builder |
//! | Tertiary | [`StaticStrategy`]: a fixture file served verbatim | yes, if the fixture is missing |

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pandora_core::{BodyKind, ContentIdentity};
use pandora_textgen::{GenerateRequest, TextGenerator};
use serde::Serialize;

use crate::builders;
use crate::error::TierFailure;
use crate::prompt;

/// Position of a strategy in the fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Primary,
    Secondary,
    Tertiary,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Tertiary => "tertiary",
        })
    }
}

/// Everything a strategy may look at.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    pub identity: &'a ContentIdentity,
    pub kind: BodyKind,
    /// Seed for every random choice made while producing this body.
    pub seed: u64,
}

/// One synthesis strategy.
#[async_trait]
pub trait Strategy: Send + Sync + fmt::Debug {
    fn tier(&self) -> Tier;

    /// Whether `attempt` cannot fail for the kinds it is registered for.
    fn is_guaranteed(&self) -> bool {
        false
    }

    async fn attempt(&self, ctx: &GenerationContext<'_>) -> Result<Vec<u8>, TierFailure>;
}

// -- Primary -------------------------------------------------------------------

/// Asks the language model for text and pours it into the kind's builder.
pub struct GenerativeStrategy {
    generator: Arc<dyn TextGenerator>,
    model: String,
    timeout: Duration,
}

impl GenerativeStrategy {
    pub fn new(generator: Arc<dyn TextGenerator>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            generator,
            model: model.into(),
            timeout,
        }
    }
}

impl fmt::Debug for GenerativeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerativeStrategy")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Strategy for GenerativeStrategy {
    fn tier(&self) -> Tier {
        Tier::Primary
    }

    async fn attempt(&self, ctx: &GenerationContext<'_>) -> Result<Vec<u8>, TierFailure> {
        // Row counts for tabular prompts come from the seed, like everything else.
        let rows = 1 + (ctx.seed % 100) as usize;
        let instruction =
            prompt::instruction(ctx.kind, ctx.identity, rows).ok_or(TierFailure::NoPrompt(ctx.kind))?;
        let req = GenerateRequest::new(self.model.clone(), instruction);

        let text = match tokio::time::timeout(self.timeout, self.generator.generate(&req)).await {
            Err(_) => return Err(TierFailure::Timeout(self.timeout)),
            Ok(result) => result?,
        };
        if text.trim().is_empty() {
            return Err(TierFailure::Empty);
        }

        let bytes = builders::build(ctx.kind, &ctx.identity.extension, ctx.seed, Some(&text))?;
        if bytes.is_empty() {
            return Err(TierFailure::Empty);
        }
        Ok(bytes)
    }
}

// -- Secondary -----------------------------------------------------------------

/// Seeded synthetic content from the local builders.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticStrategy;

#[async_trait]
impl Strategy for SyntheticStrategy {
    fn tier(&self) -> Tier {
        Tier::Secondary
    }

    fn is_guaranteed(&self) -> bool {
        true
    }

    async fn attempt(&self, ctx: &GenerationContext<'_>) -> Result<Vec<u8>, TierFailure> {
        let bytes = builders::build(ctx.kind, &ctx.identity.extension, ctx.seed, None)?;
        if bytes.is_empty() {
            return Err(TierFailure::Empty);
        }
        Ok(bytes)
    }
}

// -- Tertiary ------------------------------------------------------------------

/// A pre-built fixture served byte for byte.
#[derive(Debug, Clone)]
pub struct StaticStrategy {
    fixture: PathBuf,
}

impl StaticStrategy {
    pub fn new(fixture: impl Into<PathBuf>) -> Self {
        Self {
            fixture: fixture.into(),
        }
    }

    pub fn fixture(&self) -> &std::path::Path {
        &self.fixture
    }
}

#[async_trait]
impl Strategy for StaticStrategy {
    fn tier(&self) -> Tier {
        Tier::Tertiary
    }

    async fn attempt(&self, _ctx: &GenerationContext<'_>) -> Result<Vec<u8>, TierFailure> {
        let bytes = tokio::fs::read(&self.fixture)
            .await
            .map_err(|source| TierFailure::Fixture {
                path: self.fixture.clone(),
                source,
            })?;
        if bytes.is_empty() {
            return Err(TierFailure::Empty);
        }
        Ok(bytes)
    }
}

// -- Chain ---------------------------------------------------------------------

/// Output of a successful chain run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Produced {
    pub bytes: Vec<u8>,
    pub tier: Tier,
}

/// Ordered strategies for one content type. Built once at startup.
#[derive(Debug, Clone, Default)]
pub struct GeneratorChain {
    strategies: Vec<Arc<dyn Strategy>>,
}

impl GeneratorChain {
    pub fn new(strategies: Vec<Arc<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    pub fn with(mut self, strategy: impl Strategy + 'static) -> Self {
        self.strategies.push(Arc::new(strategy));
        self
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn tiers(&self) -> Vec<Tier> {
        self.strategies.iter().map(|s| s.tier()).collect()
    }

    /// Whether some strategy in the chain cannot fail.
    pub fn has_guaranteed_tier(&self) -> bool {
        self.strategies.iter().any(|s| s.is_guaranteed())
    }

    /// Try each strategy in order. On total failure returns the number of
    /// strategies attempted.
    pub async fn run(&self, ctx: &GenerationContext<'_>) -> Result<Produced, usize> {
        for strategy in &self.strategies {
            let tier = strategy.tier();
            match strategy.attempt(ctx).await {
                Ok(bytes) => return Ok(Produced { bytes, tier }),
                Err(e) => {
                    tracing::warn!(
                        path = %ctx.identity.relative_path,
                        kind = %ctx.kind,
                        tier = %tier,
                        error = %e,
                        "generation tier failed, falling through"
                    );
                }
            }
        }
        Err(self.strategies.len())
    }
}
