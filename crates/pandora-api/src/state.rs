//! # Application State
//!
//! Built once at boot and shared read-only by every handler. Nothing in it
//! is mutated after startup, so no locks are needed.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use pandora_store::ContentStore;
use pandora_synth::{
    load_payloads, ChainSettings, ContentRegistry, DecoyErrors, Dispatcher, PrimarySettings,
};
use pandora_textgen::OllamaClient;

use crate::config::PandoraConfig;
use crate::error::BootError;

/// `Server` value used when the configured one is not a valid header.
const FALLBACK_SERVER: &str = "Apache";

#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<Inner>,
    decoy_errors: DecoyErrors,
}

#[derive(Debug)]
struct Inner {
    registry: ContentRegistry,
    dispatcher: Dispatcher,
    server_header: HeaderValue,
}

impl AppState {
    /// State with decoy errors switched off; see [`Self::with_decoy_errors`].
    pub fn new(registry: ContentRegistry, dispatcher: Dispatcher, server_header: &str) -> Self {
        let server_header = HeaderValue::from_str(server_header).unwrap_or_else(|_| {
            tracing::warn!(value = server_header, "invalid server header, using default");
            HeaderValue::from_static(FALLBACK_SERVER)
        });
        Self {
            inner: Arc::new(Inner {
                registry,
                dispatcher,
                server_header,
            }),
            decoy_errors: DecoyErrors::disabled(),
        }
    }

    pub fn with_decoy_errors(mut self, decoy_errors: DecoyErrors) -> Self {
        self.decoy_errors = decoy_errors;
        self
    }

    /// Wire the registry, chains and cache from configuration.
    pub fn from_config(config: &PandoraConfig) -> Result<Self, BootError> {
        let primary = if config.textgen.enabled {
            let client = OllamaClient::new(&config.textgen)?;
            tracing::info!(endpoint = %client.endpoint_url(), "text generation enabled");
            Some(PrimarySettings {
                generator: Arc::new(client),
                model: config.textgen.model.clone(),
                html_model: config.textgen.html_model.clone(),
                timeout: Duration::from_secs(config.textgen.timeout_secs),
            })
        } else {
            tracing::info!("text generation disabled");
            None
        };
        let settings = ChainSettings {
            primary,
            static_dir: config.static_dir.clone(),
        };

        let payloads = match &config.payloads {
            Some(path) => load_payloads(path)?,
            None => Vec::new(),
        };
        if !payloads.is_empty() {
            tracing::info!(count = payloads.len(), "payload routes loaded");
        }

        let registry = ContentRegistry::builtin(&settings, payloads)?;
        let dispatcher = Dispatcher::new(ContentStore::new(config.store.clone()));
        Ok(Self::new(registry, dispatcher, &config.server_header)
            .with_decoy_errors(config.decoy_errors))
    }

    pub fn registry(&self) -> &ContentRegistry {
        &self.inner.registry
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    pub fn server_header(&self) -> &HeaderValue {
        &self.inner.server_header
    }

    pub fn decoy_errors(&self) -> DecoyErrors {
        self.decoy_errors
    }
}
