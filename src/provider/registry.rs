//! Provider registry: model family -> provider factory.
//!
//! Agents name a provider family explicitly in their configuration; the
//! registry resolves it to a factory exactly once at agent creation time.
//! New transports are added by registering a new factory, never by
//! branching on model-name prefixes.

use std::env;
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::{Error, Result};

use super::openai::{OpenAiCompatProvider, ProviderConfig};
use super::LlmProvider;

/// Factory building a provider for a concrete model id.
pub type ProviderFactory = Arc<dyn Fn(&str) -> Result<Arc<dyn LlmProvider>> + Send + Sync>;

/// Registry mapping provider-family identifiers to factories.
pub struct ProviderRegistry {
    factories: DashMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: DashMap::new(),
        }
    }

    /// Create a registry with the built-in provider families registered.
    pub fn with_default_providers() -> Self {
        let registry = Self::new();
        registry.register("deepseek", openai_compat_factory("DEEPSEEK_API_KEY", 0.6, 0.7));
        registry.register("llama", openai_compat_factory("LLAMA_API_KEY", 0.6, 0.95));
        registry
    }

    /// Register (or replace) a factory under a family identifier.
    pub fn register(&self, family: &str, factory: ProviderFactory) {
        self.factories.insert(family.to_string(), factory);
    }

    /// Resolve a provider for the given family and model id.
    pub fn resolve(&self, family: &str, model: &str) -> Result<Arc<dyn LlmProvider>> {
        let factory = self
            .factories
            .get(family)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::UnsupportedProvider(family.to_string()))?;
        (*factory)(model)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_default_providers()
    }
}

fn openai_compat_factory(api_key_env: &'static str, temperature: f32, top_p: f32) -> ProviderFactory {
    Arc::new(move |model: &str| -> Result<Arc<dyn LlmProvider>> {
        let api_key =
            env::var(api_key_env).map_err(|_| Error::MissingApiKey(api_key_env.to_string()))?;
        let provider = OpenAiCompatProvider::new(ProviderConfig {
            model: model.to_string(),
            api_key,
            temperature,
            top_p,
            ..ProviderConfig::default()
        })?;
        Ok(Arc::new(provider) as Arc<dyn LlmProvider>)
    })
}
