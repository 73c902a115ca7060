//! Move-generation providers and their registry.
//!
//! A provider is anything that can turn a prompt into free-form text. The
//! orchestration core only depends on the [`LlmProvider`] trait; concrete
//! transports live in submodules and are resolved once per agent through the
//! [`ProviderRegistry`].

pub mod openai;
pub mod registry;

pub use openai::{OpenAiCompatProvider, ProviderConfig};
pub use registry::ProviderRegistry;

use async_trait::async_trait;

use crate::error::Result;

/// Abstract contract for an external text-generation capability.
///
/// Implementations are expected to be stateless across calls; the only
/// failure mode visible to callers is a transport error.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Model identifier, used for logging.
    fn model(&self) -> &str;

    /// Generate a free-form text response for the given prompt.
    async fn generate_response(&self, prompt: &str) -> Result<String>;
}

impl std::fmt::Debug for dyn LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmProvider")
            .field("model", &self.model())
            .finish()
    }
}
