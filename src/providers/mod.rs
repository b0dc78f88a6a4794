//! LLM provider implementations and the factory that picks one

pub mod http;
pub mod openai;
pub mod anthropic;
pub mod ollama;
pub mod github;

pub use anthropic::AnthropicProvider;
pub use github::GitHubModelsProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use log::debug;

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::request::{AiResponse, Message};

/// Anything that can answer a chat-style request.
///
/// `history`, when given, is sent first and `prompt` is appended as a new
/// user turn. Implementations perform exactly one network exchange.
#[async_trait]
pub trait AiProvider: Send + Sync
{   async fn complete(
      &self
    , prompt: &str
    , history: Option<&[Message]>
    ) -> Result<AiResponse>;

    /// Backend family and model, for logs only
    fn name(&self) -> String;
}

/// Build the adapter matching `config.provider`
pub fn create_provider(
  config: ProviderConfig
) -> Result<Box<dyn AiProvider>>
{   debug!("Creating provider for {}", config.provider.as_str());
    let provider: Box<dyn AiProvider> = match config.provider
    {   crate::Provider::OpenAi => Box::new(OpenAiProvider::new(config)?)
      , crate::Provider::Anthropic => Box::new(AnthropicProvider::new(config)?)
      , crate::Provider::Ollama => Box::new(OllamaProvider::new(config)?)
      , crate::Provider::GitHub => Box::new(GitHubModelsProvider::new(config)?)
    };
    debug!("Created provider: {}", provider.name());
    Ok(provider)
}

/// Build the adapter for a raw selector string, overriding
/// `config.provider`. Unknown selectors fail with the value named.
pub fn create_provider_named(
  selector: &str
, config: ProviderConfig
) -> Result<Box<dyn AiProvider>>
{   let provider = selector.parse::<crate::Provider>()?;
    create_provider(ProviderConfig { provider, ..config })
}
