use chrono::{DateTime, Utc};
use log::{debug, error, info};
use serde::Serialize;

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::providers::AiProvider;
use crate::request::{Message, Role, Usage};

/// What the assistant hands back for one call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantResponse
{   pub message: String
  , pub usage: Usage
  , pub timestamp: DateTime<Utc>
}

/// Single-backend conversational client.
///
/// Holds one provider for its whole lifetime and carries no per-call
/// state, so `&Assistant` can be shared across concurrent callers. Every
/// call is exactly one provider call; nothing is retried.
pub struct Assistant
{   provider: Box<dyn AiProvider>
}

impl Assistant
{   /// Resolve configuration from the environment and build the provider
    pub fn new() -> Result<Self>
    {   Self::from_config(ProviderConfig::from_env())
    }

    pub fn from_config(config: ProviderConfig) -> Result<Self>
    {   let provider = crate::providers::create_provider(config)?;
        Ok(Self::with_provider(provider))
    }

    pub fn with_provider(provider: Box<dyn AiProvider>) -> Self
    {   info!("Assistant using {}", provider.name());
        Assistant { provider }
    }

    pub fn provider_name(&self) -> String
    {   self.provider.name()
    }

    /// One question, no history
    pub async fn ask(&self, question: &str) -> Result<AssistantResponse>
    {   debug!("ask via {}", self.provider.name());
        self.send(question, None).await
    }

    /// Continue a conversation. The final message is the new user turn and
    /// everything before it is history, so the backend sees `messages`
    /// exactly as given. Turn alternation is not checked.
    pub async fn chat(&self, messages: &[Message]) -> Result<AssistantResponse>
    {   debug!(
          "chat via {} with {} turns",
          self.provider.name(), messages.len()
        );
        let (last, history) = match messages.split_last()
        {   Some((last, history)) if last.role == Role::User => (last, history)
          , Some(_) => {
              return Err(Error::assistant(Error::InvalidRequest(
                "last message must be a user turn".to_string()
              )));
            }
          , None => {
              return Err(Error::assistant(Error::InvalidRequest(
                "conversation is empty".to_string()
              )));
            }
        };
        let history = if history.is_empty() { None } else { Some(history) };
        self.send(&last.content, history).await
    }

    async fn send(
      &self
    , prompt: &str
    , history: Option<&[Message]>
    ) -> Result<AssistantResponse>
    {   match self.provider.complete(prompt, history).await
        {   Ok(response) => {
              debug!(
                "{} answered: {} in / {} out tokens",
                self.provider.name(),
                response.usage.input_tokens,
                response.usage.output_tokens
              );
              Ok(AssistantResponse
              {   message: response.message
                , usage: response.usage
                , timestamp: Utc::now()
              })
            }
          , Err(e) => {
              error!("{} failed: {}", self.provider.name(), e);
              Err(Error::assistant(e))
            }
        }
    }
}
