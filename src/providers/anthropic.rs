use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::request::{conversation, AiResponse, Message, Usage};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Always sent ahead of the conversation
pub const SYSTEM_PREAMBLE: &str
  = "You are a helpful assistant. Provide clear, concise, and accurate responses.";

// ===== Message Types =====

#[derive(Debug, Clone, Serialize)]
struct MessagesRequest<'a>
{   model: &'a str
  , max_tokens: u32
  , temperature: f32
  , system: &'a str
  , messages: &'a [Message]
}

#[derive(Debug, Clone, Deserialize)]
struct MessagesResponse
{   #[serde(default)]
    content: Vec<ContentBlock>
  , #[serde(default)]
    usage: Option<MessagesUsage>
}

#[derive(Debug, Clone, Deserialize)]
struct ContentBlock
{   #[serde(default)]
    text: Option<String>
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct MessagesUsage
{   #[serde(default)]
    input_tokens: u32
  , #[serde(default)]
    output_tokens: u32
}

// ===== Anthropic Provider =====

/// Anthropic messages API with `x-api-key` auth
pub struct AnthropicProvider
{   config: ProviderConfig
  , api_key: String
  , http_client: reqwest::Client
}

impl AnthropicProvider
{   pub fn new(config: ProviderConfig) -> Result<Self>
    {   debug!("Creating AnthropicProvider");
        let api_key = config.require_api_key()?;
        let http_client = super::http::build_client(config.timeout, None)?;
        Ok(AnthropicProvider
        {   config
          , api_key
          , http_client
        })
    }
}

#[async_trait]
impl super::AiProvider for AnthropicProvider
{   async fn complete(
      &self
    , prompt: &str
    , history: Option<&[Message]>
    ) -> Result<AiResponse>
    {   debug!("Anthropic complete with model: {}", self.config.model);
        let messages = conversation(prompt, history);
        let request = MessagesRequest
        {   model: &self.config.model
          , max_tokens: self.config.max_tokens
          , temperature: self.config.temperature
          , system: SYSTEM_PREAMBLE
          , messages: &messages
        };

        let builder = self.http_client
          .post(format!("{}/v1/messages", self.config.endpoint()))
          .header("x-api-key", &self.api_key)
          .header("anthropic-version", ANTHROPIC_VERSION);

        let text = super::http::exchange(
          crate::Provider::Anthropic, builder, &request, self.config.timeout
        ).await?;
        let response: MessagesResponse = super::http::parse_body(
          crate::Provider::Anthropic, &text
        )?;

        let message = response.content
          .into_iter()
          .next()
          .and_then(|block| block.text)
          .ok_or_else(|| {
            super::http::missing_field(
              crate::Provider::Anthropic, "content[0].text", &text
            )
          })?;
        let usage = response.usage.unwrap_or_default();

        Ok(AiResponse
        {   message
          , usage: Usage
            {   input_tokens: usage.input_tokens
              , output_tokens: usage.output_tokens
            }
        })
    }

    fn name(&self) -> String
    {   format!("Anthropic Claude ({})", self.config.model)
    }
}
