use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::request::{conversation, AiResponse, Message, Usage};

// ===== Wire Types (chat-completions dialect) =====

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a>
{   pub model: &'a str
  , pub messages: &'a [Message]
  , pub temperature: f32
  , pub max_tokens: u32
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse
{   #[serde(default)]
    pub choices: Vec<Choice>
  , #[serde(default)]
    pub usage: Option<ChatUsage>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice
{   pub message: ChoiceMessage
  , #[serde(default)]
    pub finish_reason: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage
{   #[serde(default)]
    pub content: Option<String>
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ChatUsage
{   #[serde(default)]
    pub prompt_tokens: u32
  , #[serde(default)]
    pub completion_tokens: u32
}

impl ChatCompletionResponse
{   /// First choice's content plus normalized usage
    pub fn into_ai_response(
      self
    , provider: crate::Provider
    , raw: &str
    ) -> Result<AiResponse>
    {   let message = self.choices
          .into_iter()
          .next()
          .and_then(|c| c.message.content)
          .ok_or_else(|| {
            super::http::missing_field(provider, "choices[0].message.content", raw)
          })?;
        let usage = self.usage.unwrap_or_default();
        Ok(AiResponse
        {   message
          , usage: Usage
            {   input_tokens: usage.prompt_tokens
              , output_tokens: usage.completion_tokens
            }
        })
    }
}

// ===== OpenAI Provider =====

/// OpenAI chat completions, bearer-token auth
pub struct OpenAiProvider
{   config: ProviderConfig
  , api_key: String
  , http_client: reqwest::Client
}

impl OpenAiProvider
{   pub fn new(config: ProviderConfig) -> Result<Self>
    {   debug!("Creating OpenAiProvider");
        let api_key = config.require_api_key()?;
        let http_client = super::http::build_client(config.timeout, None)?;
        Ok(OpenAiProvider
        {   config
          , api_key
          , http_client
        })
    }
}

#[async_trait]
impl super::AiProvider for OpenAiProvider
{   async fn complete(
      &self
    , prompt: &str
    , history: Option<&[Message]>
    ) -> Result<AiResponse>
    {   debug!("OpenAI complete with model: {}", self.config.model);
        let messages = conversation(prompt, history);
        let request = ChatCompletionRequest
        {   model: &self.config.model
          , messages: &messages
          , temperature: self.config.temperature
          , max_tokens: self.config.max_tokens
        };

        let builder = self.http_client
          .post(format!("{}/chat/completions", self.config.endpoint()))
          .bearer_auth(&self.api_key);

        let text = super::http::exchange(
          crate::Provider::OpenAi, builder, &request, self.config.timeout
        ).await?;
        super::http::parse_body::<ChatCompletionResponse>(
          crate::Provider::OpenAi, &text
        )?
        .into_ai_response(crate::Provider::OpenAi, &text)
    }

    fn name(&self) -> String
    {   format!("OpenAI ({})", self.config.model)
    }
}
