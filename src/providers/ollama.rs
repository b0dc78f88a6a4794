use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::request::{conversation, AiResponse, Message, Usage};

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a>
{   model: &'a str
  , messages: &'a [Message]
  , stream: bool
  , options: ChatOptions
}

#[derive(Debug, Clone, Copy, Serialize)]
struct ChatOptions
{   temperature: f32
  , num_predict: u32
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse
{   message: Option<ResponseMessage>
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage
{   #[serde(default)]
    content: Option<String>
}

/// Local Ollama server. No credentials; usage is never reported.
pub struct OllamaProvider
{   config: ProviderConfig
  , http_client: reqwest::Client
}

impl OllamaProvider
{   pub fn new(config: ProviderConfig) -> Result<Self>
    {   debug!("Creating OllamaProvider at {}", config.endpoint());
        let http_client = super::http::build_client(config.timeout, None)?;
        Ok(OllamaProvider
        {   config
          , http_client
        })
    }
}

#[async_trait]
impl super::AiProvider for OllamaProvider
{   async fn complete(
      &self
    , prompt: &str
    , history: Option<&[Message]>
    ) -> Result<AiResponse>
    {   debug!("Ollama complete with model: {}", self.config.model);
        let messages = conversation(prompt, history);
        let request = ChatRequest
        {   model: &self.config.model
          , messages: &messages
          , stream: false
          , options: ChatOptions
            {   temperature: self.config.temperature
              , num_predict: self.config.max_tokens
            }
        };

        let builder = self.http_client
          .post(format!("{}/api/chat", self.config.endpoint()));

        let text = super::http::exchange(
          crate::Provider::Ollama, builder, &request, self.config.timeout
        ).await?;
        let response: ChatResponse = super::http::parse_body(
          crate::Provider::Ollama, &text
        )?;

        let message = response.message
          .and_then(|m| m.content)
          .ok_or_else(|| {
            super::http::missing_field(
              crate::Provider::Ollama, "message.content", &text
            )
          })?;

        Ok(AiResponse
        {   message
          , usage: Usage::default()
        })
    }

    fn name(&self) -> String
    {   format!("Ollama ({}) [Local]", self.config.model)
    }
}
