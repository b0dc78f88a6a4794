use async_trait::async_trait;
use log::debug;

use super::openai::{ChatCompletionRequest, ChatCompletionResponse};
use crate::config::ProviderConfig;
use crate::error::Result;
use crate::request::{conversation, AiResponse, Message};

const USER_AGENT: &str = concat!("llmswitch/", env!("CARGO_PKG_VERSION"));

/// GitHub Models inference gateway. Speaks the chat-completions dialect
/// with a personal access token as bearer.
pub struct GitHubModelsProvider
{   config: ProviderConfig
  , token: String
  , http_client: reqwest::Client
}

impl GitHubModelsProvider
{   pub fn new(config: ProviderConfig) -> Result<Self>
    {   debug!("Creating GitHubModelsProvider");
        let token = config.require_api_key()?;
        let http_client = super::http::build_client(
          config.timeout, Some(USER_AGENT)
        )?;
        Ok(GitHubModelsProvider
        {   config
          , token
          , http_client
        })
    }
}

#[async_trait]
impl super::AiProvider for GitHubModelsProvider
{   async fn complete(
      &self
    , prompt: &str
    , history: Option<&[Message]>
    ) -> Result<AiResponse>
    {   debug!("GitHub Models complete with model: {}", self.config.model);
        let messages = conversation(prompt, history);
        let request = ChatCompletionRequest
        {   model: &self.config.model
          , messages: &messages
          , temperature: self.config.temperature
          , max_tokens: self.config.max_tokens
        };

        let builder = self.http_client
          .post(format!("{}/chat/completions", self.config.endpoint()))
          .bearer_auth(&self.token);

        let text = super::http::exchange(
          crate::Provider::GitHub, builder, &request, self.config.timeout
        ).await?;
        super::http::parse_body::<ChatCompletionResponse>(
          crate::Provider::GitHub, &text
        )?
        .into_ai_response(crate::Provider::GitHub, &text)
    }

    fn name(&self) -> String
    {   format!("GitHub Models ({})", self.config.model)
    }
}
