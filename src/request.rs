//! Unified request and response types shared by every backend

use serde::{Deserialize, Serialize};

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role
{   User
  , Assistant
}

impl Role
{   pub fn as_str(&self) -> &'static str
    {   match self
        {   Role::User => "user"
          , Role::Assistant => "assistant"
        }
    }
}

/// One turn of a conversation. Order within a conversation is turn order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message
{   pub role: Role
  , pub content: String
}

impl Message
{   pub fn user(content: impl Into<String>) -> Self
    {   Message
        {   role: Role::User
          , content: content.into()
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self
    {   Message
        {   role: Role::Assistant
          , content: content.into()
        }
    }
}

/// Token accounting. Zero when the backend does not report it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage
{   pub input_tokens: u32
  , pub output_tokens: u32
}

/// Normalized backend response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiResponse
{   /// Generated text
    pub message: String
  , /// Always present, zeroed when unknown
    pub usage: Usage
}

/// Effective conversation for one call: the history (if any) followed by
/// the prompt as a new user turn. The caller's slice is only read.
pub fn conversation(
  prompt: &str
, history: Option<&[Message]>
) -> Vec<Message>
{   let history = history.unwrap_or_default();
    let mut turns = Vec::with_capacity(history.len() + 1);
    turns.extend_from_slice(history);
    turns.push(Message::user(prompt));
    turns
}
