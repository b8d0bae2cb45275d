//! # Chat-completion capability
//!
//! Provider-neutral types for talking to hosted chat models, plus one client per
//! provider ([openai::OpenAiChat], [anthropic::AnthropicChat]) behind the
//! [ChatProvider] trait.
//!
//! Credentials are explicit constructor inputs. `from_env` constructors read the
//! `OPENAI_API_KEY` / `ANTHROPIC_API_KEY` variables once and fail immediately with
//! [errors::MissingCredential] when a key is absent, instead of deferring the failure
//! to the first request. A [Completion] carries the provider's own token accounting
//! next to the generated text, so estimates can be checked against what was actually
//! billed. Calls are single-shot: no retries, no fallbacks, failures surface to the
//! caller as-is.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use self::errors::MissingCredential;

pub mod anthropic;
pub mod openai;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Optional participant name. Costs one extra wire token where supported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// A request with the demo defaults: temperature 0.7, at most 150 reply tokens.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: 0.7,
            max_tokens: 150,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// A successful chat completion with the provider's token accounting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completion {
    pub text: String,
    /// The model identifier the provider reports, which may be more specific than the
    /// one requested.
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

/// A hosted chat model. One request in, one typed completion (or error) out.
#[async_trait]
pub trait ChatProvider {
    async fn complete(&self, request: &ChatRequest) -> Result<Completion>;
}

/// Read a credential from the environment, treating an empty value as absent.
pub(crate) fn credential_from_env(variable: &'static str) -> Result<String, MissingCredential> {
    std::env::var(variable)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(MissingCredential { variable })
}

pub mod errors {
    use std::error::Error;
    use std::fmt;
    use std::fmt::Formatter;

    /// Error when an API-key environment variable is absent at construction time.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct MissingCredential {
        pub variable: &'static str,
    }

    impl fmt::Display for MissingCredential {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "MissingCredential: environment variable {} is not set, cannot construct the client",
                self.variable
            )
        }
    }

    impl Error for MissingCredential {}
}

#[cfg(test)]
mod test_llm {
    use super::{ChatMessage, ChatRequest, Role};

    #[test]
    fn test_message_constructors() {
        let message = ChatMessage::user("hi").with_name("alice");
        assert_eq!(message.role, Role::User);
        assert_eq!(message.content, "hi");
        assert_eq!(message.name.as_deref(), Some("alice"));
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }

    #[test]
    fn test_request_defaults() {
        let request = ChatRequest::new("gpt-3.5-turbo", vec![ChatMessage::user("hi")]);
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 150);
        let request = request.with_temperature(0.0).with_max_tokens(50);
        assert_eq!(request.temperature, 0.0);
        assert_eq!(request.max_tokens, 50);
    }

    #[test]
    fn test_name_is_skipped_in_serialization() {
        let json = serde_json::to_string(&ChatMessage::user("hi")).unwrap();
        assert!(!json.contains("name"));
        assert!(json.contains("\"role\":\"user\""));
    }
}
