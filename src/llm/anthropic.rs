//! Anthropic chat client over the Messages HTTP API.

use anyhow::{bail, Result};
use async_trait::async_trait;
use log::warn;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::llm::errors::MissingCredential;
use crate::llm::{credential_from_env, ChatProvider, ChatRequest, Completion, Role};

pub const ANTHROPIC_API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

/// Client for the Anthropic Messages endpoint.
pub struct AnthropicChat {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AnthropicChat {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Construct from `ANTHROPIC_API_KEY`, failing right away when it is absent.
    pub fn from_env() -> Result<Self, MissingCredential> {
        Ok(Self::new(credential_from_env(ANTHROPIC_API_KEY_VAR)?))
    }

    /// Point the client at a different API root, e.g. a proxy.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        let mut base = String::from(base_url);
        while base.ends_with('/') {
            base.pop();
        }
        self.base_url = base;
        self
    }
}

/// Anthropic Messages API request
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    model: String,
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

/// Split a conversation into the top-level system prompt and the user/assistant turns,
/// which is how the Messages API shapes its input.
fn to_wire_parts<'a>(request: &'a ChatRequest) -> (Option<String>, Vec<WireMessage<'a>>) {
    let mut system_parts: Vec<&str> = Vec::new();
    let mut turns = Vec::new();
    for message in &request.messages {
        if message.name.is_some() {
            warn!("the Messages API has no name field, dropping it");
        }
        match message.role {
            Role::System => system_parts.push(&message.content),
            Role::User => turns.push(WireMessage {
                role: "user",
                content: &message.content,
            }),
            Role::Assistant => turns.push(WireMessage {
                role: "assistant",
                content: &message.content,
            }),
        }
    }
    let system = if system_parts.is_empty() {
        None
    } else {
        Some(system_parts.join("\n\n"))
    };
    (system, turns)
}

#[async_trait]
impl ChatProvider for AnthropicChat {
    async fn complete(&self, request: &ChatRequest) -> Result<Completion> {
        let (system, messages) = to_wire_parts(request);
        let body = MessagesRequest {
            model: &request.model,
            system,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            bail!("anthropic API error {status}: {detail}");
        }

        let parsed: MessagesResponse = response.json().await?;
        let text = parsed
            .content
            .iter()
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("");

        Ok(Completion {
            text,
            model: parsed.model,
            input_tokens: parsed.usage.input_tokens,
            output_tokens: parsed.usage.output_tokens,
            total_tokens: parsed.usage.input_tokens + parsed.usage.output_tokens,
        })
    }
}

#[cfg(test)]
mod test_anthropic {
    use super::*;
    use crate::llm::ChatMessage;

    #[test]
    fn test_system_messages_move_to_the_top_level() {
        let request = ChatRequest::new(
            "claude-3-haiku",
            vec![
                ChatMessage::system("You are helpful."),
                ChatMessage::user("Hello!"),
                ChatMessage::assistant("Hi there."),
            ],
        );
        let (system, turns) = to_wire_parts(&request);
        assert_eq!(system.as_deref(), Some("You are helpful."));
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, "user");
        assert_eq!(turns[1].role, "assistant");
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest::new("claude-3-haiku", vec![ChatMessage::user("Hello!")])
            .with_max_tokens(1024);
        let (system, messages) = to_wire_parts(&request);
        let body = MessagesRequest {
            model: &request.model,
            system,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("claude-3-haiku"));
        assert!(json.contains("Hello!"));
        assert!(json.contains("max_tokens"));
        assert!(!json.contains("system"));
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{
            "model": "claude-3-haiku-20240307",
            "content": [{"type": "text", "text": "Paris."}],
            "usage": {"input_tokens": 15, "output_tokens": 4}
        }"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.content[0].text, "Paris.");
        assert_eq!(parsed.usage.input_tokens, 15);
    }

    #[test]
    fn test_base_url_override_strips_trailing_slash() {
        let client = AnthropicChat::new("sk-ant-test")
            .with_base_url(Url::parse("http://localhost:8080/v1/").unwrap());
        assert_eq!(client.base_url, "http://localhost:8080/v1");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_surfaces_the_error() {
        // port 9 is the discard service, nothing listens there
        let client = AnthropicChat::new("sk-ant-test")
            .with_base_url(Url::parse("http://127.0.0.1:9/").unwrap());
        let request = ChatRequest::new("claude-3-haiku", vec![ChatMessage::user("hi")]);
        assert!(client.complete(&request).await.is_err());
    }
}
