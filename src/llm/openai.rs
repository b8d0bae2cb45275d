//! OpenAI chat client built on `async-openai`.

use anyhow::{anyhow, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;

use crate::llm::errors::MissingCredential;
use crate::llm::{
    credential_from_env, ChatMessage, ChatProvider, ChatRequest, Completion, Role,
};

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Client for the OpenAI chat-completions endpoint.
pub struct OpenAiChat {
    client: Client<OpenAIConfig>,
}

impl OpenAiChat {
    pub fn new(api_key: impl Into<String>) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config),
        }
    }

    /// Construct from `OPENAI_API_KEY`, failing right away when it is absent.
    pub fn from_env() -> Result<Self, MissingCredential> {
        Ok(Self::new(credential_from_env(OPENAI_API_KEY_VAR)?))
    }
}

fn to_request_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
    let request_message = match message.role {
        Role::System => {
            let mut builder = ChatCompletionRequestSystemMessageArgs::default();
            builder.content(message.content.as_str());
            if let Some(name) = &message.name {
                builder.name(name.as_str());
            }
            builder.build()?.into()
        }
        Role::User => {
            let mut builder = ChatCompletionRequestUserMessageArgs::default();
            builder.content(message.content.as_str());
            if let Some(name) = &message.name {
                builder.name(name.as_str());
            }
            builder.build()?.into()
        }
        Role::Assistant => {
            let mut builder = ChatCompletionRequestAssistantMessageArgs::default();
            builder.content(message.content.as_str());
            if let Some(name) = &message.name {
                builder.name(name.as_str());
            }
            builder.build()?.into()
        }
    };
    Ok(request_message)
}

#[async_trait]
impl ChatProvider for OpenAiChat {
    async fn complete(&self, request: &ChatRequest) -> Result<Completion> {
        let messages = request
            .messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>>>()?;
        let body = CreateChatCompletionRequestArgs::default()
            .model(request.model.as_str())
            .messages(messages)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens.min(u16::MAX as u32) as u16)
            .build()?;

        let response = self.client.chat().create(body).await?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("chat completion response carried no choices"))?;
        let (input_tokens, output_tokens, total_tokens) = response.usage.map_or((0, 0, 0), |usage| {
            (
                usage.prompt_tokens as u64,
                usage.completion_tokens as u64,
                usage.total_tokens as u64,
            )
        });

        Ok(Completion {
            text: choice.message.content.unwrap_or_default(),
            model: response.model,
            input_tokens,
            output_tokens,
            total_tokens,
        })
    }
}

#[cfg(test)]
mod test_openai {
    use super::OpenAiChat;

    #[test]
    fn test_missing_credential_fails_construction() {
        // Point the lookup at a variable that is never set.
        std::env::remove_var("OPENAI_API_KEY_FOR_TEST");
        let err = crate::llm::credential_from_env("OPENAI_API_KEY_FOR_TEST").unwrap_err();
        assert_eq!(err.variable, "OPENAI_API_KEY_FOR_TEST");
        // Explicit keys always construct.
        let _client = OpenAiChat::new("sk-test");
    }
}
