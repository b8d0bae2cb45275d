//! Tiktoken-backed tokenizer adapter.
//!
//! Selects a BPE vocabulary by model family and exposes the counting, segmentation and
//! conversation-estimate operations the cost estimator builds on. Chat APIs wrap every
//! message in formatting tokens on the wire; the per-message constants here reproduce
//! that tax so estimates line up with provider billing.

pub use tiktoken_rs::{get_bpe_from_model, CoreBPE};

use crate::llm::{ChatMessage, Role};
use crate::utils::token::CountToken;

use self::errors::UnsupportedModel;

/// Formatting tokens each chat message costs on the wire.
pub const TOKENS_PER_MESSAGE: usize = 3;
/// Extra token when a message carries a "name" field.
pub const TOKENS_PER_NAME: usize = 1;
/// Tokens priming the assistant's reply.
pub const REPLY_PRIMING_TOKENS: usize = 3;

/// Tokenizer family for a model name, `None` when no mapping exists.
fn family_of(model: &str) -> Option<&'static str> {
    if model.starts_with("gpt-4-32k") {
        Some("gpt-4-32k")
    } else if model.starts_with("gpt-4") {
        Some("gpt-4")
    } else if model.starts_with("gpt-3.5") {
        Some("gpt-3.5-turbo")
    } else {
        None
    }
}

/// Counter using the Tiktoken tokenizer.
#[derive(Clone)]
#[readonly::make]
pub struct Tiktoken {
    /// The normalized model family of the tokenizer. read-only.
    #[readonly]
    pub model: String,
    /// The tokenizer. read-only.
    #[readonly]
    pub bpe: CoreBPE,
}

impl Tiktoken {
    /// Create a tokenizer for `model`, selecting the vocabulary by model family.
    ///
    /// Fails with [UnsupportedModel] when no tokenizer mapping exists for the name. This
    /// is distinct from an unknown pricing entry: a model can be priced without being
    /// tokenizable here (the claude family), and vice versa.
    pub fn new(model: impl Into<String>) -> Result<Self, UnsupportedModel> {
        let requested = model.into();
        let family = family_of(&requested).ok_or_else(|| UnsupportedModel::new(&requested))?;
        let bpe = get_bpe_from_model(family).map_err(|_| UnsupportedModel::new(&requested))?;
        Ok(Tiktoken {
            model: family.to_string(),
            bpe,
        })
    }

    /// Encode `text` into token ids.
    pub fn encode(&self, text: &str) -> Vec<usize> {
        self.bpe.encode_with_special_tokens(text)
    }

    /// Decode a single token id back into its substring.
    ///
    /// `None` when the id is unknown or its bytes are not valid UTF-8 on their own
    /// (multi-byte characters can split across tokens).
    pub fn decode_token(&self, token_id: usize) -> Option<String> {
        self.bpe.decode(vec![token_id]).ok()
    }

    /// Break `text` into the substrings of its tokens, for diagnostic display.
    /// Tokens that do not decode on their own render as U+FFFD.
    pub fn segment(&self, text: &str) -> Vec<String> {
        self.encode(text)
            .into_iter()
            .map(|id| {
                self.decode_token(id)
                    .unwrap_or_else(|| "\u{FFFD}".to_string())
            })
            .collect()
    }

    /// Count one chat message: content tokens plus its share of the wire overhead.
    pub fn count_message(&self, message: &ChatMessage) -> usize {
        let name_tokens = if message.name.is_some() {
            TOKENS_PER_NAME
        } else {
            0
        };
        self.count_token(&message.content) + name_tokens + TOKENS_PER_MESSAGE
    }

    /// Estimate the tokens a conversation costs, broken down by role plus the fixed
    /// wire overhead: 3 tokens per message, 1 extra per "name" field, and 3 tokens
    /// priming the reply.
    pub fn count_conversation(&self, messages: &[ChatMessage]) -> ConversationTokenCount {
        let mut counts = ConversationTokenCount::default();
        for message in messages {
            let content_tokens = self.count_token(&message.content);
            match message.role {
                Role::System => counts.system += content_tokens,
                Role::User => counts.user += content_tokens,
                Role::Assistant => counts.assistant += content_tokens,
            }
            counts.overhead += TOKENS_PER_MESSAGE;
            if message.name.is_some() {
                counts.overhead += TOKENS_PER_NAME;
            }
        }
        counts.overhead += REPLY_PRIMING_TOKENS;
        counts
    }
}

impl CountToken for Tiktoken {
    fn count_token(&self, string: &str) -> usize {
        self.bpe.encode_with_special_tokens(string).len()
    }
}

/// Token estimate of a conversation, content per role plus wire overhead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversationTokenCount {
    pub system: usize,
    pub user: usize,
    pub assistant: usize,
    pub overhead: usize,
}

impl ConversationTokenCount {
    /// Content tokens only, without the wire overhead.
    pub fn content_total(&self) -> usize {
        self.system + self.user + self.assistant
    }

    /// Grand total as billed: content tokens plus the overhead, counted once.
    pub fn total(&self) -> usize {
        self.content_total() + self.overhead
    }
}

pub mod errors {
    use std::error::Error;
    use std::fmt;
    use std::fmt::Formatter;

    /// Error when no tokenizer mapping exists for a requested model.
    #[derive(Debug, Clone)]
    pub struct UnsupportedModel {
        pub model: String,
    }

    impl UnsupportedModel {
        pub(crate) fn new(model: impl Into<String>) -> Self {
            UnsupportedModel {
                model: model.into(),
            }
        }
    }

    impl fmt::Display for UnsupportedModel {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "UnsupportedModel: no tokenizer mapping for model = {}, supported families are gpt-4-32k, gpt-4 and gpt-3.5",
                self.model
            )
        }
    }

    impl Error for UnsupportedModel {}
}

#[cfg(test)]
mod test_tiktoken {
    use super::Tiktoken;
    use crate::llm::ChatMessage;
    use crate::utils::token::CountToken;

    #[test]
    fn test_model_family_normalization() {
        assert_eq!(Tiktoken::new("gpt-3.5-turbo-16k").unwrap().model, "gpt-3.5-turbo");
        assert_eq!(Tiktoken::new("gpt-4-32k-0613").unwrap().model, "gpt-4-32k");
        assert_eq!(Tiktoken::new("gpt-4").unwrap().model, "gpt-4");
    }

    #[test]
    fn test_unsupported_models_are_rejected() {
        assert!(Tiktoken::new("claude-3-opus").is_err());
        assert!(Tiktoken::new("not-a-model").is_err());
    }

    #[test]
    fn test_known_segmentation() {
        let tokenizer = Tiktoken::new("gpt-3.5-turbo").unwrap();
        assert_eq!(tokenizer.count_token("Hello, world!"), 4);
        assert_eq!(tokenizer.count_token(""), 0);
        let pieces = tokenizer.segment("Hello, world!");
        assert_eq!(pieces.len(), 4);
        assert_eq!(pieces.concat(), "Hello, world!");
    }

    #[test]
    fn test_conversation_overhead_is_content_independent() {
        let tokenizer = Tiktoken::new("gpt-3.5-turbo").unwrap();
        let short = [
            ChatMessage::system("You are helpful."),
            ChatMessage::user("Hello!"),
        ];
        let long = [
            ChatMessage::system("You are a patient, thorough and helpful assistant."),
            ChatMessage::user("Please explain how tokenizers split text into tokens."),
        ];
        let short_count = tokenizer.count_conversation(&short);
        let long_count = tokenizer.count_conversation(&long);
        // two message overheads plus one reply priming
        assert_eq!(short_count.overhead, 3 * 2 + 3);
        assert_eq!(long_count.overhead, 9);
        assert!(long_count.content_total() > short_count.content_total());
        assert_eq!(short_count.total(), short_count.content_total() + 9);
    }

    #[test]
    fn test_named_messages_cost_an_extra_token() {
        let tokenizer = Tiktoken::new("gpt-3.5-turbo").unwrap();
        let anonymous = [ChatMessage::user("hi")];
        let named = [ChatMessage::user("hi").with_name("alice")];
        let plain = tokenizer.count_conversation(&anonymous);
        let with_name = tokenizer.count_conversation(&named);
        assert_eq!(with_name.overhead, plain.overhead + 1);
        assert_eq!(
            tokenizer.count_message(&named[0]),
            tokenizer.count_message(&anonymous[0]) + 1
        );
    }

    #[test]
    fn test_roles_are_counted_separately() {
        let tokenizer = Tiktoken::new("gpt-4").unwrap();
        let messages = [
            ChatMessage::system("You are a helpful coding assistant."),
            ChatMessage::user("How do I reverse a list?"),
            ChatMessage::assistant("Use the reverse method."),
            ChatMessage::user("What about in place?"),
        ];
        let counts = tokenizer.count_conversation(&messages);
        assert!(counts.system > 0);
        assert!(counts.user > 0);
        assert!(counts.assistant > 0);
        // four message overheads plus reply priming
        assert_eq!(counts.overhead, 3 * 4 + 3);
    }
}
