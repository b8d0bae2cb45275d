//! # promptmeter
//!
//! Prompt-centric toolkit for token counting and LLM usage-cost estimation
//!
//! ## Why `promptmeter`
//!
//! Every request to a hosted language model is billed in tokens, and every prompt you
//! write spends them. Most applications discover their real API bill after the fact.
//! `promptmeter` puts the arithmetic up front: count the tokens a prompt will consume,
//! price them against a model's rates, and project what a workload costs per day, per
//! month and per year, all before a single request is sent.
//!
//! ## Concepts and Design
//!
//! The API follows data-driven design: explicit inputs, explicit typed outputs, no
//! hidden state. Everything in the estimation core is a pure function over immutable
//! values, so results are deterministic and trivially testable.
//!
//! ### Tokens
//!
//! A token is the atomic unit a model consumes and produces. Token boundaries depend on
//! the tokenizer of a model family, so a count is only meaningful together with the
//! model it was produced for. [`utils::token`] holds the [`CountToken`](crate::utils::token::CountToken)
//! seam and the [`Tiktoken`](crate::utils::token::tiktoken::Tiktoken) adapter, which also
//! knows the per-message formatting tax chat APIs add on the wire.
//!
//! ### Pricing
//!
//! [`pricing`] is a point-in-time snapshot: a read-only table mapping a model name to
//! its per-million-token input/output prices and context window. Prices go stale;
//! refreshing them means building a new table, never mutating the old one.
//!
//! ### Costs
//!
//! [`cost`] combines a token count with a pricing entry into a cost breakdown, and
//! layers the planning operations on top: comparing models, projecting monthly and
//! yearly spend, inverting a budget into a request allowance, and recommending a model
//! for an expected workload.
//!
//! ### Prompts
//!
//! A prompt is simply a string. [`prompt`] provides templates with `{{name}}`
//! placeholders and a fill/complete lifecycle, and [`techniques`] provides the
//! classic prompt-shaping builders (few-shot exemplars, role and goal, step-by-step,
//! DO/DON'T guidance).
//!
//! ### Endpoint or LLM
//!
//! The endpoint of the pipeline is a hosted model. [`llm`] wraps the OpenAI and
//! Anthropic chat APIs behind one [`ChatProvider`](crate::llm::ChatProvider) trait and
//! returns a typed [`Completion`](crate::llm::Completion) carrying the provider's own
//! token accounting, the ground truth the estimator predicts.
//!
//! None of the estimation modules depend on the network: a missing API key degrades the
//! demos, never the arithmetic.
//!
//! ## License
//!
//! `promptmeter` is free under the Apache license.
//!
//! ## Attribution
//! * `tiktoken-rs`: in [crate::utils::token::tiktoken], we re-export the `tiktoken-rs` crate.

pub mod prompt;
pub mod techniques;
pub mod pricing;
pub mod cost;
pub mod llm;
pub mod utils;
