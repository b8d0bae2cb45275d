//! # Prompt
//! A prompt is simply a string.
//!
//! ## PromptTemplate
//! A prompt template is a string with placeholders, plus optional metadata in JSON
//! format. A placeholder is written `{{name}}`; the name can be any string without
//! braces or line breaks.
//!
//! ## PartialPrompt
//! A partial prompt is a template with some placeholders filled. It is constructed only
//! via [PromptTemplate::construct]. Placeholders get filled (or refilled) with
//! [PartialPrompt::fill] or [PartialPrompt::try_fill]; when none are left unfilled, the
//! prompt string is produced with [PartialPrompt::complete].
//!
//! ### Counting tokens
//! [PartialPrompt::token_count] counts the tokens of the current fill state through any
//! [CountToken] counter. Unfilled placeholders are counted as their literal `{{name}}`
//! text, so the count is an upper-bound preview rather than a final bill until the
//! prompt completes.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::prompt::errors::{IncompletePrompt, UnknownPlaceholder};
use crate::utils::token::CountToken;
use crate::utils::JsonMap;

lazy_static! {
    static ref PLACEHOLDER_RE: Regex = Regex::new(r"\{\{([^{}\r\n]+)\}\}").unwrap();
}

fn find_placeholders(template: &str) -> HashSet<String> {
    PLACEHOLDER_RE
        .captures_iter(template)
        .map(|captures| captures[1].to_string())
        .collect()
}

fn render(template: &str, values: &HashMap<String, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |captures: &Captures| {
            let name = &captures[1];
            values
                .get(name)
                .cloned()
                .unwrap_or_else(|| captures[0].to_string())
        })
        .into_owned()
}

/// A prompt template with `{{name}}` placeholders and optional JSON metadata.
#[derive(Debug, Clone)]
#[readonly::make]
pub struct PromptTemplate {
    /// The template string, immutable
    template: Arc<String>,

    /// The placeholder names in the template, readonly
    #[readonly]
    pub placeholders: HashSet<String>,

    /// The metadata of the prompt template, readonly
    #[readonly]
    pub metadata: Arc<JsonMap>,
}

impl PromptTemplate {
    /// Create a prompt template without metadata. A template without placeholders is
    /// fine, it is simply already complete.
    pub fn new(template: impl Into<String>) -> Self {
        Self::with_metadata(template, JsonMap::new())
    }

    /// Create a prompt template with metadata.
    pub fn with_metadata(template: impl Into<String>, metadata: JsonMap) -> Self {
        let template = template.into();
        let placeholders = find_placeholders(&template);
        Self {
            template: Arc::new(template),
            placeholders,
            metadata: Arc::new(metadata),
        }
    }

    /// Get the template as a string.
    #[inline]
    pub fn str(&self) -> &str {
        &self.template
    }

    pub fn has_placeholders(&self) -> bool {
        !self.placeholders.is_empty()
    }

    /// Start filling the template.
    pub fn construct(&self) -> PartialPrompt {
        PartialPrompt {
            template: self.clone(),
            values: HashMap::new(),
        }
    }
}

/// A template with some placeholders filled. Constructed via [PromptTemplate::construct].
#[derive(Debug, Clone)]
#[readonly::make]
pub struct PartialPrompt {
    /// The template being filled, readonly
    #[readonly]
    pub template: PromptTemplate,

    values: HashMap<String, String>,
}

impl PartialPrompt {
    /// Fill a placeholder, panicking if it does not exist in the template.
    pub fn fill(&mut self, placeholder: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.try_fill(placeholder, value).unwrap()
    }

    /// Fill (or refill) a placeholder.
    /// Returns an error if the placeholder does not exist in the template.
    pub fn try_fill(
        &mut self,
        placeholder: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self, UnknownPlaceholder> {
        let placeholder = placeholder.into();
        if self.template.placeholders.contains(&placeholder) {
            self.values.insert(placeholder, value.into());
            Ok(self)
        } else {
            Err(UnknownPlaceholder::new(
                placeholder,
                value,
                &self.template.placeholders,
            ))
        }
    }

    /// Placeholders still waiting for a value.
    pub fn unfilled(&self) -> Vec<&str> {
        let mut unfilled: Vec<&str> = self
            .template
            .placeholders
            .iter()
            .filter(|name| !self.values.contains_key(*name))
            .map(String::as_str)
            .collect();
        unfilled.sort_unstable();
        unfilled
    }

    pub fn is_complete(&self) -> bool {
        self.unfilled().is_empty()
    }

    /// Render the current fill state, leaving unfilled placeholders as their literal
    /// `{{name}}` text.
    pub fn preview(&self) -> String {
        render(self.template.str(), &self.values)
    }

    /// Count the tokens of the current fill state.
    pub fn token_count(&self, counter: &impl CountToken) -> usize {
        counter.count_token(&self.preview())
    }

    /// Complete the prompt.
    /// Returns an error listing the unfilled placeholders if any remain.
    pub fn complete(&self) -> Result<String, IncompletePrompt> {
        let unfilled = self.unfilled();
        if unfilled.is_empty() {
            Ok(self.preview())
        } else {
            Err(IncompletePrompt {
                unfilled: unfilled.into_iter().map(str::to_string).collect(),
                placeholders: self.template.placeholders.iter().cloned().collect(),
            })
        }
    }
}

pub mod errors {
    use std::collections::HashSet;
    use std::error::Error;
    use std::fmt;
    use std::fmt::Formatter;

    /// Error when trying to complete a prompt that still has unfilled placeholders.
    #[derive(Debug)]
    pub struct IncompletePrompt {
        pub unfilled: Vec<String>,
        pub placeholders: Vec<String>,
    }

    impl fmt::Display for IncompletePrompt {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "IncompletePrompt: the template requires placeholders {:?} but {:?} are still unfilled",
                self.placeholders, self.unfilled
            )
        }
    }

    impl Error for IncompletePrompt {}

    /// Error when trying to fill a placeholder the template does not contain.
    #[derive(Debug)]
    pub struct UnknownPlaceholder {
        pub placeholder: String,
        pub value: String,
        pub available: Vec<String>,
    }

    impl UnknownPlaceholder {
        pub(crate) fn new(
            placeholder: impl Into<String>,
            value: impl Into<String>,
            available: &HashSet<String>,
        ) -> Self {
            let mut available: Vec<String> = available.iter().cloned().collect();
            available.sort_unstable();
            UnknownPlaceholder {
                placeholder: placeholder.into(),
                value: value.into(),
                available,
            }
        }
    }

    impl fmt::Display for UnknownPlaceholder {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "UnknownPlaceholder: tried to fill placeholder = {} with value = {}, but available placeholders are {:?}",
                self.placeholder, self.value, self.available
            )
        }
    }

    impl Error for UnknownPlaceholder {}
}

#[cfg(test)]
mod test_prompt {
    use super::PromptTemplate;

    #[test]
    fn test_placeholder_discovery() {
        let template = PromptTemplate::new("You are {{role}}. Today is {{date}}. Hi {{role}}!");
        let mut names: Vec<&str> = template.placeholders.iter().map(String::as_str).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["date", "role"]);

        // line breaks do not make a placeholder
        let template = PromptTemplate::new("{{a\n}}");
        assert!(!template.has_placeholders());
    }

    #[test]
    fn test_fill_and_complete() {
        let template = PromptTemplate::new("{{greeting}}, {{name}}! {{greeting}} again.");
        let mut partial = template.construct();
        partial.fill("greeting", "Hello");
        assert!(!partial.is_complete());
        assert_eq!(partial.unfilled(), vec!["name"]);
        assert_eq!(partial.preview(), "Hello, {{name}}! Hello again.");
        assert!(partial.complete().is_err());

        partial.fill("name", "Ada");
        assert_eq!(partial.complete().unwrap(), "Hello, Ada! Hello again.");
    }

    #[test]
    fn test_refill_overwrites() {
        let template = PromptTemplate::new("{{x}}");
        let mut partial = template.construct();
        partial.fill("x", "one").fill("x", "two");
        assert_eq!(partial.complete().unwrap(), "two");
    }

    #[test]
    fn test_unknown_placeholder() {
        let template = PromptTemplate::new("{{a}}");
        let mut partial = template.construct();
        let err = partial.try_fill("b", "value").unwrap_err();
        assert_eq!(err.placeholder, "b");
        assert_eq!(err.available, vec!["a".to_string()]);
    }

    #[test]
    fn test_token_count_follows_fill_state() {
        let template = PromptTemplate::new("{{word}}");
        let mut partial = template.construct();
        let by_len = |s: &str| s.len();
        assert_eq!(partial.token_count(&by_len), "{{word}}".len());
        partial.fill("word", "hi");
        assert_eq!(partial.token_count(&by_len), 2);
    }

    #[test]
    fn test_template_without_placeholders_is_complete() {
        let template = PromptTemplate::new("just a plain prompt");
        let partial = template.construct();
        assert!(partial.is_complete());
        assert_eq!(partial.complete().unwrap(), "just a plain prompt");
    }
}
