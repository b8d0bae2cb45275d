//! # Model Pricing
//!
//! A [PricingTable] maps a model name to its [ModelPricing]: per-million-token input and
//! output prices in USD plus the model's context window. The table is a point-in-time
//! snapshot. Prices drift as providers reprice their lineups, and the snapshot is allowed
//! to go stale; refreshing it means constructing a new table, there is no mutation path.
//!
//! The [builtin](PricingTable::builtin) table covers the common OpenAI and Anthropic chat
//! models. Custom tables can be built with [PricingTable::from_entries] when you price
//! private deployments or want fresher numbers.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::pricing::errors::UnknownModel;

/// Pricing record for one billable model. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[readonly::make]
pub struct ModelPricing {
    /// Model identifier, unique within a table. read-only.
    #[readonly]
    pub name: String,
    /// Provider display label. Has no effect on any computation. read-only.
    #[readonly]
    pub provider: String,
    /// USD per 1,000,000 input tokens. read-only.
    #[readonly]
    pub input_price: f64,
    /// USD per 1,000,000 output tokens. read-only.
    #[readonly]
    pub output_price: f64,
    /// Maximum tokens (input + output) the model accepts in one request. read-only.
    #[readonly]
    pub context_limit: u64,
}

impl ModelPricing {
    pub fn new(
        name: impl Into<String>,
        provider: impl Into<String>,
        input_price: f64,
        output_price: f64,
        context_limit: u64,
    ) -> Self {
        debug_assert!(input_price >= 0.0 && output_price >= 0.0);
        debug_assert!(context_limit > 0);
        Self {
            name: name.into(),
            provider: provider.into(),
            input_price,
            output_price,
            context_limit,
        }
    }

    /// Whether `tokens` input + output tokens fit in this model's context window.
    #[inline]
    pub fn fits(&self, tokens: u64) -> bool {
        tokens <= self.context_limit
    }
}

/// Read-only mapping from model name to [ModelPricing].
#[derive(Debug, Clone, Default)]
pub struct PricingTable {
    models: HashMap<String, ModelPricing>,
}

impl PricingTable {
    /// Build a table from pricing entries. A later entry with the same name replaces an
    /// earlier one, keeping names unique.
    pub fn from_entries(entries: impl IntoIterator<Item = ModelPricing>) -> Self {
        let models = entries
            .into_iter()
            .map(|pricing| (pricing.name.clone(), pricing))
            .collect();
        Self { models }
    }

    /// The builtin pricing snapshot (2024 numbers, check provider sites for current ones).
    pub fn builtin() -> &'static PricingTable {
        &BUILTIN_PRICING
    }

    /// Look up the pricing entry for `model`.
    pub fn lookup(&self, model: &str) -> Result<&ModelPricing, UnknownModel> {
        self.models
            .get(model)
            .ok_or_else(|| UnknownModel::new(model, self))
    }

    pub fn contains(&self, model: &str) -> bool {
        self.models.contains_key(model)
    }

    /// Model names in the table, sorted for deterministic iteration.
    pub fn model_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.models.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn entries(&self) -> impl Iterator<Item = &ModelPricing> {
        self.models.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

lazy_static! {
    static ref BUILTIN_PRICING: PricingTable = PricingTable::from_entries([
        // OpenAI models
        ModelPricing::new("gpt-3.5-turbo", "OpenAI", 0.50, 1.50, 4096),
        ModelPricing::new("gpt-3.5-turbo-16k", "OpenAI", 3.00, 4.00, 16384),
        ModelPricing::new("gpt-4", "OpenAI", 30.00, 60.00, 8192),
        ModelPricing::new("gpt-4-32k", "OpenAI", 60.00, 120.00, 32768),
        ModelPricing::new("gpt-4-turbo", "OpenAI", 10.00, 30.00, 128000),
        // Anthropic models
        ModelPricing::new("claude-3-opus", "Anthropic", 15.00, 75.00, 200000),
        ModelPricing::new("claude-3-sonnet", "Anthropic", 3.00, 15.00, 200000),
        ModelPricing::new("claude-3-haiku", "Anthropic", 0.25, 1.25, 200000),
    ]);
}

pub mod errors {
    use std::error::Error;
    use std::fmt;
    use std::fmt::Formatter;

    use super::PricingTable;

    /// Error when a model identifier is absent from the pricing table.
    #[derive(Debug, Clone)]
    pub struct UnknownModel {
        pub model: String,
        pub known_models: Vec<String>,
    }

    impl UnknownModel {
        pub(crate) fn new(model: impl Into<String>, table: &PricingTable) -> Self {
            UnknownModel {
                model: model.into(),
                known_models: table.model_names().iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    impl fmt::Display for UnknownModel {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "UnknownModel: no pricing entry for model = {}, priced models are {:?}",
                self.model, self.known_models
            )
        }
    }

    impl Error for UnknownModel {}
}

#[cfg(test)]
mod test_pricing {
    use super::{ModelPricing, PricingTable};

    #[test]
    fn test_builtin_lookup() {
        let table = PricingTable::builtin();
        let pricing = table.lookup("gpt-3.5-turbo").unwrap();
        assert_eq!(pricing.provider, "OpenAI");
        assert_eq!(pricing.input_price, 0.50);
        assert_eq!(pricing.output_price, 1.50);
        assert_eq!(pricing.context_limit, 4096);
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn test_unknown_model() {
        let err = PricingTable::builtin().lookup("not-a-model").unwrap_err();
        assert_eq!(err.model, "not-a-model");
        assert!(err.known_models.contains(&"claude-3-haiku".to_string()));
    }

    #[test]
    fn test_duplicate_names_keep_last() {
        let table = PricingTable::from_entries([
            ModelPricing::new("m", "A", 1.0, 2.0, 1000),
            ModelPricing::new("m", "B", 3.0, 4.0, 2000),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("m").unwrap().provider, "B");
    }

    #[test]
    fn test_fits_is_inclusive() {
        let pricing = ModelPricing::new("m", "A", 1.0, 2.0, 4096);
        assert!(pricing.fits(4096));
        assert!(!pricing.fits(4097));
    }
}
