//! # Cost Calculation
//!
//! Pure arithmetic over `(input_tokens, output_tokens, ModelPricing)`. A request costs
//!
//! ```text
//! input_cost  = (input_tokens  / 1_000_000) * pricing.input_price
//! output_cost = (output_tokens / 1_000_000) * pricing.output_price
//! total_cost  = input_cost + output_cost
//! ```
//!
//! Nothing is rounded until presentation, so the additivity and linearity of costs hold
//! exactly. On top of the per-request [CostBreakdown] sit the planning operations:
//!
//! * [calculate_cost]: one request, one model
//! * [compare_models]: rank a set of models by total cost for a fixed request shape
//! * [estimate_monthly_cost]: project a daily workload to monthly and yearly spend
//! * [budget_planner]: invert a budget into a request allowance
//! * [recommend_model]: pick economical and balanced models for an expected workload
//!
//! Projections use a fixed 30-day month and a 12-month year rather than calendar
//! arithmetic, so projections are reproducible independent of the date they run on.
//!
//! Every ratio with a zero denominator is defined as `0`, never an infinity or a NaN.

use serde::Serialize;

use crate::pricing::errors::UnknownModel;
use crate::pricing::PricingTable;

const TOKENS_PER_PRICE_UNIT: f64 = 1_000_000.0;
const DAYS_PER_MONTH: u64 = 30;
const MONTHS_PER_YEAR: f64 = 12.0;
const DAYS_PER_YEAR: u64 = 365;

// Typical request shape assumed by the budget planner.
const TYPICAL_INPUT_TOKENS: u64 = 200;
const TYPICAL_OUTPUT_TOKENS: u64 = 100;

// Above this average input size, recommendations also report large-context models.
const LARGE_INPUT_THRESHOLD: u64 = 2000;
const LARGE_CONTEXT_FLOOR: u64 = 16_000;

/// Cost of a single request in USD, derived from a pricing entry. Ephemeral, recomputed
/// on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub model: String,
    pub provider: String,
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
}

/// One entry of a [compare_models] ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelComparison {
    pub breakdown: CostBreakdown,
    /// `total_cost / cheapest_total_cost` within the compared set, `0.0` when the
    /// cheapest total is zero.
    pub vs_cheapest: f64,
}

/// Monthly and yearly projection of a daily workload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageProjection {
    pub model: String,
    pub daily_requests: u64,
    pub monthly_requests: u64,
    pub monthly_input_tokens: u64,
    pub monthly_output_tokens: u64,
    pub daily_cost: f64,
    pub monthly_cost: f64,
    pub yearly_cost: f64,
}

/// How many requests a budget buys, assuming the typical 200 input + 100 output
/// token request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetPlan {
    pub model: String,
    pub budget: f64,
    pub cost_per_request: f64,
    pub max_requests: u64,
    pub requests_per_day_30days: u64,
    pub requests_per_day_365days: u64,
}

/// One model of a [ModelRecommendation] ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCost {
    pub model: String,
    pub provider: String,
    pub monthly_cost: f64,
    pub context_limit: u64,
}

/// Cost-ordered recommendation for an expected monthly workload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[readonly::make]
pub struct ModelRecommendation {
    /// All table models, ascending by monthly cost. Never empty. read-only.
    #[readonly]
    pub ranking: Vec<RankedCost>,
    /// Models with a context window of at least 16,000 tokens, ascending by cost.
    /// Populated only when the average input exceeds 2,000 tokens. read-only.
    #[readonly]
    pub large_context: Vec<RankedCost>,
}

impl ModelRecommendation {
    /// The cheapest model for the workload.
    pub fn most_economical(&self) -> &RankedCost {
        &self.ranking[0]
    }

    /// The midpoint of the cost ranking, a middle ground between price and capability.
    pub fn balanced(&self) -> &RankedCost {
        &self.ranking[self.ranking.len() / 2]
    }
}

/// Calculate the cost of one request against `table`.
///
/// Fails with [UnknownModel] when `model` has no pricing entry; an unknown model never
/// silently prices at zero.
pub fn calculate_cost(
    table: &PricingTable,
    input_tokens: u64,
    output_tokens: u64,
    model: &str,
) -> Result<CostBreakdown, UnknownModel> {
    let pricing = table.lookup(model)?;
    let input_cost = (input_tokens as f64 / TOKENS_PER_PRICE_UNIT) * pricing.input_price;
    let output_cost = (output_tokens as f64 / TOKENS_PER_PRICE_UNIT) * pricing.output_price;
    Ok(CostBreakdown {
        model: pricing.name.clone(),
        provider: pricing.provider.clone(),
        input_cost,
        output_cost,
        total_cost: input_cost + output_cost,
    })
}

/// Compare request cost across models, ascending by total cost.
///
/// `models` selects the entries to compare; `None` compares the whole table. Ties keep
/// the input order. Any unknown model in the set fails the whole comparison.
pub fn compare_models(
    table: &PricingTable,
    input_tokens: u64,
    output_tokens: u64,
    models: Option<&[&str]>,
) -> Result<Vec<ModelComparison>, UnknownModel> {
    let names: Vec<&str> = match models {
        Some(names) => names.to_vec(),
        None => table.model_names(),
    };
    let mut breakdowns = names
        .into_iter()
        .map(|model| calculate_cost(table, input_tokens, output_tokens, model))
        .collect::<Result<Vec<_>, _>>()?;
    breakdowns.sort_by(|a, b| a.total_cost.total_cmp(&b.total_cost));

    let cheapest = breakdowns.first().map_or(0.0, |b| b.total_cost);
    Ok(breakdowns
        .into_iter()
        .map(|breakdown| {
            let vs_cheapest = if cheapest > 0.0 {
                breakdown.total_cost / cheapest
            } else {
                0.0
            };
            ModelComparison {
                breakdown,
                vs_cheapest,
            }
        })
        .collect())
}

/// Project a daily workload into monthly and yearly cost.
///
/// Token volumes are multiplied up front (`requests_per_day * 30 * avg tokens`) and
/// priced in one [calculate_cost] call, so the projection equals the cost of the
/// aggregate volume exactly. Yearly cost is `monthly_cost * 12`.
pub fn estimate_monthly_cost(
    table: &PricingTable,
    requests_per_day: u64,
    avg_input_tokens: u64,
    avg_output_tokens: u64,
    model: &str,
) -> Result<UsageProjection, UnknownModel> {
    let monthly_requests = requests_per_day * DAYS_PER_MONTH;
    let monthly_input_tokens = monthly_requests * avg_input_tokens;
    let monthly_output_tokens = monthly_requests * avg_output_tokens;

    let cost = calculate_cost(table, monthly_input_tokens, monthly_output_tokens, model)?;

    Ok(UsageProjection {
        model: cost.model,
        daily_requests: requests_per_day,
        monthly_requests,
        monthly_input_tokens,
        monthly_output_tokens,
        daily_cost: cost.total_cost / DAYS_PER_MONTH as f64,
        monthly_cost: cost.total_cost,
        yearly_cost: cost.total_cost * MONTHS_PER_YEAR,
    })
}

/// Invert a budget into a request allowance for `model`.
///
/// Assumes the typical 200 input + 100 output token request. `max_requests` is
/// `floor(budget / cost_per_request)`, `0` when the request cost is zero, and the
/// per-day allowances use integer floor division over 30- and 365-day horizons.
pub fn budget_planner(
    table: &PricingTable,
    budget_usd: f64,
    model: &str,
) -> Result<BudgetPlan, UnknownModel> {
    let cost = calculate_cost(table, TYPICAL_INPUT_TOKENS, TYPICAL_OUTPUT_TOKENS, model)?;
    let cost_per_request = cost.total_cost;

    let max_requests = if cost_per_request > 0.0 {
        (budget_usd / cost_per_request).floor() as u64
    } else {
        0
    };

    Ok(BudgetPlan {
        model: cost.model,
        budget: budget_usd,
        cost_per_request,
        max_requests,
        requests_per_day_30days: max_requests / DAYS_PER_MONTH,
        requests_per_day_365days: max_requests / DAYS_PER_YEAR,
    })
}

/// Recommend models for an expected monthly workload.
///
/// Costs every entry of `table` at `monthly_requests * avg tokens`, ranks ascending and
/// reports the cheapest and the midpoint entry. When `avg_input_tokens` exceeds 2,000,
/// the recommendation also lists the models whose context window is at least 16,000
/// tokens (inclusive), since a large average input calls for a large window.
///
/// Returns `None` for an empty table.
pub fn recommend_model(
    table: &PricingTable,
    monthly_requests: u64,
    avg_input_tokens: u64,
    avg_output_tokens: u64,
) -> Option<ModelRecommendation> {
    if table.is_empty() {
        return None;
    }
    let total_input = monthly_requests * avg_input_tokens;
    let total_output = monthly_requests * avg_output_tokens;

    let mut ranking: Vec<RankedCost> = table
        .model_names()
        .into_iter()
        .map(|model| {
            // lookup cannot fail, the name came from the table
            let pricing = table.lookup(model).unwrap();
            let cost = calculate_cost(table, total_input, total_output, model).unwrap();
            RankedCost {
                model: pricing.name.clone(),
                provider: pricing.provider.clone(),
                monthly_cost: cost.total_cost,
                context_limit: pricing.context_limit,
            }
        })
        .collect();
    ranking.sort_by(|a, b| a.monthly_cost.total_cmp(&b.monthly_cost));

    let large_context = if avg_input_tokens > LARGE_INPUT_THRESHOLD {
        ranking
            .iter()
            .filter(|entry| entry.context_limit >= LARGE_CONTEXT_FLOOR)
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    Some(ModelRecommendation {
        ranking,
        large_context,
    })
}
