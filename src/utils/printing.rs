//! Markdown report rendering for the terminal.
//!
//! The builders return plain markdown strings; [print_markdown] renders one with a
//! default `termimad` skin. Costs are formatted at presentation time only, six decimal
//! places for per-request money and two for monthly figures.

use termimad::MadSkin;

use crate::cost::{BudgetPlan, ModelComparison, UsageProjection};

/// Render a markdown string to the terminal.
pub fn print_markdown(markdown: &str) {
    MadSkin::default().print_text(markdown);
}

/// A cost-comparison ranking as a markdown table.
pub fn comparison_report(
    input_tokens: u64,
    output_tokens: u64,
    ranking: &[ModelComparison],
) -> String {
    let mut report = format!(
        "# Cost comparison\n\n{input_tokens} input + {output_tokens} output tokens\n\n\
         |Model|Provider|Cost|vs cheapest|\n|-|-|-|-|\n"
    );
    for entry in ranking {
        report.push_str(&format!(
            "|{}|{}|${:.6}|{:.1}x|\n",
            entry.breakdown.model,
            entry.breakdown.provider,
            entry.breakdown.total_cost,
            entry.vs_cheapest,
        ));
    }
    report
}

/// A monthly usage projection as a markdown block.
pub fn projection_report(projection: &UsageProjection) -> String {
    format!(
        "# Projection for {}\n\n\
         * {} requests/day, {} requests/month\n\
         * {} input + {} output tokens per month\n\
         * daily **${:.2}**, monthly **${:.2}**, yearly **${:.2}**\n",
        projection.model,
        projection.daily_requests,
        projection.monthly_requests,
        projection.monthly_input_tokens,
        projection.monthly_output_tokens,
        projection.daily_cost,
        projection.monthly_cost,
        projection.yearly_cost,
    )
}

/// A budget plan as a markdown block.
pub fn budget_report(plan: &BudgetPlan) -> String {
    format!(
        "# Budget ${:.2} on {}\n\n\
         * ${:.6} per request (200 input + 100 output tokens)\n\
         * **{}** requests in total\n\
         * {}/day over 30 days, {}/day over a year\n",
        plan.budget,
        plan.model,
        plan.cost_per_request,
        plan.max_requests,
        plan.requests_per_day_30days,
        plan.requests_per_day_365days,
    )
}

/// How a text splits into tokens, one backticked piece per token.
pub fn segmentation_report(text: &str, pieces: &[String]) -> String {
    let mut report = format!("**\"{text}\"** splits into {} tokens:\n\n", pieces.len());
    for piece in pieces {
        report.push_str(&format!("`{piece}` "));
    }
    report.push('\n');
    report
}

#[cfg(test)]
mod test_printing {
    use super::*;
    use crate::cost::{calculate_cost, compare_models};
    use crate::pricing::PricingTable;

    #[test]
    fn test_comparison_report_has_one_row_per_model() {
        let ranking = compare_models(PricingTable::builtin(), 1000, 500, None).unwrap();
        let report = comparison_report(1000, 500, &ranking);
        assert_eq!(
            report.matches("|OpenAI|").count() + report.matches("|Anthropic|").count(),
            ranking.len()
        );
        assert!(report.contains("1000 input + 500 output tokens"));
    }

    #[test]
    fn test_cost_formatting_is_presentation_only() {
        let cost = calculate_cost(PricingTable::builtin(), 1000, 500, "gpt-4").unwrap();
        // 1000 * 30 / 1e6 + 500 * 60 / 1e6
        assert!(format!("${:.6}", cost.total_cost).contains("$0.060000"));
    }

    #[test]
    fn test_segmentation_report() {
        let report = segmentation_report(
            "Hello, world!",
            &["Hello".into(), ",".into(), " world".into(), "!".into()],
        );
        assert!(report.contains("4 tokens"));
        assert!(report.contains("` world`"));
    }
}
