//! Pricing walkthrough: comparing models, projecting scenarios, planning budgets and
//! picking a model for a workload. Runs fully offline.

use promptmeter::cost::{
    budget_planner, compare_models, estimate_monthly_cost, recommend_model,
};
use promptmeter::pricing::PricingTable;
use promptmeter::utils::printing::{
    budget_report, comparison_report, print_markdown, projection_report,
};

struct Scenario {
    name: &'static str,
    description: &'static str,
    requests_per_day: u64,
    avg_input: u64,
    avg_output: u64,
}

fn main() -> anyhow::Result<()> {
    let table = PricingTable::builtin();

    // A single request across the whole table.
    let ranking = compare_models(table, 1000, 500, None)?;
    print_markdown(&comparison_report(1000, 500, &ranking));

    // A larger request across a hand-picked set.
    let picked = ["gpt-3.5-turbo", "gpt-4", "claude-3-haiku", "claude-3-sonnet"];
    let ranking = compare_models(table, 5000, 2000, Some(&picked))?;
    print_markdown(&comparison_report(5000, 2000, &ranking));

    // Monthly projections for common workloads.
    let scenarios = [
        Scenario {
            name: "Small chatbot",
            description: "100 users, 5 messages/day each",
            requests_per_day: 500,
            avg_input: 100,
            avg_output: 75,
        },
        Scenario {
            name: "Medium customer support",
            description: "1000 users, 3 messages/day each",
            requests_per_day: 3000,
            avg_input: 200,
            avg_output: 150,
        },
        Scenario {
            name: "Document analyzer",
            description: "100 documents/day, long context",
            requests_per_day: 100,
            avg_input: 3000,
            avg_output: 500,
        },
        Scenario {
            name: "Code assistant",
            description: "50 developers, 20 queries/day each",
            requests_per_day: 1000,
            avg_input: 150,
            avg_output: 200,
        },
    ];
    for scenario in &scenarios {
        println!("\n== {} ({}) ==", scenario.name, scenario.description);
        for model in ["gpt-3.5-turbo", "gpt-4", "claude-3-haiku", "claude-3-sonnet"] {
            let projection = estimate_monthly_cost(
                table,
                scenario.requests_per_day,
                scenario.avg_input,
                scenario.avg_output,
                model,
            )?;
            print_markdown(&projection_report(&projection));
        }
    }

    // What a monthly budget buys.
    for budget in [50.0, 200.0] {
        for model in ["gpt-3.5-turbo", "gpt-4-turbo", "claude-3-haiku"] {
            let plan = budget_planner(table, budget, model)?;
            print_markdown(&budget_report(&plan));
        }
    }

    // Model recommendations for two workload shapes.
    for (monthly_requests, avg_input, avg_output) in [(10_000, 250, 150), (1000, 4000, 500)] {
        let recommendation = recommend_model(table, monthly_requests, avg_input, avg_output)
            .expect("the builtin table is not empty");
        println!(
            "\nFor {monthly_requests} requests/month at {avg_input} input + {avg_output} output tokens:"
        );
        let economical = recommendation.most_economical();
        let balanced = recommendation.balanced();
        println!(
            "  most economical: {} (${:.2}/month)",
            economical.model, economical.monthly_cost
        );
        println!(
            "  balanced option: {} (${:.2}/month)",
            balanced.model, balanced.monthly_cost
        );
        if !recommendation.large_context.is_empty() {
            println!("  large inputs, consider these context windows:");
            for entry in recommendation.large_context.iter() {
                println!(
                    "    {}: {} token window (${:.2}/month)",
                    entry.model, entry.context_limit, entry.monthly_cost
                );
            }
        }
    }

    Ok(())
}
