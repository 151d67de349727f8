//! Recommendation-related CLI commands

use anyhow::Result;
use clap::ValueEnum;
use optimizer_lib::{OptimizationRecommendation, Optimizer, OptimizerConfig, Priority, RuleKind};
use tabled::Tabled;

use crate::input;
use crate::output::{
    color_effort, color_priority, format_currency, print_json, print_table, truncate, OutputFormat,
};
use crate::SnapshotArgs;

/// Priority accepted by `--priority`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriorityFilter {
    High,
    Medium,
    Low,
}

impl From<PriorityFilter> for Priority {
    fn from(filter: PriorityFilter) -> Self {
        match filter {
            PriorityFilter::High => Priority::High,
            PriorityFilter::Medium => Priority::Medium,
            PriorityFilter::Low => Priority::Low,
        }
    }
}

/// Row for recommendations table
#[derive(Tabled)]
struct RecommendationRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Savings/Month")]
    savings: String,
    #[tabled(rename = "Effort")]
    effort: String,
    #[tabled(rename = "Resources")]
    resources: String,
}

/// List recommendations with optional filters
pub fn list(
    snapshots: &SnapshotArgs,
    config: &OptimizerConfig,
    category: Option<RuleKind>,
    priority: Option<PriorityFilter>,
    format: OutputFormat,
) -> Result<()> {
    let (resources, cost) = input::load(snapshots)?;
    let recommendations = Optimizer::with_config(config.clone()).synthesize(&resources, &cost);

    let priority = priority.map(Priority::from);
    let filtered: Vec<&OptimizationRecommendation> = recommendations
        .iter()
        .filter(|r| category.map(|c| r.category == c).unwrap_or(true))
        .filter(|r| priority.map(|p| r.priority == p).unwrap_or(true))
        .collect();

    match format {
        OutputFormat::Json => print_json(&filtered)?,
        OutputFormat::Table => {
            let total: f64 = filtered.iter().map(|r| r.monthly_savings).sum();
            let count = filtered.len();

            let rows: Vec<RecommendationRow> = filtered
                .into_iter()
                .map(|r| RecommendationRow {
                    category: r.category.display_name().to_string(),
                    priority: color_priority(r.priority),
                    title: truncate(&r.title, 60),
                    savings: format_currency(r.monthly_savings, &cost.currency),
                    effort: color_effort(r.effort),
                    resources: summarize_resources(&r.resources_affected),
                })
                .collect();
            print_table(rows, "No recommendations found");

            if count > 0 {
                println!(
                    "\nTotal: {} recommendations, {}/month",
                    count,
                    format_currency(total, &cost.currency)
                );
            }
        }
    }

    Ok(())
}

fn summarize_resources(resources: &[String]) -> String {
    match resources {
        [] => String::new(),
        [only] => only.clone(),
        [first, rest @ ..] => format!("{} (+{} more)", first, rest.len()),
    }
}
