//! Full analysis: summary, per-category savings, roadmap, saved report

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use optimizer_lib::{build_report, OptimizationReport, OptimizerConfig};
use tabled::Tabled;
use tracing::info;

use crate::input;
use crate::output::{
    format_currency, print_heading, print_info, print_json, print_success, print_table,
    OutputFormat,
};
use crate::SnapshotArgs;

/// Immediate actions listed in the console summary
const TOP_ACTIONS: usize = 3;

/// Row for recommendations by category table
#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Potential Savings")]
    savings: String,
}

/// Run the pipeline and present the report
pub fn run(
    snapshots: &SnapshotArgs,
    config: &OptimizerConfig,
    save_to: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let (resources, cost) = input::load(snapshots)?;
    let report = build_report(&resources, &cost, config, Utc::now());

    let saved = save_to.map(|dir| save_report(&report, dir)).transpose()?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            display_report(&report, &cost.currency);
            if let Some(path) = &saved {
                println!();
                print_success(&format!("Report saved to {}", path.display()));
            }
        }
    }

    Ok(())
}

/// Write the report as pretty JSON named after its generation time
pub fn save_report(report: &OptimizationReport, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create report directory {}", dir.display()))?;

    let filename = format!(
        "gke_optimization_report_{}.json",
        report.metadata.generated_at.format("%Y%m%d_%H%M%S")
    );
    let path = dir.join(filename);

    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    fs::write(&path, json)
        .with_context(|| format!("Failed to write report {}", path.display()))?;

    info!(event = "report_saved", path = %path.display(), "Report saved");
    Ok(path)
}

fn display_report(report: &OptimizationReport, currency: &str) {
    let summary = &report.executive_summary;

    print_heading("Executive Summary");
    println!(
        "Cluster:                    {}",
        report.metadata.cluster_name.cyan()
    );
    println!(
        "Current Monthly Cost:       {}",
        format_currency(summary.current_monthly_cost, currency)
    );
    println!(
        "Total Recommendations:      {}",
        summary.total_recommendations
    );
    println!(
        "High Priority Items:        {}",
        summary.high_priority_recommendations
    );
    println!(
        "Potential Monthly Savings:  {}",
        format_currency(summary.potential_monthly_savings, currency)
            .green()
            .bold()
    );
    println!(
        "Potential Annual Savings:   {}",
        format_currency(summary.potential_annual_savings, currency).green()
    );
    println!("Savings Percentage:         {}%", summary.savings_percentage);
    println!();

    println!("{}", "Recommendations by Category".bold());
    let rows: Vec<CategoryRow> = report
        .recommendations
        .categories()
        .filter(|(_, recs)| !recs.is_empty())
        .map(|(kind, recs)| CategoryRow {
            category: kind.display_name().to_string(),
            count: recs.len(),
            savings: format!(
                "{}/month",
                format_currency(recs.iter().map(|r| r.monthly_savings).sum(), currency)
            ),
        })
        .collect();
    print_table(rows, "No recommendations found");
    println!();

    let roadmap = &report.implementation_roadmap;
    println!("{}", "Implementation Roadmap".bold());
    println!("Immediate (high priority, low effort):     {}", roadmap.immediate.len());
    println!("Short term (high priority, medium effort): {}", roadmap.short_term.len());
    println!("Long term:                                 {}", roadmap.long_term.len());

    if !roadmap.immediate.is_empty() {
        println!();
        println!("{}", "Top Immediate Actions".bold());
        for (i, item) in roadmap.immediate.iter().take(TOP_ACTIONS).enumerate() {
            println!(
                "  {}. {} ({}/month)",
                i + 1,
                item.title,
                format_currency(item.savings, currency).green()
            );
        }
    }

    println!();
    print_info("Use `gko roadmap` for the full plan or `gko export` for a CSV");
}
