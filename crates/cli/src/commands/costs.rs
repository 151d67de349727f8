//! Cost-related CLI commands

use std::path::Path;

use anyhow::{bail, Result};
use colored::Colorize;
use optimizer_lib::report::CostAnalysis;
use optimizer_lib::SavingsProjection;
use serde::Serialize;
use tabled::Tabled;

use crate::input;
use crate::output::{format_currency, print_heading, print_json, print_table, OutputFormat};

/// Row for top cost drivers table
#[derive(Tabled)]
struct CostDriverRow {
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Share")]
    percentage: String,
}

/// Row for optimization potential table
#[derive(Tabled)]
struct PotentialRow {
    #[tabled(rename = "Opportunity")]
    description: String,
    #[tabled(rename = "Potential Savings")]
    savings: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Effort")]
    effort: String,
}

#[derive(Serialize)]
struct CostsView {
    cost_analysis: CostAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    projection: Option<SavingsProjection>,
}

/// Show cost analysis
pub fn show(
    costs_path: &Path,
    projection_percent: Option<f64>,
    months: u32,
    format: OutputFormat,
) -> Result<()> {
    if let Some(percent) = projection_percent {
        if !(0.0..=100.0).contains(&percent) {
            bail!("--projection-percent must be within 0-100, got {}", percent);
        }
    }

    let cost = input::load_costs(costs_path)?;
    let view = CostsView {
        cost_analysis: CostAnalysis::new(&cost),
        projection: projection_percent
            .map(|percent| SavingsProjection::new(cost.total_cost, percent, months)),
    };

    match format {
        OutputFormat::Json => print_json(&view)?,
        OutputFormat::Table => display(&view),
    }

    Ok(())
}

fn display(view: &CostsView) {
    let analysis = &view.cost_analysis;
    let currency = analysis.currency.as_str();
    let money = |amount: f64| format_currency(amount, currency);

    print_heading("Cost Analysis");
    println!(
        "Current Monthly Cost:   {}",
        money(analysis.current_monthly_cost).bold()
    );
    println!();

    println!("{}", "Resource Costs".bold());
    println!("{}", "-".repeat(50));
    let resource = &analysis.resource_costs;
    println!("Compute:                {}", money(resource.compute));
    println!("Storage:                {}", money(resource.storage));
    println!("Network:                {}", money(resource.network));
    println!("Management:             {}", money(resource.management));
    println!(
        "Trend vs last period:   {:+.1}%",
        analysis.cost_trends.total_change_percent
    );
    println!();

    println!("{}", "Top Cost Drivers".bold());
    let drivers: Vec<CostDriverRow> = analysis
        .top_cost_drivers
        .iter()
        .map(|d| CostDriverRow {
            service: d.service.clone(),
            cost: money(d.cost),
            percentage: format!("{:.1}%", d.percentage),
        })
        .collect();
    print_table(drivers, "No service breakdown available");
    println!();

    println!("{}", "Optimization Potential".bold());
    let potential: Vec<PotentialRow> = analysis
        .optimization_potential
        .opportunities
        .iter()
        .map(|o| PotentialRow {
            description: o.description.clone(),
            savings: money(o.potential_savings),
            confidence: o.confidence.as_str().to_string(),
            effort: o.effort.to_string(),
        })
        .collect();
    print_table(potential, "No optimization potential estimated");
    println!(
        "Total potential:        {}",
        money(analysis.optimization_potential.total_potential_savings).green()
    );

    if let Some(projection) = &view.projection {
        println!();
        println!(
            "{}",
            format!(
                "Savings Projection ({}% over {} months)",
                projection.optimization_percentage, projection.months
            )
            .bold()
        );
        println!("{}", "-".repeat(50));
        println!("Monthly:                {}", money(projection.monthly_savings));
        println!("Annual:                 {}", money(projection.annual_savings));
        println!(
            "Projected:              {}",
            money(projection.projected_savings).green().bold()
        );
    }
}
