//! Implementation roadmap command

use anyhow::Result;
use colored::Colorize;
use optimizer_lib::{build_roadmap, Optimizer, OptimizerConfig, Phase, RoadmapItem};
use tabled::Tabled;

use crate::input;
use crate::output::{color_effort, format_currency, print_json, print_table, OutputFormat};
use crate::SnapshotArgs;

#[derive(Tabled)]
struct RoadmapRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Savings/Month")]
    savings: String,
    #[tabled(rename = "Effort")]
    effort: String,
}

const PHASES: [(Phase, &str); 3] = [
    (Phase::Immediate, "Immediate (high priority, low effort)"),
    (Phase::ShortTerm, "Short term (high priority, medium effort)"),
    (Phase::LongTerm, "Long term"),
];

pub fn show(snapshots: &SnapshotArgs, config: &OptimizerConfig, format: OutputFormat) -> Result<()> {
    let (resources, cost) = input::load(snapshots)?;
    let recommendations = Optimizer::with_config(config.clone()).synthesize(&resources, &cost);
    let roadmap = build_roadmap(&recommendations);

    match format {
        OutputFormat::Json => print_json(&roadmap)?,
        OutputFormat::Table => {
            for (phase, heading) in PHASES {
                let items = roadmap.phase(phase);
                let savings: f64 = items.iter().map(|i| i.savings).sum();
                println!(
                    "{} {}",
                    heading.bold(),
                    format!("[{}/month]", format_currency(savings, &cost.currency)).dimmed()
                );
                print_table(rows(items, &cost.currency), "Nothing planned");
                println!();
            }
        }
    }

    Ok(())
}

fn rows(items: &[RoadmapItem], currency: &str) -> Vec<RoadmapRow> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| RoadmapRow {
            rank: i + 1,
            title: item.title.clone(),
            category: item.category.display_name().to_string(),
            savings: format_currency(item.savings, currency),
            effort: color_effort(item.effort),
        })
        .collect()
}
