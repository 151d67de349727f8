//! CSV export of recommendations

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use optimizer_lib::{OptimizerConfig, Optimizer, Recommendations};

use crate::input;
use crate::output::print_success;
use crate::SnapshotArgs;

const HEADER: [&str; 8] = [
    "Category",
    "Priority",
    "Title",
    "Description",
    "Monthly Savings",
    "Effort",
    "Impact",
    "Resources Affected",
];

/// Export recommendations to a file, or stdout without one
pub fn run(snapshots: &SnapshotArgs, config: &OptimizerConfig, output: Option<&Path>) -> Result<()> {
    let (resources, cost) = input::load(snapshots)?;
    let recommendations = Optimizer::with_config(config.clone()).synthesize(&resources, &cost);
    let csv = to_csv(&recommendations);

    match output {
        Some(path) => {
            fs::write(path, &csv)
                .with_context(|| format!("Failed to write export {}", path.display()))?;
            print_success(&format!(
                "Exported {} recommendations to {}",
                recommendations.total_count(),
                path.display()
            ));
        }
        None => print!("{}", csv),
    }

    Ok(())
}

/// Render recommendations as RFC 4180 CSV with a header row
pub fn to_csv(recommendations: &Recommendations) -> String {
    let mut csv = String::new();
    push_record(&mut csv, HEADER.iter().map(|h| Cow::Borrowed(*h)));

    for rec in recommendations.iter() {
        push_record(
            &mut csv,
            [
                Cow::Borrowed(rec.category.display_name()),
                Cow::Borrowed(rec.priority.as_str()),
                Cow::Borrowed(rec.title.as_str()),
                Cow::Borrowed(rec.description.as_str()),
                Cow::Owned(format!("{:.2}", rec.monthly_savings)),
                Cow::Borrowed(rec.effort.as_str()),
                Cow::Borrowed(rec.impact.as_str()),
                Cow::Owned(rec.resources_affected.join("; ")),
            ],
        );
    }

    csv
}

fn push_record<'a>(csv: &mut String, fields: impl IntoIterator<Item = Cow<'a, str>>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            csv.push(',');
        }
        csv.push_str(&escape(&field));
    }
    csv.push_str("\r\n");
}

/// Quote fields containing separators, quotes or line breaks
fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
