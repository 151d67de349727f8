//! Storage class downgrades

use super::{steps, Effort, OptimizationRecommendation, Priority, RuleContext, RuleKind};

pub(super) fn evaluate(ctx: &RuleContext<'_>) -> Vec<OptimizationRecommendation> {
    let ssd: Vec<_> = ctx
        .snapshot
        .resources
        .volumes
        .iter()
        .filter(|v| v.is_high_performance())
        .collect();
    if ssd.is_empty() {
        return Vec::new();
    }

    let pricing = &ctx.config.pricing;
    let total_gb: f64 = ssd.iter().map(|v| v.size_gb).sum();
    let migratable_gb = total_gb * ctx.config.assumptions.ssd_migratable_fraction;
    let price_gap = (pricing.ssd_disk_gb_month - pricing.standard_disk_gb_month).max(0.0);

    vec![OptimizationRecommendation {
        category: RuleKind::StorageOptimization,
        priority: Priority::Medium,
        title: "Migrate suitable workloads from SSD to Standard storage".to_string(),
        description: format!(
            "{:.1}GB of SSD-backed storage is provisioned. Move workloads that are not \
             I/O bound to standard disks.",
            total_gb
        ),
        impact: format!("Up to {:.1}GB could move to cheaper storage", migratable_gb),
        effort: Effort::Medium,
        monthly_savings: migratable_gb * price_gap,
        implementation_steps: steps(&[
            "Find workloads that do not need high IOPS",
            "Create replacement claims with a standard storage class",
            "Copy data from the SSD claims to the new claims",
            "Point workloads at the new claims and remove the old ones",
        ]),
        risks: steps(&[
            "Slower I/O for disk-heavy applications",
            "Data migration complexity",
            "Possible downtime during the move",
        ]),
        resources_affected: ssd.iter().map(|v| v.identifier()).collect(),
        adjustment: None,
    }]
}
