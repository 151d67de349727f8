//! Resource limits for stability

use super::{steps, Effort, OptimizationRecommendation, Priority, RuleContext, RuleKind};
use crate::config::CLUSTER_WIDE;

pub(super) fn evaluate(ctx: &RuleContext<'_>) -> Vec<OptimizationRecommendation> {
    let workloads = &ctx.snapshot.resources.workloads;
    let without_limits = workloads.iter().filter(|w| w.lacks_limits()).count();
    let threshold = workloads.len() as f64 * ctx.config.thresholds.missing_limits_fraction;

    if workloads.is_empty() || without_limits as f64 <= threshold {
        return Vec::new();
    }

    vec![OptimizationRecommendation {
        category: RuleKind::PerformanceOptimization,
        priority: Priority::Medium,
        title: "Set resource limits for better resource management".to_string(),
        description: format!(
            "{} of {} workloads run without CPU or memory limits, inviting resource contention.",
            without_limits,
            workloads.len()
        ),
        impact: "More predictable scheduling and cluster stability".to_string(),
        effort: Effort::Medium,
        // Stability benefit, no direct saving
        monthly_savings: 0.0,
        implementation_steps: steps(&[
            "Study each workload's usage pattern",
            "Set CPU and memory limits from observed peaks",
            "Add namespace-level resource quotas",
            "Watch for throttling after limits apply",
        ]),
        risks: steps(&[
            "Throttling when limits are too tight",
            "Needs per-workload tuning",
            "Possible performance impact",
        ]),
        resources_affected: vec![CLUSTER_WIDE.to_string()],
        adjustment: None,
    }]
}
