//! Workload rightsizing
//!
//! Pulls CPU and memory requests down toward observed usage plus headroom.
//! CPU and memory are judged independently, so a workload can yield zero,
//! one or two recommendations.

use super::{
    steps, AdjustedResource, Effort, OptimizationRecommendation, Priority, ResourceAdjustment,
    RuleContext, RuleKind,
};
use crate::config::OptimizerConfig;
use crate::models::ResourceUsageRecord;
use crate::quantity::{bytes_to_gib, MIB};

/// CPU reductions above this many cores are high priority
const HIGH_PRIORITY_CPU_REDUCTION: f64 = 0.5;

/// Memory reductions above this many bytes are high priority
const HIGH_PRIORITY_MEMORY_REDUCTION: f64 = (512 * MIB) as f64;

pub(super) fn evaluate(ctx: &RuleContext<'_>) -> Vec<OptimizationRecommendation> {
    let mut recommendations = Vec::new();

    for (workload, verdict) in ctx.snapshot.workload_pairs() {
        if verdict.cpu_underutilized {
            recommendations.extend(cpu_recommendation(workload, verdict.cpu_percent, ctx.config));
        }
        if verdict.memory_underutilized {
            recommendations.extend(memory_recommendation(
                workload,
                verdict.memory_percent,
                ctx.config,
            ));
        }
    }

    recommendations
}

fn cpu_recommendation(
    workload: &ResourceUsageRecord,
    utilization: f64,
    config: &OptimizerConfig,
) -> Option<OptimizationRecommendation> {
    let assumptions = &config.assumptions;
    let recommended = (workload.cpu_usage * assumptions.cpu_buffer)
        .max(assumptions.min_recommended_cpu_cores);
    let reduction = workload.cpu_request - recommended;
    if reduction <= 0.0 {
        return None;
    }

    let pricing = &config.pricing;
    let monthly_savings = reduction * pricing.billing_days * pricing.cpu_core_hour;

    Some(OptimizationRecommendation {
        category: RuleKind::Rightsizing,
        priority: if reduction > HIGH_PRIORITY_CPU_REDUCTION {
            Priority::High
        } else {
            Priority::Medium
        },
        title: format!("Reduce CPU request for {}", workload.name),
        description: format!(
            "Workload uses {:.1}% of its requested CPU. Lower the request from {:.2} to {:.2} cores.",
            utilization, workload.cpu_request, recommended
        ),
        impact: format!("Frees {:.2} cores of CPU allocation", reduction),
        effort: Effort::Low,
        monthly_savings,
        implementation_steps: vec![
            format!("Edit the owning controller spec of {}", workload.identifier()),
            format!(
                "Set the CPU request from {:.2} to {:.2} cores",
                workload.cpu_request, recommended
            ),
            "Watch latency and throttling metrics after rollout".to_string(),
            "Tighten further only while the workload stays healthy".to_string(),
        ],
        risks: steps(&[
            "CPU throttling under traffic spikes",
            "Slower response times under load",
            "Needs monitoring through the transition",
        ]),
        resources_affected: vec![workload.identifier()],
        adjustment: Some(ResourceAdjustment {
            resource: AdjustedResource::Cpu,
            current: workload.cpu_request,
            recommended,
        }),
    })
}

fn memory_recommendation(
    workload: &ResourceUsageRecord,
    utilization: f64,
    config: &OptimizerConfig,
) -> Option<OptimizationRecommendation> {
    let assumptions = &config.assumptions;
    let current = workload.memory_request as f64;
    let recommended = (workload.memory_usage as f64 * assumptions.memory_buffer)
        .max(assumptions.min_recommended_memory_bytes as f64);
    let reduction = current - recommended;
    if reduction <= 0.0 {
        return None;
    }

    let pricing = &config.pricing;
    let monthly_savings = bytes_to_gib(reduction) * pricing.billing_days * pricing.memory_gb_hour;

    Some(OptimizationRecommendation {
        category: RuleKind::Rightsizing,
        priority: if reduction > HIGH_PRIORITY_MEMORY_REDUCTION {
            Priority::High
        } else {
            Priority::Medium
        },
        title: format!("Reduce memory request for {}", workload.name),
        description: format!(
            "Workload uses {:.1}% of its requested memory. Lower the request from {:.2}GB to {:.2}GB.",
            utilization,
            bytes_to_gib(current),
            bytes_to_gib(recommended)
        ),
        impact: format!("Frees {:.2}GB of memory allocation", bytes_to_gib(reduction)),
        effort: Effort::Low,
        monthly_savings,
        implementation_steps: vec![
            format!("Edit the owning controller spec of {}", workload.identifier()),
            format!(
                "Set the memory request from {:.2}GB to {:.2}GB",
                bytes_to_gib(current),
                bytes_to_gib(recommended)
            ),
            "Alert on OOMKilled events for the workload".to_string(),
            "Raise the request again if memory pressure appears".to_string(),
        ],
        risks: steps(&[
            "Out-of-memory kills",
            "Instability under peak load",
            "Needs close monitoring",
        ]),
        resources_affected: vec![workload.identifier()],
        adjustment: Some(ResourceAdjustment {
            resource: AdjustedResource::Memory,
            current,
            recommended,
        }),
    })
}
