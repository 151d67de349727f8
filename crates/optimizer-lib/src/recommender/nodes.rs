//! Node consolidation and preemptible capacity

use super::{steps, Effort, OptimizationRecommendation, Priority, RuleContext, RuleKind};
use crate::config::CLUSTER_WIDE;

pub(super) fn evaluate(ctx: &RuleContext<'_>) -> Vec<OptimizationRecommendation> {
    let compute_cost = ctx.cost.resource_costs.compute;
    let assumptions = &ctx.config.assumptions;
    let mut recommendations = Vec::new();

    let node_count = ctx.snapshot.nodes.len();
    let idle: Vec<_> = ctx
        .snapshot
        .node_pairs()
        .filter(|(_, verdict)| verdict.underutilized)
        .map(|(node, _)| node.name.clone())
        .collect();

    // Cost per node is undefined without nodes
    if !idle.is_empty() && node_count > 0 {
        let cost_per_node = compute_cost / node_count as f64;
        let count = idle.len();

        recommendations.push(OptimizationRecommendation {
            category: RuleKind::NodeOptimization,
            priority: Priority::Medium,
            title: format!("Consolidate {} underutilized nodes", count),
            description: format!(
                "{} nodes run below the utilization threshold on both CPU and memory. \
                 Pack their workloads onto fewer nodes.",
                count
            ),
            impact: format!("Shrinks the node count by up to {}", count),
            effort: Effort::Medium,
            monthly_savings: count as f64
                * cost_per_node
                * assumptions.consolidation_savings_fraction,
            implementation_steps: steps(&[
                "Review pod placement and resource requests on the idle nodes",
                "Use affinity rules to pack workloads more densely",
                "Enable the cluster autoscaler to remove empty nodes",
                "Consider smaller machine types for higher density",
            ]),
            risks: steps(&[
                "Lower fault tolerance",
                "Resource contention on the remaining nodes",
                "Requires careful capacity planning",
            ]),
            resources_affected: idle,
            adjustment: None,
        });
    }

    recommendations.push(OptimizationRecommendation {
        category: RuleKind::NodeOptimization,
        priority: Priority::Medium,
        title: "Use preemptible instances for fault-tolerant workloads".to_string(),
        description: "Move interruption-tolerant workloads onto preemptible or spot capacity."
            .to_string(),
        impact: format!(
            "Up to {:.0}% lower compute cost for eligible workloads",
            assumptions.preemptible_discount * 100.0
        ),
        effort: Effort::High,
        monthly_savings: compute_cost
            * assumptions.preemptible_discount
            * assumptions.preemptible_eligible_fraction,
        implementation_steps: steps(&[
            "Identify fault-tolerant workloads such as batch jobs and stateless services",
            "Create a node pool backed by preemptible instances",
            "Schedule eligible workloads there with node selectors and tolerations",
            "Handle preemption notices and restarts gracefully",
        ]),
        risks: steps(&[
            "Interruptions when instances are reclaimed",
            "Unsuitable for critical services",
            "Requires robust restart handling",
        ]),
        resources_affected: vec![CLUSTER_WIDE.to_string()],
        adjustment: None,
    });

    recommendations
}
