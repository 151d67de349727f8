//! Cleanup of unattached volumes and backend-less load balancers

use super::{steps, Effort, OptimizationRecommendation, Priority, RuleContext, RuleKind};

pub(super) fn evaluate(ctx: &RuleContext<'_>) -> Vec<OptimizationRecommendation> {
    let resources = ctx.snapshot.resources;
    let pricing = &ctx.config.pricing;
    let mut recommendations = Vec::new();

    let unused_volumes: Vec<_> = resources.volumes.iter().filter(|v| v.is_unused()).collect();
    if !unused_volumes.is_empty() {
        let total_gb: f64 = unused_volumes.iter().map(|v| v.size_gb).sum();
        let count = unused_volumes.len();

        recommendations.push(OptimizationRecommendation {
            category: RuleKind::ResourceCleanup,
            priority: Priority::High,
            title: format!("Remove {} unused PVCs", count),
            description: format!(
                "{} persistent volume claims are not mounted by any pod, holding {:.1}GB of storage.",
                count, total_gb
            ),
            impact: format!("Releases {:.1}GB of storage", total_gb),
            effort: Effort::Low,
            monthly_savings: total_gb * pricing.standard_disk_gb_month,
            implementation_steps: steps(&[
                "Confirm no workload or job mounts the claims",
                "Check backup and disaster-recovery dependencies",
                "Delete each claim: kubectl delete pvc <name> -n <namespace>",
                "Watch for failing workloads afterwards",
            ]),
            risks: steps(&[
                "Data loss if a claim still holds needed data",
                "Workloads fail if a claim is actually required",
                "Take a snapshot before deleting",
            ]),
            resources_affected: unused_volumes.iter().map(|v| v.identifier()).collect(),
            adjustment: None,
        });
    }

    let unused_endpoints: Vec<_> = resources.endpoints.iter().filter(|e| e.is_unused()).collect();
    if !unused_endpoints.is_empty() {
        let count = unused_endpoints.len();

        recommendations.push(OptimizationRecommendation {
            category: RuleKind::ResourceCleanup,
            priority: Priority::High,
            title: format!("Remove {} unused LoadBalancers", count),
            description: format!("{} LoadBalancer services have no ready endpoints.", count),
            impact: format!("Drops {} idle load balancers", count),
            effort: Effort::Low,
            monthly_savings: count as f64 * pricing.load_balancer_month,
            implementation_steps: steps(&[
                "Confirm the services have no ready endpoints",
                "Check whether anything outside the cluster still targets them",
                "Delete each service: kubectl delete svc <name> -n <namespace>",
                "Remove DNS records pointing at the released addresses",
            ]),
            risks: steps(&[
                "Outage if the load balancer is still needed",
                "Stale DNS resolution",
                "Broken external traffic routing",
            ]),
            resources_affected: unused_endpoints.iter().map(|e| e.identifier()).collect(),
            adjustment: None,
        });
    }

    recommendations
}
