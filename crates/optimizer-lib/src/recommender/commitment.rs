//! Committed-use discounts

use super::{steps, Effort, OptimizationRecommendation, Priority, RuleContext, RuleKind};
use crate::config::BILLING_ACCOUNT;

pub(super) fn evaluate(ctx: &RuleContext<'_>) -> Vec<OptimizationRecommendation> {
    let monthly_cost = ctx.cost.total_cost;
    if monthly_cost <= ctx.config.thresholds.significant_monthly_spend {
        return Vec::new();
    }

    let discount = ctx.config.assumptions.committed_use_discount;

    vec![OptimizationRecommendation {
        category: RuleKind::CostOptimization,
        priority: Priority::High,
        title: "Consider Committed Use Discounts (CUDs)".to_string(),
        description: format!(
            "Monthly spend is ${:.2}; committing to steady baseline usage lowers its price.",
            monthly_cost
        ),
        impact: format!("Up to {:.0}% lower compute cost", discount * 100.0),
        effort: Effort::Low,
        monthly_savings: monthly_cost * discount,
        implementation_steps: steps(&[
            "Review historical usage to size the steady baseline",
            "Purchase 1-year or 3-year commitments for that baseline",
            "Track commitment utilization every month",
            "Adjust future commitments as the cluster grows",
        ]),
        risks: steps(&[
            "Locked into minimum usage levels",
            "Less flexibility to scale down",
            "Paying for unused commitment",
        ]),
        resources_affected: vec![BILLING_ACCOUNT.to_string()],
        adjustment: None,
    }]
}
