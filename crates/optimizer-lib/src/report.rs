//! Optimization report assembly
//!
//! Composes the executive summary, cluster overview, cost analysis, roadmap
//! and risk assessment into one serializable [`OptimizationReport`]. The
//! generation time is supplied by the caller so assembly stays a pure
//! function of its inputs.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::classifier::MetricsSummary;
use crate::config::OptimizerConfig;
use crate::models::{CostSnapshot, CostTrends, ResourceCosts, ResourceSnapshot, ServiceCost};
use crate::observability::StructuredLogger;
use crate::recommender::{Effort, Optimizer, Recommendations};
use crate::risk::RiskAssessment;
use crate::roadmap::{build_roadmap, Roadmap};

pub const REPORT_VERSION: &str = "1.0";

/// Maximum number of services listed as cost drivers
pub const TOP_COST_DRIVERS: usize = 5;

const MONTHS_PER_YEAR: f64 = 12.0;

/// Round to cents
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Headline numbers of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub current_monthly_cost: f64,
    pub total_recommendations: usize,
    pub high_priority_recommendations: usize,
    pub potential_monthly_savings: f64,
    pub potential_annual_savings: f64,
    /// Savings as a share of current cost; 0 when the cost is 0
    pub savings_percentage: f64,
    pub key_opportunities: Vec<String>,
}

impl ExecutiveSummary {
    pub fn new(recommendations: &Recommendations, cost: &CostSnapshot) -> Self {
        let savings = recommendations.total_monthly_savings();
        let savings_percentage = if cost.total_cost > 0.0 {
            round1(savings / cost.total_cost * 100.0)
        } else {
            0.0
        };

        Self {
            current_monthly_cost: cost.total_cost,
            total_recommendations: recommendations.total_count(),
            high_priority_recommendations: recommendations.high_priority_count(),
            potential_monthly_savings: round2(savings),
            potential_annual_savings: round2(savings * MONTHS_PER_YEAR),
            savings_percentage,
            key_opportunities: recommendations
                .categories()
                .filter(|(_, recs)| !recs.is_empty())
                .map(|(kind, _)| kind.display_name().to_string())
                .collect(),
        }
    }
}

/// One service from the billing breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostDriver {
    pub service: String,
    pub cost: f64,
    pub percentage: f64,
}

/// Most expensive services, cost descending, ties in breakdown order
pub fn top_cost_drivers(cost: &CostSnapshot) -> Vec<CostDriver> {
    let mut drivers: Vec<CostDriver> = cost
        .service_breakdown
        .iter()
        .map(|(service, entry)| CostDriver {
            service: service.clone(),
            cost: entry.cost,
            percentage: entry.percentage,
        })
        .collect();

    drivers.sort_by(|a, b| b.cost.partial_cmp(&a.cost).unwrap_or(Ordering::Equal));
    drivers.truncate(TOP_COST_DRIVERS);
    drivers
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnusedResources {
    pub volumes: usize,
    pub endpoints: usize,
}

/// Inventory and utilization at a glance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterOverview {
    pub cluster_name: String,
    pub kubernetes_version: String,
    pub node_count: usize,
    pub total_workloads: usize,
    pub average_cpu_utilization: f64,
    pub average_memory_utilization: f64,
    pub unused_resources: UnusedResources,
    pub optimization_opportunities: usize,
}

impl ClusterOverview {
    pub fn new(resources: &ResourceSnapshot) -> Self {
        let metrics = MetricsSummary::from_snapshot(resources);
        Self {
            cluster_name: resources.cluster_name().to_string(),
            kubernetes_version: resources
                .cluster
                .kubernetes_version
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            node_count: resources
                .cluster
                .node_count
                .map_or(metrics.total_nodes, |count| count as usize),
            total_workloads: metrics.total_workloads,
            average_cpu_utilization: round1(metrics.average_cpu_utilization),
            average_memory_utilization: round1(metrics.average_memory_utilization),
            unused_resources: UnusedResources {
                volumes: metrics.unused_volumes,
                endpoints: metrics.unused_endpoints,
            },
            optimization_opportunities: metrics.optimization_opportunities,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

/// Rule-of-thumb savings estimate derived from billing alone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotentialOpportunity {
    pub category: String,
    pub description: String,
    pub potential_savings: f64,
    pub confidence: Confidence,
    pub effort: Effort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationPotential {
    pub total_potential_savings: f64,
    pub opportunities: Vec<PotentialOpportunity>,
}

impl OptimizationPotential {
    /// Typical industry savings ratios applied to the billing categories
    pub fn estimate(cost: &CostSnapshot) -> Self {
        let costs = &cost.resource_costs;
        let opportunity =
            |category: &str, description: &str, savings, confidence, effort| PotentialOpportunity {
                category: category.to_string(),
                description: description.to_string(),
                potential_savings: savings,
                confidence,
                effort,
            };

        let opportunities = vec![
            opportunity(
                "rightsizing",
                "Right-size over-provisioned resources",
                cost.total_cost * 0.25,
                Confidence::High,
                Effort::Medium,
            ),
            opportunity(
                "spot_instances",
                "Run non-critical workloads on preemptible or spot instances",
                costs.compute * 0.50,
                Confidence::Medium,
                Effort::High,
            ),
            opportunity(
                "storage_optimization",
                "Tune storage classes and remove unused volumes",
                costs.storage * 0.15,
                Confidence::High,
                Effort::Low,
            ),
            opportunity(
                "load_balancer_cleanup",
                "Remove unused load balancers and trim networking",
                costs.network * 0.30,
                Confidence::High,
                Effort::Low,
            ),
        ];

        Self {
            total_potential_savings: opportunities.iter().map(|o| o.potential_savings).sum(),
            opportunities,
        }
    }
}

/// Billing section of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAnalysis {
    pub current_monthly_cost: f64,
    pub currency: String,
    pub cost_breakdown: IndexMap<String, ServiceCost>,
    pub resource_costs: ResourceCosts,
    pub cost_trends: CostTrends,
    pub top_cost_drivers: Vec<CostDriver>,
    pub optimization_potential: OptimizationPotential,
}

impl CostAnalysis {
    pub fn new(cost: &CostSnapshot) -> Self {
        Self {
            current_monthly_cost: cost.total_cost,
            currency: cost.currency.clone(),
            cost_breakdown: cost.service_breakdown.clone(),
            resource_costs: cost.resource_costs,
            cost_trends: cost.cost_trends,
            top_cost_drivers: top_cost_drivers(cost),
            optimization_potential: OptimizationPotential::estimate(cost),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub cluster_name: String,
    pub report_version: String,
}

/// Complete result of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub metadata: ReportMetadata,
    pub executive_summary: ExecutiveSummary,
    pub cluster_overview: ClusterOverview,
    pub cost_analysis: CostAnalysis,
    pub recommendations: Recommendations,
    pub implementation_roadmap: Roadmap,
    pub risk_assessment: RiskAssessment,
}

impl OptimizationReport {
    /// Assemble a report from already-synthesized recommendations
    pub fn assemble(
        resources: &ResourceSnapshot,
        cost: &CostSnapshot,
        recommendations: Recommendations,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let executive_summary = ExecutiveSummary::new(&recommendations, cost);

        StructuredLogger::new(resources.cluster_name())
            .log_report_generated(cost.total_cost, executive_summary.savings_percentage);

        Self {
            metadata: ReportMetadata {
                generated_at,
                cluster_name: resources.cluster_name().to_string(),
                report_version: REPORT_VERSION.to_string(),
            },
            executive_summary,
            cluster_overview: ClusterOverview::new(resources),
            cost_analysis: CostAnalysis::new(cost),
            implementation_roadmap: build_roadmap(&recommendations),
            risk_assessment: RiskAssessment::new(&recommendations),
            recommendations,
        }
    }
}

/// Run the full pipeline: classify, synthesize, then assemble the report
pub fn build_report(
    resources: &ResourceSnapshot,
    cost: &CostSnapshot,
    config: &OptimizerConfig,
    generated_at: DateTime<Utc>,
) -> OptimizationReport {
    let recommendations = Optimizer::with_config(config.clone()).synthesize(resources, cost);
    OptimizationReport::assemble(resources, cost, recommendations, generated_at)
}

/// Savings from cutting a monthly bill by a fixed percentage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsProjection {
    pub monthly_savings: f64,
    pub annual_savings: f64,
    pub projected_savings: f64,
    pub months: u32,
    pub optimization_percentage: f64,
}

impl SavingsProjection {
    pub fn new(current_cost: f64, optimization_percentage: f64, months: u32) -> Self {
        let monthly = current_cost * optimization_percentage / 100.0;
        Self {
            monthly_savings: round2(monthly),
            annual_savings: round2(monthly * MONTHS_PER_YEAR),
            projected_savings: round2(monthly * f64::from(months)),
            months,
            optimization_percentage,
        }
    }
}
