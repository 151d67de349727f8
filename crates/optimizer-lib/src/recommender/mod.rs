//! Recommendation synthesis
//!
//! Six independent rule modules scan the classified snapshot and the cost
//! ledger and emit typed recommendations with a savings estimate:
//! - Rightsizing of over-requested workloads
//! - Cleanup of unattached volumes and backend-less load balancers
//! - Node consolidation and preemptible capacity
//! - Storage class downgrades
//! - Committed-use discounts
//! - Resource limits for stability
//!
//! Rules run in parallel; the result is keyed by [`RuleKind`], whose ordering
//! is the fixed rule-module order, so output never depends on scheduling.

mod cleanup;
mod commitment;
mod nodes;
mod performance;
mod rightsizing;
mod storage;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classifier::ClassifiedSnapshot;
use crate::config::OptimizerConfig;
use crate::models::{CostSnapshot, ResourceSnapshot};
use crate::observability::StructuredLogger;

/// How urgent a recommendation is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much work a recommendation takes to carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl Effort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Effort::Low => "low",
            Effort::Medium => "medium",
            Effort::High => "high",
        }
    }
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six rule modules, in evaluation and presentation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Rightsizing,
    ResourceCleanup,
    NodeOptimization,
    StorageOptimization,
    CostOptimization,
    PerformanceOptimization,
}

impl RuleKind {
    pub const ALL: [RuleKind; 6] = [
        RuleKind::Rightsizing,
        RuleKind::ResourceCleanup,
        RuleKind::NodeOptimization,
        RuleKind::StorageOptimization,
        RuleKind::CostOptimization,
        RuleKind::PerformanceOptimization,
    ];

    /// Category tag used in reports and exports
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Rightsizing => "rightsizing",
            RuleKind::ResourceCleanup => "resource_cleanup",
            RuleKind::NodeOptimization => "node_optimization",
            RuleKind::StorageOptimization => "storage_optimization",
            RuleKind::CostOptimization => "cost_optimization",
            RuleKind::PerformanceOptimization => "performance_optimization",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RuleKind::Rightsizing => "Rightsizing",
            RuleKind::ResourceCleanup => "Resource Cleanup",
            RuleKind::NodeOptimization => "Node Optimization",
            RuleKind::StorageOptimization => "Storage Optimization",
            RuleKind::CostOptimization => "Cost Optimization",
            RuleKind::PerformanceOptimization => "Performance Optimization",
        }
    }

    /// Run this rule module
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<OptimizationRecommendation> {
        match self {
            RuleKind::Rightsizing => rightsizing::evaluate(ctx),
            RuleKind::ResourceCleanup => cleanup::evaluate(ctx),
            RuleKind::NodeOptimization => nodes::evaluate(ctx),
            RuleKind::StorageOptimization => storage::evaluate(ctx),
            RuleKind::CostOptimization => commitment::evaluate(ctx),
            RuleKind::PerformanceOptimization => performance::evaluate(ctx),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown category `{s}`"))
    }
}

/// Which resource a rightsizing recommendation changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustedResource {
    /// Cores
    Cpu,
    /// Bytes
    Memory,
}

/// Concrete request change proposed by a rightsizing recommendation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceAdjustment {
    pub resource: AdjustedResource,
    pub current: f64,
    pub recommended: f64,
}

impl ResourceAdjustment {
    pub fn reduction(&self) -> f64 {
        self.current - self.recommended
    }
}

/// One explainable cost-optimization recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRecommendation {
    pub category: RuleKind,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    /// Human-readable magnitude of the change
    pub impact: String,
    pub effort: Effort,
    /// Estimated, never authoritative; always >= 0
    pub monthly_savings: f64,
    pub implementation_steps: Vec<String>,
    pub risks: Vec<String>,
    /// `namespace/name` identifiers, node names, or a sentinel
    pub resources_affected: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<ResourceAdjustment>,
}

/// Inputs shared by every rule module
pub struct RuleContext<'a> {
    pub snapshot: &'a ClassifiedSnapshot<'a>,
    pub cost: &'a CostSnapshot,
    pub config: &'a OptimizerConfig,
}

/// Recommendations grouped by category; every category is present, possibly empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recommendations {
    by_category: BTreeMap<RuleKind, Vec<OptimizationRecommendation>>,
}

impl Recommendations {
    pub fn get(&self, kind: RuleKind) -> &[OptimizationRecommendation] {
        self.by_category
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Categories in rule-module order
    pub fn categories(&self) -> impl Iterator<Item = (RuleKind, &[OptimizationRecommendation])> {
        self.by_category
            .iter()
            .map(|(kind, recs)| (*kind, recs.as_slice()))
    }

    /// All recommendations in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &OptimizationRecommendation> {
        self.by_category.values().flatten()
    }

    pub fn total_count(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn high_priority_count(&self) -> usize {
        self.iter().filter(|r| r.priority == Priority::High).count()
    }

    pub fn total_monthly_savings(&self) -> f64 {
        self.iter().map(|r| r.monthly_savings).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }
}

impl Default for Recommendations {
    fn default() -> Self {
        std::iter::empty().collect()
    }
}

impl FromIterator<(RuleKind, Vec<OptimizationRecommendation>)> for Recommendations {
    fn from_iter<I: IntoIterator<Item = (RuleKind, Vec<OptimizationRecommendation>)>>(
        iter: I,
    ) -> Self {
        let mut by_category: BTreeMap<_, _> =
            RuleKind::ALL.into_iter().map(|kind| (kind, Vec::new())).collect();
        for (kind, recs) in iter {
            by_category.entry(kind).or_insert_with(Vec::new).extend(recs);
        }
        Self { by_category }
    }
}

/// Runs the rule modules against a pair of snapshots
pub struct Optimizer {
    config: OptimizerConfig,
}

impl Optimizer {
    pub fn new() -> Self {
        Self {
            config: OptimizerConfig::default(),
        }
    }

    pub fn with_config(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Produce recommendations grouped by category
    pub fn synthesize(
        &self,
        resources: &ResourceSnapshot,
        cost: &CostSnapshot,
    ) -> Recommendations {
        let logger = StructuredLogger::new(resources.cluster_name());
        logger.log_analysis_started(
            resources.nodes.len(),
            resources.workloads.len(),
            resources.volumes.len(),
            resources.endpoints.len(),
            cost.total_cost,
        );

        let classified = ClassifiedSnapshot::new(resources, &self.config.thresholds);
        let ctx = RuleContext {
            snapshot: &classified,
            cost,
            config: &self.config,
        };

        let recommendations: Recommendations = RuleKind::ALL[..]
            .par_iter()
            .map(|kind| {
                let recs = kind.evaluate(&ctx);
                logger.log_rule_evaluated(
                    kind.as_str(),
                    recs.len(),
                    recs.iter().map(|r| r.monthly_savings).sum(),
                );
                (*kind, recs)
            })
            .collect::<Vec<_>>()
            .into_iter()
            .collect();

        logger.log_analysis_completed(
            recommendations.total_count(),
            recommendations.high_priority_count(),
            recommendations.total_monthly_savings(),
        );

        recommendations
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Synthesize with the default configuration
pub fn synthesize(resources: &ResourceSnapshot, cost: &CostSnapshot) -> Recommendations {
    Optimizer::new().synthesize(resources, cost)
}

fn steps(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
