//! Structured logging for optimization runs
//!
//! Every event carries an `event` field and the cluster name so runs can be
//! filtered in JSON log output.

use tracing::{debug, info, warn};

/// Emits structured tracing events scoped to one cluster
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    cluster_name: String,
}

impl StructuredLogger {
    pub fn new(cluster_name: impl Into<String>) -> Self {
        Self {
            cluster_name: cluster_name.into(),
        }
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    /// Log the start of an analysis run
    pub fn log_analysis_started(
        &self,
        nodes: usize,
        workloads: usize,
        volumes: usize,
        endpoints: usize,
        total_cost: f64,
    ) {
        info!(
            event = "analysis_started",
            cluster = %self.cluster_name,
            nodes = nodes,
            workloads = workloads,
            volumes = volumes,
            endpoints = endpoints,
            total_cost = total_cost,
            "Starting cost optimization analysis"
        );
    }

    /// Log the outcome of a single rule module
    pub fn log_rule_evaluated(&self, rule: &str, recommendations: usize, monthly_savings: f64) {
        debug!(
            event = "rule_evaluated",
            cluster = %self.cluster_name,
            rule = %rule,
            recommendations = recommendations,
            monthly_savings = monthly_savings,
            "Rule module evaluated"
        );
    }

    pub fn log_analysis_completed(
        &self,
        recommendations: usize,
        high_priority: usize,
        monthly_savings: f64,
    ) {
        if recommendations == 0 {
            warn!(
                event = "analysis_completed",
                cluster = %self.cluster_name,
                recommendations = 0,
                "Analysis produced no recommendations"
            );
        } else {
            info!(
                event = "analysis_completed",
                cluster = %self.cluster_name,
                recommendations = recommendations,
                high_priority = high_priority,
                monthly_savings = monthly_savings,
                "Cost optimization analysis finished"
            );
        }
    }

    /// Log report composition
    pub fn log_report_generated(&self, total_cost: f64, savings_percentage: f64) {
        info!(
            event = "report_generated",
            cluster = %self.cluster_name,
            total_cost = total_cost,
            savings_percentage = savings_percentage,
            "Optimization report generated"
        );
    }
}
