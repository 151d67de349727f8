//! Utilization classification
//!
//! Turns raw request/usage figures into utilization percentages and labels
//! workloads and nodes as under-utilized against the configured thresholds.

use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::models::{NodeRecord, ResourceSnapshot, ResourceUsageRecord};

/// Workloads below this CPU or memory utilization count as an opportunity
/// in the cluster summary.
const OPPORTUNITY_UTILIZATION_PERCENT: f64 = 20.0;

/// `usage / request * 100`, or 0 when nothing is requested
pub fn utilization_percent(usage: f64, request: f64) -> f64 {
    if request > 0.0 {
        usage / request * 100.0
    } else {
        0.0
    }
}

/// Utilization verdict for one workload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkloadClassification {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    /// Below the CPU threshold with a request worth resizing
    pub cpu_underutilized: bool,
    /// Below the memory threshold with a request worth resizing
    pub memory_underutilized: bool,
}

impl WorkloadClassification {
    pub fn classify(workload: &ResourceUsageRecord, thresholds: &Thresholds) -> Self {
        let cpu_percent = workload.cpu_utilization();
        let memory_percent = workload.memory_utilization();

        Self {
            cpu_percent,
            memory_percent,
            cpu_underutilized: cpu_percent < thresholds.cpu_underutilization_percent
                && workload.cpu_request > thresholds.min_cpu_request_cores,
            memory_underutilized: memory_percent < thresholds.memory_underutilization_percent
                && workload.memory_request > thresholds.min_memory_request_bytes,
        }
    }
}

/// Utilization verdict for one node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeClassification {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    /// Both CPU and memory below the node threshold
    pub underutilized: bool,
}

impl NodeClassification {
    pub fn classify(node: &NodeRecord, thresholds: &Thresholds) -> Self {
        let usage = node.usage.unwrap_or_default();
        let cpu_percent = node
            .cpu_utilization
            .unwrap_or_else(|| utilization_percent(usage.cpu, node.allocatable.cpu));
        let memory_percent = node.memory_utilization.unwrap_or_else(|| {
            utilization_percent(usage.memory as f64, node.allocatable.memory as f64)
        });

        Self {
            cpu_percent,
            memory_percent,
            underutilized: cpu_percent < thresholds.node_underutilization_percent
                && memory_percent < thresholds.node_underutilization_percent,
        }
    }
}

/// A resource snapshot with per-entity verdicts, index-aligned with the input
#[derive(Debug)]
pub struct ClassifiedSnapshot<'a> {
    pub resources: &'a ResourceSnapshot,
    pub workloads: Vec<WorkloadClassification>,
    pub nodes: Vec<NodeClassification>,
}

impl<'a> ClassifiedSnapshot<'a> {
    pub fn new(resources: &'a ResourceSnapshot, thresholds: &Thresholds) -> Self {
        Self {
            resources,
            workloads: resources
                .workloads
                .iter()
                .map(|w| WorkloadClassification::classify(w, thresholds))
                .collect(),
            nodes: resources
                .nodes
                .iter()
                .map(|n| NodeClassification::classify(n, thresholds))
                .collect(),
        }
    }

    /// Workloads paired with their verdicts
    pub fn workload_pairs(
        &self,
    ) -> impl Iterator<Item = (&'a ResourceUsageRecord, &WorkloadClassification)> {
        self.resources.workloads.iter().zip(self.workloads.iter())
    }

    /// Nodes paired with their verdicts
    pub fn node_pairs(&self) -> impl Iterator<Item = (&'a NodeRecord, &NodeClassification)> {
        self.resources.nodes.iter().zip(self.nodes.iter())
    }
}

/// Cluster-wide counts and averages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_nodes: usize,
    pub total_workloads: usize,
    pub unused_volumes: usize,
    pub unused_endpoints: usize,
    pub average_cpu_utilization: f64,
    pub average_memory_utilization: f64,
    pub optimization_opportunities: usize,
}

impl MetricsSummary {
    pub fn from_snapshot(snapshot: &ResourceSnapshot) -> Self {
        let workloads = &snapshot.workloads;
        let unused_volumes = snapshot.volumes.iter().filter(|v| v.is_unused()).count();
        let unused_endpoints = snapshot.endpoints.iter().filter(|e| e.is_unused()).count();

        let (average_cpu_utilization, average_memory_utilization) = if workloads.is_empty() {
            (0.0, 0.0)
        } else {
            let n = workloads.len() as f64;
            (
                workloads.iter().map(|w| w.cpu_utilization()).sum::<f64>() / n,
                workloads.iter().map(|w| w.memory_utilization()).sum::<f64>() / n,
            )
        };

        let low_utilization = workloads
            .iter()
            .filter(|w| {
                w.cpu_utilization() < OPPORTUNITY_UTILIZATION_PERCENT
                    || w.memory_utilization() < OPPORTUNITY_UTILIZATION_PERCENT
            })
            .count();

        Self {
            total_nodes: snapshot.nodes.len(),
            total_workloads: workloads.len(),
            unused_volumes,
            unused_endpoints,
            average_cpu_utilization,
            average_memory_utilization,
            optimization_opportunities: unused_volumes + unused_endpoints + low_utilization,
        }
    }
}
