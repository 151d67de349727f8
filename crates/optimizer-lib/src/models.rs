//! Snapshot data models
//!
//! Point-in-time views of cluster inventory and billing, as handed over by the
//! collectors. Both snapshots are validated once at construction and never
//! mutated afterwards.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::classifier;
use crate::error::SnapshotError;
use crate::quantity::de;

/// Requested vs observed resources for one workload unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsageRecord {
    pub name: String,
    pub namespace: String,
    /// Requested CPU in cores
    #[serde(default, deserialize_with = "de::cpu")]
    pub cpu_request: f64,
    /// Requested memory in bytes
    #[serde(default, deserialize_with = "de::memory")]
    pub memory_request: u64,
    /// Observed CPU in cores
    #[serde(default, deserialize_with = "de::cpu")]
    pub cpu_usage: f64,
    /// Observed memory in bytes
    #[serde(default, deserialize_with = "de::memory")]
    pub memory_usage: u64,
    #[serde(default, deserialize_with = "de::optional_cpu")]
    pub cpu_limit: Option<f64>,
    #[serde(default, deserialize_with = "de::optional_memory")]
    pub memory_limit: Option<u64>,
}

impl ResourceUsageRecord {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        cpu_request: f64,
        memory_request: u64,
        cpu_usage: f64,
        memory_usage: u64,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            cpu_request,
            memory_request,
            cpu_usage,
            memory_usage,
            cpu_limit: None,
            memory_limit: None,
        }
    }

    pub fn with_limits(mut self, cpu_limit: f64, memory_limit: u64) -> Self {
        self.cpu_limit = Some(cpu_limit);
        self.memory_limit = Some(memory_limit);
        self
    }

    /// `namespace/name`
    pub fn identifier(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// CPU usage as a percentage of the request (0 when nothing is requested)
    pub fn cpu_utilization(&self) -> f64 {
        classifier::utilization_percent(self.cpu_usage, self.cpu_request)
    }

    /// Memory usage as a percentage of the request (0 when nothing is requested)
    pub fn memory_utilization(&self) -> f64 {
        classifier::utilization_percent(self.memory_usage as f64, self.memory_request as f64)
    }

    /// True when a workload with a CPU request leaves either limit unset
    ///
    /// Best-effort workloads (no CPU request) are not counted.
    pub fn lacks_limits(&self) -> bool {
        self.cpu_request > 0.0 && (self.cpu_limit.is_none() || self.memory_limit.is_none())
    }
}

/// CPU cores and memory bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceQuantities {
    #[serde(default, deserialize_with = "de::cpu")]
    pub cpu: f64,
    #[serde(default, deserialize_with = "de::memory")]
    pub memory: u64,
}

impl ResourceQuantities {
    pub fn new(cpu: f64, memory: u64) -> Self {
        Self { cpu, memory }
    }
}

/// A cluster host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    #[serde(default = "unknown")]
    pub zone: String,
    #[serde(default = "unknown")]
    pub machine_type: String,
    #[serde(default)]
    pub capacity: ResourceQuantities,
    #[serde(default)]
    pub allocatable: ResourceQuantities,
    /// Observed usage; absent when the metrics pipeline had nothing for the node
    #[serde(default)]
    pub usage: Option<ResourceQuantities>,
    /// Utilization reported by the collector, preferred over the derived value
    #[serde(default)]
    pub cpu_utilization: Option<f64>,
    #[serde(default)]
    pub memory_utilization: Option<f64>,
    #[serde(default)]
    pub pods_count: u32,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

impl NodeRecord {
    pub fn new(name: impl Into<String>, allocatable: ResourceQuantities) -> Self {
        Self {
            name: name.into(),
            zone: unknown(),
            machine_type: unknown(),
            capacity: allocatable,
            allocatable,
            usage: None,
            cpu_utilization: None,
            memory_utilization: None,
            pods_count: 0,
            created: None,
        }
    }

    pub fn with_usage(mut self, usage: ResourceQuantities) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// A persistent volume claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeRecord {
    pub name: String,
    pub namespace: String,
    /// Requested size in GB
    #[serde(default, rename = "size", deserialize_with = "de::storage_gb")]
    pub size_gb: f64,
    #[serde(default)]
    pub storage_class: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Workloads mounting this claim
    #[serde(default)]
    pub used_by_pods: Vec<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

impl VolumeRecord {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, size_gb: f64) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            size_gb,
            storage_class: None,
            status: None,
            used_by_pods: Vec::new(),
            created: None,
        }
    }

    pub fn with_storage_class(mut self, class: impl Into<String>) -> Self {
        self.storage_class = Some(class.into());
        self
    }

    pub fn used_by(mut self, pod: impl Into<String>) -> Self {
        self.used_by_pods.push(pod.into());
        self
    }

    pub fn identifier(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    pub fn is_unused(&self) -> bool {
        self.used_by_pods.is_empty()
    }

    /// SSD-backed classes (`fast`, anything mentioning `ssd`)
    pub fn is_high_performance(&self) -> bool {
        self.storage_class
            .as_deref()
            .map(|class| class == "fast" || class.to_ascii_lowercase().contains("ssd"))
            .unwrap_or(false)
    }
}

/// A load-balanced network front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointRecord {
    pub name: String,
    pub namespace: String,
    #[serde(default = "load_balancer")]
    pub service_type: String,
    #[serde(default)]
    pub external_ip: Option<String>,
    #[serde(default)]
    pub has_endpoints: bool,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

impl EndpointRecord {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, has_endpoints: bool) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            service_type: load_balancer(),
            external_ip: None,
            has_endpoints,
            created: None,
        }
    }

    pub fn identifier(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    pub fn is_unused(&self) -> bool {
        !self.has_endpoints
    }
}

/// Cluster-level facts reported alongside the inventory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kubernetes_version: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub machine_type: Option<String>,
    #[serde(default)]
    pub node_count: Option<u32>,
}

/// Resource inventory observed at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawResourceSnapshot")]
pub struct ResourceSnapshot {
    pub timestamp: Option<DateTime<Utc>>,
    pub cluster: ClusterInfo,
    pub nodes: Vec<NodeRecord>,
    pub workloads: Vec<ResourceUsageRecord>,
    pub volumes: Vec<VolumeRecord>,
    pub endpoints: Vec<EndpointRecord>,
}

/// Collector output before the required sections are checked
#[derive(Debug, Deserialize)]
pub struct RawResourceSnapshot {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cluster: Option<ClusterInfo>,
    pub nodes: Option<Vec<NodeRecord>>,
    pub workloads: Option<Vec<ResourceUsageRecord>>,
    pub volumes: Option<Vec<VolumeRecord>>,
    pub endpoints: Option<Vec<EndpointRecord>>,
}

impl TryFrom<RawResourceSnapshot> for ResourceSnapshot {
    type Error = SnapshotError;

    fn try_from(raw: RawResourceSnapshot) -> Result<Self, Self::Error> {
        let missing = |section| SnapshotError::MissingSection {
            snapshot: "resource",
            section,
        };

        Ok(Self {
            timestamp: raw.timestamp,
            cluster: raw.cluster.unwrap_or_default(),
            nodes: raw.nodes.ok_or_else(|| missing("nodes"))?,
            workloads: raw.workloads.ok_or_else(|| missing("workloads"))?,
            volumes: raw.volumes.ok_or_else(|| missing("volumes"))?,
            endpoints: raw.endpoints.ok_or_else(|| missing("endpoints"))?,
        })
    }
}

impl ResourceSnapshot {
    pub fn new(
        nodes: Vec<NodeRecord>,
        workloads: Vec<ResourceUsageRecord>,
        volumes: Vec<VolumeRecord>,
        endpoints: Vec<EndpointRecord>,
    ) -> Self {
        Self {
            timestamp: None,
            cluster: ClusterInfo::default(),
            nodes,
            workloads,
            volumes,
            endpoints,
        }
    }

    /// Decode and validate collector JSON
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let raw: RawResourceSnapshot = serde_json::from_str(json)?;
        raw.try_into()
    }

    pub fn cluster_name(&self) -> &str {
        self.cluster.name.as_deref().unwrap_or("unknown")
    }
}

/// Reporting window of a cost snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub days: u32,
}

/// Spend attributed to one billing service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCost {
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<IndexMap<String, f64>>,
}

/// Spend per resource category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceCosts {
    #[serde(default)]
    pub compute: f64,
    #[serde(default)]
    pub storage: f64,
    #[serde(default)]
    pub network: f64,
    #[serde(default)]
    pub management: f64,
}

impl ResourceCosts {
    pub fn total(&self) -> f64 {
        self.compute + self.storage + self.network + self.management
    }
}

/// Change versus the previous period, in percent
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostTrends {
    #[serde(default)]
    pub total_change_percent: f64,
    #[serde(default)]
    pub compute_trend: f64,
    #[serde(default)]
    pub storage_trend: f64,
    #[serde(default)]
    pub network_trend: f64,
}

/// Spend on a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCost {
    pub date: String,
    pub cost: f64,
}

/// Billing state for the reporting window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCostSnapshot")]
pub struct CostSnapshot {
    pub period: Option<ReportingPeriod>,
    pub currency: String,
    pub total_cost: f64,
    pub daily_costs: Vec<DailyCost>,
    pub service_breakdown: IndexMap<String, ServiceCost>,
    pub resource_costs: ResourceCosts,
    pub cost_trends: CostTrends,
}

/// Billing export before validation
#[derive(Debug, Deserialize)]
pub struct RawCostSnapshot {
    #[serde(default)]
    pub period: Option<ReportingPeriod>,
    #[serde(default)]
    pub currency: Option<String>,
    pub total_cost: Option<f64>,
    #[serde(default)]
    pub daily_costs: Vec<DailyCost>,
    #[serde(default)]
    pub service_breakdown: IndexMap<String, ServiceCost>,
    pub resource_costs: Option<ResourceCosts>,
    #[serde(default)]
    pub cost_trends: CostTrends,
}

/// Allowed gap between the category sum and the total before it is flagged
const CATEGORY_SUM_TOLERANCE: f64 = 0.01;

impl TryFrom<RawCostSnapshot> for CostSnapshot {
    type Error = SnapshotError;

    fn try_from(raw: RawCostSnapshot) -> Result<Self, Self::Error> {
        let missing = |section| SnapshotError::MissingSection {
            snapshot: "cost",
            section,
        };

        let total_cost = raw.total_cost.ok_or_else(|| missing("total_cost"))?;
        let raw_costs = raw.resource_costs.ok_or_else(|| missing("resource_costs"))?;

        let total_cost = check_amount("total_cost", total_cost)?;
        let resource_costs = ResourceCosts {
            compute: check_amount("resource_costs.compute", raw_costs.compute)?,
            storage: check_amount("resource_costs.storage", raw_costs.storage)?,
            network: check_amount("resource_costs.network", raw_costs.network)?,
            management: check_amount("resource_costs.management", raw_costs.management)?,
        };
        let mut service_breakdown = raw.service_breakdown;
        for (service, detail) in service_breakdown.iter_mut() {
            detail.cost =
                check_amount(&format!("service_breakdown.{service}.cost"), detail.cost)?;
        }

        let category_sum = resource_costs.total();
        if total_cost > 0.0 && ((category_sum - total_cost) / total_cost).abs() > CATEGORY_SUM_TOLERANCE
        {
            warn!(
                event = "snapshot_cost_mismatch",
                total_cost = total_cost,
                category_sum = category_sum,
                "Resource category costs do not add up to the total"
            );
        }

        Ok(Self {
            period: raw.period,
            currency: raw.currency.unwrap_or_else(|| "USD".to_string()),
            total_cost,
            daily_costs: raw.daily_costs,
            service_breakdown,
            resource_costs,
            cost_trends: raw.cost_trends,
        })
    }
}

/// Reject negative amounts; `-0.0` comes back as `0.0`
fn check_amount(field: &str, value: f64) -> Result<f64, SnapshotError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value.abs())
    } else {
        Err(SnapshotError::NegativeAmount {
            field: field.to_string(),
            value,
        })
    }
}

impl CostSnapshot {
    pub fn new(total_cost: f64, resource_costs: ResourceCosts) -> Self {
        Self {
            period: None,
            currency: "USD".to_string(),
            total_cost,
            daily_costs: Vec::new(),
            service_breakdown: IndexMap::new(),
            resource_costs,
            cost_trends: CostTrends::default(),
        }
    }

    pub fn with_service(mut self, service: impl Into<String>, cost: f64, percentage: f64) -> Self {
        self.service_breakdown.insert(
            service.into(),
            ServiceCost {
                cost,
                percentage,
                details: None,
            },
        );
        self
    }

    /// Decode and validate a billing export
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let raw: RawCostSnapshot = serde_json::from_str(json)?;
        raw.try_into()
    }
}

fn unknown() -> String {
    "unknown".to_string()
}

fn load_balancer() -> String {
    "LoadBalancer".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::{GIB, MIB};

    const RESOURCES: &str = r#"{
        "cluster": {"name": "prod", "kubernetes_version": "1.29"},
        "nodes": [{"name": "node-a", "allocatable": {"cpu": "3920m", "memory": "12Gi"}}],
        "workloads": [{"name": "api", "namespace": "web", "cpu_request": "500m",
                       "memory_request": "1Gi", "cpu_usage": 0.05}],
        "volumes": [{"name": "data", "namespace": "db", "size": "20Gi",
                     "storage_class": "premium-rwo", "used_by_pods": ["db-0"]}],
        "endpoints": [{"name": "lb", "namespace": "web"}]
    }"#;

    #[test]
    fn test_resource_snapshot_from_json() {
        let snapshot = ResourceSnapshot::from_json(RESOURCES).unwrap();
        assert_eq!(snapshot.cluster_name(), "prod");
        assert_eq!(snapshot.nodes[0].allocatable.cpu, 3.92);
        assert_eq!(snapshot.nodes[0].allocatable.memory, 12 * GIB);
        assert!(snapshot.nodes[0].usage.is_none());

        let api = &snapshot.workloads[0];
        assert_eq!(api.cpu_request, 0.5);
        assert_eq!(api.memory_request, GIB);
        assert_eq!(api.memory_usage, 0);
        assert!(api.lacks_limits());

        assert_eq!(snapshot.volumes[0].size_gb, 20.0);
        assert!(!snapshot.volumes[0].is_unused());
        assert!(snapshot.endpoints[0].is_unused());
    }

    #[test]
    fn test_missing_section_is_construction_error() {
        let err = ResourceSnapshot::from_json(r#"{"nodes": [], "workloads": [], "volumes": []}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::MissingSection {
                snapshot: "resource",
                section: "endpoints"
            }
        ));
    }

    #[test]
    fn test_empty_sections_are_valid() {
        let snapshot = ResourceSnapshot::from_json(
            r#"{"nodes": [], "workloads": [], "volumes": [], "endpoints": []}"#,
        )
        .unwrap();
        assert!(snapshot.nodes.is_empty());
        assert_eq!(snapshot.cluster_name(), "unknown");
    }

    #[test]
    fn test_lacks_limits_ignores_best_effort() {
        let best_effort = ResourceUsageRecord::new("job", "batch", 0.0, 0, 0.0, 0);
        assert!(!best_effort.lacks_limits());

        let requested = ResourceUsageRecord::new("api", "web", 0.5, GIB, 0.1, MIB);
        assert!(requested.lacks_limits());
        assert!(!requested.with_limits(1.0, 2 * GIB).lacks_limits());
    }

    #[test]
    fn test_workload_utilization_guards_zero_request() {
        let idle = ResourceUsageRecord::new("idle", "ns", 0.0, 0, 0.3, 10 * MIB);
        assert_eq!(idle.cpu_utilization(), 0.0);
        assert_eq!(idle.memory_utilization(), 0.0);

        let busy = ResourceUsageRecord::new("busy", "ns", 2.0, 4 * GIB, 1.0, GIB);
        assert_eq!(busy.cpu_utilization(), 50.0);
        assert_eq!(busy.memory_utilization(), 25.0);
    }

    #[test]
    fn test_high_performance_storage_detection() {
        assert!(VolumeRecord::new("a", "ns", 1.0).with_storage_class("fast").is_high_performance());
        assert!(VolumeRecord::new("b", "ns", 1.0)
            .with_storage_class("premium-SSD")
            .is_high_performance());
        assert!(!VolumeRecord::new("c", "ns", 1.0)
            .with_storage_class("standard")
            .is_high_performance());
        assert!(!VolumeRecord::new("d", "ns", 1.0).is_high_performance());
    }

    #[test]
    fn test_cost_snapshot_requires_totals() {
        let err = CostSnapshot::from_json(r#"{"resource_costs": {"compute": 1.0}}"#).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::MissingSection {
                snapshot: "cost",
                section: "total_cost"
            }
        ));

        let err = CostSnapshot::from_json(r#"{"total_cost": 10.0}"#).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::MissingSection {
                section: "resource_costs",
                ..
            }
        ));
    }

    #[test]
    fn test_cost_snapshot_rejects_negative_amounts() {
        let err = CostSnapshot::from_json(
            r#"{"total_cost": 10.0, "resource_costs": {"compute": -1.0}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SnapshotError::NegativeAmount { .. }));
    }

    #[test]
    fn test_cost_snapshot_folds_negative_zero() {
        let cost = CostSnapshot::from_json(
            r#"{
                "total_cost": -0.0,
                "resource_costs": {"compute": -0.0},
                "service_breakdown": {"A": {"cost": -0.0}}
            }"#,
        )
        .unwrap();
        assert!(cost.total_cost.is_sign_positive());
        assert!(cost.resource_costs.compute.is_sign_positive());
        assert!(cost.service_breakdown["A"].cost.is_sign_positive());
    }

    #[test]
    fn test_cost_snapshot_preserves_service_order() {
        let cost = CostSnapshot::from_json(
            r#"{
                "total_cost": 100.0,
                "resource_costs": {"compute": 60.0, "storage": 20.0, "network": 15.0, "management": 5.0},
                "service_breakdown": {
                    "Network": {"cost": 15.0, "percentage": 15.0},
                    "Compute Engine": {"cost": 60.0, "percentage": 60.0},
                    "Persistent Disk": {"cost": 20.0, "percentage": 20.0}
                }
            }"#,
        )
        .unwrap();

        let keys: Vec<_> = cost.service_breakdown.keys().cloned().collect();
        assert_eq!(keys, vec!["Network", "Compute Engine", "Persistent Disk"]);
        assert_eq!(cost.currency, "USD");
        assert_eq!(cost.resource_costs.total(), 100.0);
    }

    #[test]
    fn test_serde_try_from_roundtrip() {
        let snapshot = ResourceSnapshot::from_json(RESOURCES).unwrap();
        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: ResourceSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, snapshot);
    }
}
