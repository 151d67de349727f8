//! Optimizer configuration
//!
//! Thresholds, unit prices and estimation assumptions used by the rule
//! modules. Every field has a default so partial config files and
//! environment overrides work.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::quantity::MIB;

/// CPU utilization (percent of request) below which a workload is over-provisioned
pub const CPU_UNDERUTILIZATION_PERCENT: f64 = 20.0;
/// Memory utilization (percent of request) below which a workload is over-provisioned
pub const MEMORY_UNDERUTILIZATION_PERCENT: f64 = 30.0;
/// Node utilization below which both CPU and memory count as idle
pub const NODE_UNDERUTILIZATION_PERCENT: f64 = 40.0;
/// Monthly spend above which committed-use discounts are worth proposing
pub const SIGNIFICANT_MONTHLY_SPEND: f64 = 500.0;

/// Sentinel for recommendations that apply to the whole cluster
pub const CLUSTER_WIDE: &str = "cluster-wide";
/// Sentinel for recommendations that apply at the billing level
pub const BILLING_ACCOUNT: &str = "billing-account";

/// Classification thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub cpu_underutilization_percent: f64,
    pub memory_underutilization_percent: f64,
    pub node_underutilization_percent: f64,
    /// Workloads requesting this many cores or fewer are not rightsized
    pub min_cpu_request_cores: f64,
    /// Workloads requesting this many bytes or fewer are not rightsized
    pub min_memory_request_bytes: u64,
    pub significant_monthly_spend: f64,
    /// Share of workloads without limits that triggers the limits recommendation
    pub missing_limits_fraction: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu_underutilization_percent: CPU_UNDERUTILIZATION_PERCENT,
            memory_underutilization_percent: MEMORY_UNDERUTILIZATION_PERCENT,
            node_underutilization_percent: NODE_UNDERUTILIZATION_PERCENT,
            min_cpu_request_cores: 0.1,
            min_memory_request_bytes: 256 * MIB,
            significant_monthly_spend: SIGNIFICANT_MONTHLY_SPEND,
            missing_limits_fraction: 0.30,
        }
    }
}

/// Unit prices in the billing currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pricing {
    pub cpu_core_hour: f64,
    pub memory_gb_hour: f64,
    pub standard_disk_gb_month: f64,
    pub ssd_disk_gb_month: f64,
    pub load_balancer_month: f64,
    /// Multiplier turning an hourly rate into the monthly rightsizing estimate
    pub billing_days: f64,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            cpu_core_hour: 0.05,
            memory_gb_hour: 0.01,
            standard_disk_gb_month: 0.04,
            ssd_disk_gb_month: 0.17,
            load_balancer_month: 18.25,
            billing_days: 30.0,
        }
    }
}

/// Estimation assumptions without an observed basis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    /// Headroom multiplier over observed CPU usage
    pub cpu_buffer: f64,
    /// Headroom multiplier over observed memory usage
    pub memory_buffer: f64,
    pub min_recommended_cpu_cores: f64,
    pub min_recommended_memory_bytes: u64,
    /// Share of an idle node's cost recovered by consolidation
    pub consolidation_savings_fraction: f64,
    /// Discount of preemptible/spot capacity over on-demand
    pub preemptible_discount: f64,
    /// Share of compute spend assumed eligible for preemptible capacity
    pub preemptible_eligible_fraction: f64,
    pub committed_use_discount: f64,
    /// Share of SSD capacity assumed movable to standard disk
    pub ssd_migratable_fraction: f64,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            cpu_buffer: 1.2,
            memory_buffer: 1.3,
            min_recommended_cpu_cores: 0.05,
            min_recommended_memory_bytes: 128 * MIB,
            consolidation_savings_fraction: 0.5,
            preemptible_discount: 0.70,
            preemptible_eligible_fraction: 0.30,
            committed_use_discount: 0.30,
            ssd_migratable_fraction: 0.5,
        }
    }
}

/// Complete optimizer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub thresholds: Thresholds,
    pub pricing: Pricing,
    pub assumptions: Assumptions,
}

impl OptimizerConfig {
    /// Reject values that would make estimates negative or meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        non_negative("thresholds.cpu_underutilization_percent", t.cpu_underutilization_percent)?;
        non_negative(
            "thresholds.memory_underutilization_percent",
            t.memory_underutilization_percent,
        )?;
        non_negative("thresholds.node_underutilization_percent", t.node_underutilization_percent)?;
        non_negative("thresholds.min_cpu_request_cores", t.min_cpu_request_cores)?;
        non_negative("thresholds.significant_monthly_spend", t.significant_monthly_spend)?;
        fraction("thresholds.missing_limits_fraction", t.missing_limits_fraction)?;

        let p = &self.pricing;
        non_negative("pricing.cpu_core_hour", p.cpu_core_hour)?;
        non_negative("pricing.memory_gb_hour", p.memory_gb_hour)?;
        non_negative("pricing.standard_disk_gb_month", p.standard_disk_gb_month)?;
        non_negative("pricing.ssd_disk_gb_month", p.ssd_disk_gb_month)?;
        non_negative("pricing.load_balancer_month", p.load_balancer_month)?;
        non_negative("pricing.billing_days", p.billing_days)?;

        let a = &self.assumptions;
        buffer("assumptions.cpu_buffer", a.cpu_buffer)?;
        buffer("assumptions.memory_buffer", a.memory_buffer)?;
        non_negative("assumptions.min_recommended_cpu_cores", a.min_recommended_cpu_cores)?;
        fraction(
            "assumptions.consolidation_savings_fraction",
            a.consolidation_savings_fraction,
        )?;
        fraction("assumptions.preemptible_discount", a.preemptible_discount)?;
        fraction(
            "assumptions.preemptible_eligible_fraction",
            a.preemptible_eligible_fraction,
        )?;
        fraction("assumptions.committed_use_discount", a.committed_use_discount)?;
        fraction("assumptions.ssd_migratable_fraction", a.ssd_migratable_fraction)?;

        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotNonNegative { field, value })
    }
}

fn fraction(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::FractionOutOfRange { field, value })
    }
}

fn buffer(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::BufferBelowOne { field, value })
    }
}
