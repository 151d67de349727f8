//! Cost optimization core for Kubernetes clusters
//!
//! This crate provides the core functionality for:
//! - Snapshot models and Kubernetes quantity parsing
//! - Utilization classification of workloads and nodes
//! - Rule-based recommendation synthesis
//! - Implementation roadmap and risk assessment
//! - Report assembly and structured logging
//!
//! Every operation is a pure function of a [`ResourceSnapshot`] and a
//! [`CostSnapshot`]; fetching those snapshots is left to the caller.

pub mod classifier;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod quantity;
pub mod recommender;
pub mod report;
pub mod risk;
pub mod roadmap;

pub use classifier::{ClassifiedSnapshot, MetricsSummary, NodeClassification, WorkloadClassification};
pub use config::{Assumptions, OptimizerConfig, Pricing, Thresholds};
pub use error::{ConfigError, SnapshotError};
pub use models::*;
pub use observability::StructuredLogger;
pub use recommender::{
    synthesize, Effort, OptimizationRecommendation, Optimizer, Priority, Recommendations,
    RuleKind,
};
pub use report::{build_report, ExecutiveSummary, OptimizationReport, SavingsProjection};
pub use risk::{RiskAssessment, RiskLevel, RiskProfile};
pub use roadmap::{build_roadmap, Phase, Roadmap, RoadmapItem};
