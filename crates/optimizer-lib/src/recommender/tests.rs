//! Scenario tests for the rule modules
//!
//! Each scenario builds a small snapshot pair by hand and checks the
//! emitted recommendations against the published pricing constants.

#[cfg(test)]
mod rule_scenarios {
    use crate::config::{OptimizerConfig, BILLING_ACCOUNT, CLUSTER_WIDE};
    use crate::models::{
        CostSnapshot, EndpointRecord, NodeRecord, ResourceCosts, ResourceQuantities,
        ResourceSnapshot, ResourceUsageRecord, VolumeRecord,
    };
    use crate::quantity::{GIB, MIB};
    use crate::recommender::{
        synthesize, AdjustedResource, Effort, Optimizer, Priority, RuleKind,
    };

    const EPSILON: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn limited(record: ResourceUsageRecord) -> ResourceUsageRecord {
        record.with_limits(2.0, 4 * GIB)
    }

    fn cost(total: f64, compute: f64) -> CostSnapshot {
        CostSnapshot::new(
            total,
            ResourceCosts {
                compute,
                storage: 0.0,
                network: 0.0,
                management: total - compute,
            },
        )
    }

    fn busy_node(name: &str) -> NodeRecord {
        NodeRecord::new(name, ResourceQuantities::new(4.0, 16 * GIB))
            .with_usage(ResourceQuantities::new(3.0, 12 * GIB))
    }

    fn idle_node(name: &str) -> NodeRecord {
        NodeRecord::new(name, ResourceQuantities::new(4.0, 16 * GIB))
            .with_usage(ResourceQuantities::new(0.4, GIB))
    }

    fn only_workloads(workloads: Vec<ResourceUsageRecord>) -> ResourceSnapshot {
        ResourceSnapshot::new(Vec::new(), workloads, Vec::new(), Vec::new())
    }

    #[test]
    fn test_cpu_rightsizing_scenario() {
        // 1.0 core requested, 0.1 used, memory well utilized
        let workload = limited(ResourceUsageRecord::new(
            "api", "prod", 1.0, GIB, 0.1, 900 * MIB,
        ));
        let recs = synthesize(&only_workloads(vec![workload]), &cost(100.0, 80.0));

        let rightsizing = recs.get(RuleKind::Rightsizing);
        assert_eq!(rightsizing.len(), 1);

        let rec = &rightsizing[0];
        let adjustment = rec.adjustment.expect("cpu adjustment");
        assert_eq!(adjustment.resource, AdjustedResource::Cpu);
        assert!((adjustment.recommended - 0.12).abs() < 1e-6);
        assert!((adjustment.reduction() - 0.88).abs() < 1e-6);
        assert_eq!(rec.priority, Priority::High);
        assert_eq!(rec.effort, Effort::Low);
        assert!((rec.monthly_savings - 1.32).abs() < 1e-6);
        assert_eq!(rec.resources_affected, vec!["prod/api".to_string()]);
    }

    #[test]
    fn test_cpu_rightsizing_medium_priority_for_small_reduction() {
        // 0.5 requested, 0.05 used -> recommended 0.06, reduction 0.44
        let workload = limited(ResourceUsageRecord::new(
            "worker", "prod", 0.5, GIB, 0.05, 900 * MIB,
        ));
        let recs = synthesize(&only_workloads(vec![workload]), &cost(100.0, 80.0));

        let rec = &recs.get(RuleKind::Rightsizing)[0];
        assert_eq!(rec.priority, Priority::Medium);
    }

    #[test]
    fn test_memory_rightsizing_scenario() {
        // 2 GiB requested, 256 MiB used, cpu well utilized
        let workload = limited(ResourceUsageRecord::new(
            "cache", "prod", 1.0, 2 * GIB, 0.9, 256 * MIB,
        ));
        let recs = synthesize(&only_workloads(vec![workload]), &cost(100.0, 80.0));

        let rightsizing = recs.get(RuleKind::Rightsizing);
        assert_eq!(rightsizing.len(), 1);

        let rec = &rightsizing[0];
        let adjustment = rec.adjustment.expect("memory adjustment");
        assert_eq!(adjustment.resource, AdjustedResource::Memory);
        assert!((adjustment.recommended - 256.0 * MIB as f64 * 1.3).abs() < 1.0);
        assert_eq!(rec.priority, Priority::High);

        let reduction_gib = (2.0 * GIB as f64 - 256.0 * MIB as f64 * 1.3) / GIB as f64;
        assert!((rec.monthly_savings - reduction_gib * 30.0 * 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_workload_can_yield_cpu_and_memory_recommendations() {
        let workload = limited(ResourceUsageRecord::new(
            "idle", "dev", 2.0, 4 * GIB, 0.1, 128 * MIB,
        ));
        let recs = synthesize(&only_workloads(vec![workload]), &cost(100.0, 80.0));

        let kinds: Vec<_> = recs
            .get(RuleKind::Rightsizing)
            .iter()
            .filter_map(|r| r.adjustment.map(|a| a.resource))
            .collect();
        assert_eq!(kinds, vec![AdjustedResource::Cpu, AdjustedResource::Memory]);
    }

    #[test]
    fn test_minimum_request_workload_is_not_rightsized() {
        let workload = limited(ResourceUsageRecord::new(
            "sidecar", "prod", 0.1, 256 * MIB, 0.01, 10 * MIB,
        ));
        let recs = synthesize(&only_workloads(vec![workload]), &cost(100.0, 80.0));
        assert!(recs.get(RuleKind::Rightsizing).is_empty());
    }

    #[test]
    fn test_rightsizing_never_recommends_an_increase() {
        // Utilization under threshold but the floor sits above the request
        let workload = limited(ResourceUsageRecord::new(
            "tiny", "prod", 0.15, 2 * GIB, 0.0, 1900 * MIB,
        ));
        let mut config = OptimizerConfig::default();
        config.assumptions.min_recommended_cpu_cores = 0.2;
        let recs = Optimizer::with_config(config)
            .synthesize(&only_workloads(vec![workload]), &cost(100.0, 80.0));
        assert!(recs.get(RuleKind::Rightsizing).is_empty());
    }

    #[test]
    fn test_cleanup_groups_unused_volumes_and_endpoints() {
        let resources = ResourceSnapshot::new(
            Vec::new(),
            Vec::new(),
            vec![
                VolumeRecord::new("logs", "prod", 10.0),
                VolumeRecord::new("old-data", "prod", 40.0),
                VolumeRecord::new("db", "prod", 100.0).used_by("db-0"),
            ],
            vec![
                EndpointRecord::new("legacy", "prod", false),
                EndpointRecord::new("staging", "dev", false),
                EndpointRecord::new("web", "prod", true),
            ],
        );
        let recs = synthesize(&resources, &cost(100.0, 80.0));
        let cleanup = recs.get(RuleKind::ResourceCleanup);
        assert_eq!(cleanup.len(), 2);

        let volumes = &cleanup[0];
        assert_eq!(volumes.priority, Priority::High);
        assert!(approx(volumes.monthly_savings, 50.0 * 0.04));
        assert_eq!(
            volumes.resources_affected,
            vec!["prod/logs".to_string(), "prod/old-data".to_string()]
        );

        let endpoints = &cleanup[1];
        assert_eq!(endpoints.priority, Priority::High);
        assert!(approx(endpoints.monthly_savings, 2.0 * 18.25));
        assert_eq!(endpoints.resources_affected.len(), 2);
    }

    #[test]
    fn test_cleanup_empty_without_unused_resources() {
        let resources = ResourceSnapshot::new(
            Vec::new(),
            Vec::new(),
            vec![VolumeRecord::new("db", "prod", 100.0).used_by("db-0")],
            vec![EndpointRecord::new("web", "prod", true)],
        );
        let recs = synthesize(&resources, &cost(100.0, 80.0));
        assert!(recs.get(RuleKind::ResourceCleanup).is_empty());
    }

    #[test]
    fn test_node_consolidation_and_preemptible() {
        let resources = ResourceSnapshot::new(
            vec![
                idle_node("n1"),
                idle_node("n2"),
                busy_node("n3"),
                busy_node("n4"),
            ],
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        let recs = synthesize(&resources, &cost(500.0, 400.0));
        let nodes = recs.get(RuleKind::NodeOptimization);
        assert_eq!(nodes.len(), 2);

        let consolidation = &nodes[0];
        assert_eq!(consolidation.priority, Priority::Medium);
        assert!(approx(consolidation.monthly_savings, 2.0 * 100.0 * 0.5));
        assert_eq!(
            consolidation.resources_affected,
            vec!["n1".to_string(), "n2".to_string()]
        );

        let preemptible = &nodes[1];
        assert_eq!(preemptible.effort, Effort::High);
        assert!(approx(preemptible.monthly_savings, 400.0 * 0.70 * 0.30));
        assert_eq!(preemptible.resources_affected, vec![CLUSTER_WIDE.to_string()]);
    }

    #[test]
    fn test_preemptible_emitted_without_nodes() {
        let recs = synthesize(&only_workloads(Vec::new()), &cost(0.0, 0.0));
        let nodes = recs.get(RuleKind::NodeOptimization);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].monthly_savings, 0.0);
    }

    #[test]
    fn test_ssd_storage_downgrade() {
        let resources = ResourceSnapshot::new(
            Vec::new(),
            Vec::new(),
            vec![
                VolumeRecord::new("db", "prod", 60.0)
                    .with_storage_class("premium-rwo-ssd")
                    .used_by("db-0"),
                VolumeRecord::new("queue", "prod", 40.0)
                    .with_storage_class("fast")
                    .used_by("queue-0"),
                VolumeRecord::new("logs", "prod", 500.0)
                    .with_storage_class("standard")
                    .used_by("logs-0"),
            ],
            Vec::new(),
        );
        let recs = synthesize(&resources, &cost(100.0, 80.0));
        let storage = recs.get(RuleKind::StorageOptimization);
        assert_eq!(storage.len(), 1);
        assert!((storage[0].monthly_savings - 50.0 * (0.17 - 0.04)).abs() < 1e-6);
        assert_eq!(storage[0].resources_affected.len(), 2);
    }

    #[test]
    fn test_commitment_threshold() {
        let resources = only_workloads(Vec::new());

        let recs = synthesize(&resources, &cost(300.0, 200.0));
        assert!(recs.get(RuleKind::CostOptimization).is_empty());

        // Exactly at the threshold is not significant
        let recs = synthesize(&resources, &cost(500.0, 200.0));
        assert!(recs.get(RuleKind::CostOptimization).is_empty());

        let recs = synthesize(&resources, &cost(1000.0, 600.0));
        let commitment = recs.get(RuleKind::CostOptimization);
        assert_eq!(commitment.len(), 1);
        assert!(approx(commitment[0].monthly_savings, 300.0));
        assert_eq!(commitment[0].priority, Priority::High);
        assert_eq!(
            commitment[0].resources_affected,
            vec![BILLING_ACCOUNT.to_string()]
        );
    }

    #[test]
    fn test_missing_limits_fraction() {
        let unlimited =
            |name: &str| ResourceUsageRecord::new(name, "prod", 0.1, 256 * MIB, 0.1, 256 * MIB);

        // 3 of 4 lack limits
        let mut workloads: Vec<_> = ["a", "b", "c"].iter().map(|n| unlimited(*n)).collect();
        workloads.push(limited(unlimited("d")));
        let recs = synthesize(&only_workloads(workloads), &cost(100.0, 80.0));
        let perf = recs.get(RuleKind::PerformanceOptimization);
        assert_eq!(perf.len(), 1);
        assert_eq!(perf[0].monthly_savings, 0.0);
        assert_eq!(perf[0].resources_affected, vec![CLUSTER_WIDE.to_string()]);

        // Exactly 30% does not trigger
        let mut workloads: Vec<_> = ["a", "b", "c"].iter().map(|n| unlimited(*n)).collect();
        workloads.extend((0..7).map(|i| limited(unlimited(&format!("l{i}")))));
        let recs = synthesize(&only_workloads(workloads), &cost(100.0, 80.0));
        assert!(recs.get(RuleKind::PerformanceOptimization).is_empty());
    }

    #[test]
    fn test_best_effort_workloads_not_counted_as_missing_limits() {
        let best_effort =
            |name: &str| ResourceUsageRecord::new(name, "batch", 0.0, 0, 0.0, 0);

        // 1 of 4 counts: only "api" requests CPU
        let mut workloads: Vec<_> = ["a", "b", "c"].iter().map(|n| best_effort(*n)).collect();
        workloads.push(ResourceUsageRecord::new("api", "prod", 0.5, GIB, 0.4, GIB));
        let recs = synthesize(&only_workloads(workloads), &cost(100.0, 80.0));
        assert!(recs.get(RuleKind::PerformanceOptimization).is_empty());
    }

    #[test]
    fn test_no_workloads_no_performance_recommendation() {
        let recs = synthesize(&only_workloads(Vec::new()), &cost(100.0, 80.0));
        assert!(recs.get(RuleKind::PerformanceOptimization).is_empty());
    }

    #[test]
    fn test_every_category_present_and_invariants_hold() {
        let resources = ResourceSnapshot::new(
            vec![idle_node("n1"), busy_node("n2")],
            vec![ResourceUsageRecord::new("api", "prod", 1.0, 2 * GIB, 0.1, 100 * MIB)],
            vec![VolumeRecord::new("ssd", "prod", 20.0).with_storage_class("ssd")],
            vec![EndpointRecord::new("lb", "prod", false)],
        );
        let recs = synthesize(&resources, &cost(2000.0, 1500.0));

        assert_eq!(recs.categories().count(), RuleKind::ALL.len());
        for (kind, items) in recs.categories() {
            for rec in items {
                assert_eq!(rec.category, kind);
                assert!(rec.monthly_savings >= 0.0);
                assert!(!rec.resources_affected.is_empty());
                assert!(!rec.implementation_steps.is_empty());
            }
        }
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let resources = ResourceSnapshot::new(
            vec![idle_node("n1"), idle_node("n2")],
            vec![
                ResourceUsageRecord::new("a", "prod", 1.0, 2 * GIB, 0.1, 100 * MIB),
                ResourceUsageRecord::new("b", "prod", 2.0, 4 * GIB, 0.2, 200 * MIB),
            ],
            vec![VolumeRecord::new("v", "prod", 10.0)],
            vec![EndpointRecord::new("lb", "prod", false)],
        );
        let ledger = cost(1200.0, 900.0);

        let first = synthesize(&resources, &ledger);
        for _ in 0..5 {
            assert_eq!(synthesize(&resources, &ledger), first);
        }
    }

    #[test]
    fn test_category_serialization_keys() {
        let recs = synthesize(&only_workloads(Vec::new()), &cost(0.0, 0.0));
        let value = serde_json::to_value(&recs).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), RuleKind::ALL.len());
        for kind in RuleKind::ALL {
            assert!(object[kind.as_str()].as_array().unwrap().len() <= 1);
        }
    }
}
