//! Implementation roadmap
//!
//! Partitions recommendations into three phases by priority and effort and
//! orders each phase by savings.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::recommender::{Effort, OptimizationRecommendation, Priority, Recommendations, RuleKind};

/// Lightweight summary of a recommendation inside a roadmap phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapItem {
    pub title: String,
    pub category: RuleKind,
    pub savings: f64,
    pub effort: Effort,
}

impl From<&OptimizationRecommendation> for RoadmapItem {
    fn from(rec: &OptimizationRecommendation) -> Self {
        Self {
            title: rec.title.clone(),
            category: rec.category,
            savings: rec.monthly_savings,
            effort: rec.effort,
        }
    }
}

/// Roadmap phase a recommendation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// High priority, low effort
    Immediate,
    /// High priority, medium effort
    ShortTerm,
    LongTerm,
}

impl Phase {
    pub fn of(priority: Priority, effort: Effort) -> Self {
        match (priority, effort) {
            (Priority::High, Effort::Low) => Phase::Immediate,
            (Priority::High, Effort::Medium) => Phase::ShortTerm,
            _ => Phase::LongTerm,
        }
    }
}

/// Three disjoint phases; every recommendation lands in exactly one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    pub immediate: Vec<RoadmapItem>,
    pub short_term: Vec<RoadmapItem>,
    pub long_term: Vec<RoadmapItem>,
}

impl Roadmap {
    pub fn phase(&self, phase: Phase) -> &[RoadmapItem] {
        match phase {
            Phase::Immediate => &self.immediate,
            Phase::ShortTerm => &self.short_term,
            Phase::LongTerm => &self.long_term,
        }
    }

    pub fn len(&self) -> usize {
        self.immediate.len() + self.short_term.len() + self.long_term.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the roadmap from recommendations in discovery order
pub fn build_roadmap(recommendations: &Recommendations) -> Roadmap {
    let mut roadmap = Roadmap::default();

    for rec in recommendations.iter() {
        let bucket = match Phase::of(rec.priority, rec.effort) {
            Phase::Immediate => &mut roadmap.immediate,
            Phase::ShortTerm => &mut roadmap.short_term,
            Phase::LongTerm => &mut roadmap.long_term,
        };
        bucket.push(RoadmapItem::from(rec));
    }

    // sort_by is stable, so ties keep discovery order; 0.0 and -0.0 tie
    for bucket in [
        &mut roadmap.immediate,
        &mut roadmap.short_term,
        &mut roadmap.long_term,
    ] {
        bucket.sort_by(|a, b| {
            b.savings
                .partial_cmp(&a.savings)
                .unwrap_or(Ordering::Equal)
        });
    }

    roadmap
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(
        category: RuleKind,
        title: &str,
        priority: Priority,
        effort: Effort,
        savings: f64,
    ) -> (RuleKind, OptimizationRecommendation) {
        (
            category,
            OptimizationRecommendation {
                category,
                priority,
                title: title.to_string(),
                description: String::new(),
                impact: String::new(),
                effort,
                monthly_savings: savings,
                implementation_steps: vec!["step".to_string()],
                risks: Vec::new(),
                resources_affected: vec!["cluster-wide".to_string()],
                adjustment: None,
            },
        )
    }

    fn group(items: Vec<(RuleKind, OptimizationRecommendation)>) -> Recommendations {
        items.into_iter().map(|(kind, r)| (kind, vec![r])).collect()
    }

    #[test]
    fn test_phase_assignment() {
        assert_eq!(Phase::of(Priority::High, Effort::Low), Phase::Immediate);
        assert_eq!(Phase::of(Priority::High, Effort::Medium), Phase::ShortTerm);
        assert_eq!(Phase::of(Priority::High, Effort::High), Phase::LongTerm);
        assert_eq!(Phase::of(Priority::Medium, Effort::Low), Phase::LongTerm);
        assert_eq!(Phase::of(Priority::Low, Effort::Low), Phase::LongTerm);
    }

    #[test]
    fn test_buckets_sorted_by_savings() {
        let recs = group(vec![
            rec(RuleKind::Rightsizing, "small", Priority::High, Effort::Low, 5.0),
            rec(RuleKind::ResourceCleanup, "big", Priority::High, Effort::Low, 50.0),
            rec(RuleKind::CostOptimization, "cud", Priority::High, Effort::Low, 300.0),
            rec(RuleKind::NodeOptimization, "spot", Priority::Medium, Effort::High, 84.0),
        ]);
        let roadmap = build_roadmap(&recs);

        let titles: Vec<_> = roadmap.immediate.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["cud", "big", "small"]);
        assert!(roadmap.short_term.is_empty());
        assert_eq!(roadmap.long_term.len(), 1);
        assert_eq!(roadmap.len(), 4);
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let recs = group(vec![
            rec(RuleKind::PerformanceOptimization, "limits", Priority::Medium, Effort::Medium, 0.0),
            rec(RuleKind::StorageOptimization, "ssd", Priority::Medium, Effort::Medium, 0.0),
            rec(RuleKind::NodeOptimization, "nodes", Priority::Medium, Effort::Medium, 0.0),
        ]);
        let roadmap = build_roadmap(&recs);

        let titles: Vec<_> = roadmap.long_term.iter().map(|i| i.title.as_str()).collect();
        // Rule-module order, not insertion order
        assert_eq!(titles, vec!["nodes", "ssd", "limits"]);
    }

    #[test]
    fn test_signed_zero_savings_tie() {
        let recs = group(vec![
            rec(RuleKind::PerformanceOptimization, "limits", Priority::Medium, Effort::Medium, 0.0),
            rec(RuleKind::NodeOptimization, "spot", Priority::Medium, Effort::High, -0.0),
        ]);
        let roadmap = build_roadmap(&recs);

        let titles: Vec<_> = roadmap.long_term.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["spot", "limits"]);
    }

    #[test]
    fn test_empty_recommendations() {
        let roadmap = build_roadmap(&Recommendations::default());
        assert!(roadmap.is_empty());
    }
}
