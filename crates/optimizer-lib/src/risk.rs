//! Risk assessment of a recommendation set

use serde::{Deserialize, Serialize};

use crate::recommender::{Effort, OptimizationRecommendation, Recommendations};

/// Advice attached to every risk assessment
pub const MITIGATION_STRATEGIES: [&str; 5] = [
    "Start with low-risk, high-impact recommendations",
    "Apply changes in non-production environments first",
    "Monitor applications closely after each change",
    "Keep a rollback plan for every modification",
    "Roll out high-risk changes gradually",
];

/// Risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn assess(rec: &OptimizationRecommendation) -> Self {
        let risks = rec.risks.len();
        if rec.effort == Effort::High || risks > 2 {
            RiskLevel::High
        } else if rec.effort == Effort::Medium || risks > 1 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Recommendation counts per risk level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    /// Always `low + medium + high`
    pub total: usize,
}

impl RiskProfile {
    pub fn from_recommendations(recommendations: &Recommendations) -> Self {
        recommendations
            .iter()
            .fold(Self::default(), |mut profile, rec| {
                profile.record(RiskLevel::assess(rec));
                profile
            })
    }

    fn record(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::Low => self.low += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::High => self.high += 1,
        }
        self.total += 1;
    }
}

/// Risk section of the optimization report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub total_recommendations: usize,
    pub risk_distribution: RiskProfile,
    pub mitigation_strategies: Vec<String>,
}

impl RiskAssessment {
    pub fn new(recommendations: &Recommendations) -> Self {
        let risk_distribution = RiskProfile::from_recommendations(recommendations);
        Self {
            total_recommendations: risk_distribution.total,
            risk_distribution,
            mitigation_strategies: MITIGATION_STRATEGIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
