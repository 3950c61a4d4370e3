use serde::{Deserialize, Serialize};

/// Scoring constants applied by the category scorers, aggregator, and ranking step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Share of a technical sub-criterion awarded when evidence is present.
    pub evidence_rate: f64,
    /// Share of a technical sub-criterion awarded when no evidence is present.
    pub no_evidence_rate: f64,
    pub cost_rate: f64,
    pub experience_rate: f64,
    pub implementation_rate: f64,
    pub grade_a_threshold: f64,
    pub grade_b_threshold: f64,
    pub high_confidence_threshold: f64,
    pub strength_threshold: f64,
    pub weakness_threshold: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            evidence_rate: 0.8,
            no_evidence_rate: 0.3,
            cost_rate: 0.70,
            experience_rate: 0.75,
            implementation_rate: 0.80,
            grade_a_threshold: 90.0,
            grade_b_threshold: 80.0,
            high_confidence_threshold: 80.0,
            strength_threshold: 80.0,
            weakness_threshold: 50.0,
        }
    }
}
