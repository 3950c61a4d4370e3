mod config;
mod policy;
mod rules;

pub use config::ScoringPolicy;
pub use policy::{ConfidenceLevel, Grade};
pub use rules::{DetectorTable, FlatRateScorer, TechnicalScorer};

pub(crate) use policy::{confidence_for, grade_for};

use serde::Serialize;

use super::rubric::{CategoryKind, CategoryRubric};
use super::vendors::FeatureBucket;

/// Maps one category's point budget and a vendor's matching feature bucket to earned points.
///
/// Implementations are stateless and must not panic; missing features are simply absent.
pub trait CategoryScorer: Send + Sync {
    fn category(&self) -> CategoryKind;

    fn score(
        &self,
        fragment: &CategoryRubric,
        bucket: &FeatureBucket,
        vendor_name: &str,
    ) -> CategoryScoreResult;
}

/// Points earned against one sub-criterion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubCriterionScore {
    pub name: String,
    pub earned_points: f64,
    pub max_points: u32,
    pub percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

impl SubCriterionScore {
    pub fn new(name: &str, earned_points: f64, max_points: u32) -> Self {
        Self {
            name: name.to_string(),
            earned_points,
            max_points,
            percentage: percentage_of(earned_points, max_points),
            evidence: None,
        }
    }

    pub fn with_evidence(mut self, evidence: Option<&str>) -> Self {
        self.evidence = evidence.map(str::to_string);
        self
    }
}

/// One vendor's result for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScoreResult {
    pub category: CategoryKind,
    pub sub_criteria: Vec<SubCriterionScore>,
    pub total_earned: f64,
    pub total_possible: u32,
    pub category_percentage: f64,
}

impl CategoryScoreResult {
    pub fn new(
        category: CategoryKind,
        sub_criteria: Vec<SubCriterionScore>,
        total_earned: f64,
        total_possible: u32,
    ) -> Self {
        Self {
            category,
            sub_criteria,
            total_earned,
            total_possible,
            category_percentage: percentage_of(total_earned, total_possible),
        }
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        self.total_earned.is_finite()
            && self.total_earned >= 0.0
            && self.total_earned <= f64::from(self.total_possible)
    }
}

pub(crate) fn percentage_of(earned: f64, possible: u32) -> f64 {
    if possible == 0 {
        0.0
    } else {
        earned / f64::from(possible) * 100.0
    }
}

/// The four scorers a run uses, one per category.
pub struct ScorerSet {
    scorers: [Box<dyn CategoryScorer>; 4],
}

impl ScorerSet {
    pub fn new(policy: &ScoringPolicy, detectors: DetectorTable) -> Self {
        Self {
            scorers: [
                Box::new(TechnicalScorer::new(
                    detectors,
                    policy.evidence_rate,
                    policy.no_evidence_rate,
                )),
                Box::new(FlatRateScorer::new(
                    CategoryKind::CostEffectiveness,
                    policy.cost_rate,
                )),
                Box::new(FlatRateScorer::new(
                    CategoryKind::VendorExperience,
                    policy.experience_rate,
                )),
                Box::new(FlatRateScorer::new(
                    CategoryKind::ImplementationApproach,
                    policy.implementation_rate,
                )),
            ],
        }
    }

    /// Swap in a custom scorer for the category it declares.
    pub fn with_scorer(mut self, scorer: Box<dyn CategoryScorer>) -> Self {
        let index = scorer.category().index();
        self.scorers[index] = scorer;
        self
    }

    pub fn for_category(&self, kind: CategoryKind) -> &dyn CategoryScorer {
        self.scorers[kind.index()].as_ref()
    }
}

impl Default for ScorerSet {
    fn default() -> Self {
        Self::new(&ScoringPolicy::default(), DetectorTable::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_guard_against_empty_budgets() {
        assert_eq!(percentage_of(5.0, 0), 0.0);
        assert!((percentage_of(17.5, 25) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn scorer_set_routes_each_category() {
        let scorers = ScorerSet::default();
        for kind in CategoryKind::ALL {
            assert_eq!(scorers.for_category(kind).category(), kind);
        }
    }

    #[test]
    fn category_results_flag_overflowing_totals() {
        let ok = CategoryScoreResult::new(CategoryKind::VendorExperience, Vec::new(), 15.0, 20);
        assert!(ok.is_well_formed());
        let overflow =
            CategoryScoreResult::new(CategoryKind::VendorExperience, Vec::new(), 21.0, 20);
        assert!(!overflow.is_well_formed());
        let nan = CategoryScoreResult::new(CategoryKind::VendorExperience, Vec::new(), f64::NAN, 20);
        assert!(!nan.is_well_formed());
    }
}
