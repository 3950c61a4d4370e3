use serde::Serialize;
use tracing::{debug, warn};

use super::evaluation::{
    grade_for, percentage_of, CategoryScoreResult, Grade, ScorerSet, ScoringPolicy,
};
use super::rubric::{CategoryKind, Rubric};
use super::vendors::{FeatureBucket, RecordIssue, VendorRecord};
use super::Status;

/// Failure while computing one vendor's category results.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("vendor record is malformed: {0}")]
    Record(#[from] RecordIssue),
    #[error("{category} scorer awarded {earned} of {possible} possible points")]
    OutOfBounds {
        category: &'static str,
        earned: f64,
        possible: u32,
    },
    #[error("{expected} scorer returned a result for {returned}")]
    MismatchedCategory {
        expected: &'static str,
        returned: &'static str,
    },
}

/// One vendor's aggregated result across all four categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorScore {
    pub vendor_name: String,
    pub status: Status,
    pub total_score: f64,
    pub total_possible: u32,
    pub overall_percentage: f64,
    pub grade: Grade,
    pub extraction_trusted: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub category_breakdown: Vec<CategoryScoreResult>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl VendorScore {
    pub fn failed(vendor_name: &str, total_possible: u32, error: &ScoringError) -> Self {
        Self {
            vendor_name: vendor_name.to_string(),
            status: Status::Error,
            total_score: 0.0,
            total_possible,
            overall_percentage: 0.0,
            grade: Grade::F,
            extraction_trusted: false,
            category_breakdown: Vec::new(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            message: Some(format!("Scoring failed: {error}")),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn category(&self, kind: CategoryKind) -> Option<&CategoryScoreResult> {
        self.category_breakdown
            .iter()
            .find(|result| result.category == kind)
    }
}

/// Scores vendors category by category and folds the results into a [`VendorScore`].
pub struct VendorAggregator {
    scorers: ScorerSet,
    policy: ScoringPolicy,
}

impl Default for VendorAggregator {
    fn default() -> Self {
        Self::new(ScorerSet::default(), ScoringPolicy::default())
    }
}

impl VendorAggregator {
    pub fn new(scorers: ScorerSet, policy: ScoringPolicy) -> Self {
        Self { scorers, policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Score one vendor. Failures are contained in an error-status result.
    pub fn score(&self, rubric: &Rubric, record: &VendorRecord) -> VendorScore {
        match self.category_results(rubric, record) {
            Ok(results) => {
                let score =
                    aggregate(&record.vendor_name, results, record.is_trusted(), &self.policy);
                debug!(
                    vendor = %score.vendor_name,
                    total_score = score.total_score,
                    percentage = score.overall_percentage,
                    grade = score.grade.label(),
                    "vendor scored"
                );
                score
            }
            Err(err) => {
                warn!(vendor = %record.vendor_name, error = %err, "vendor scoring failed");
                VendorScore::failed(&record.vendor_name, rubric.total_points(), &err)
            }
        }
    }

    fn category_results(
        &self,
        rubric: &Rubric,
        record: &VendorRecord,
    ) -> Result<Vec<CategoryScoreResult>, ScoringError> {
        if let Some(issue) = record.issues.first() {
            return Err(issue.clone().into());
        }

        // Untrusted extractions earn no evidence credit.
        let trusted = record.is_trusted();
        let empty = FeatureBucket::new();

        CategoryKind::ALL
            .into_iter()
            .map(|kind| {
                let bucket = if trusted { record.bucket(kind) } else { &empty };
                let result = self.scorers.for_category(kind).score(
                    rubric.category(kind),
                    bucket,
                    &record.vendor_name,
                );

                if result.category != kind {
                    return Err(ScoringError::MismatchedCategory {
                        expected: kind.key(),
                        returned: result.category.key(),
                    });
                }
                if !result.is_well_formed() {
                    return Err(ScoringError::OutOfBounds {
                        category: kind.key(),
                        earned: result.total_earned,
                        possible: result.total_possible,
                    });
                }
                Ok(result)
            })
            .collect()
    }
}

/// Fold four category results into a vendor score.
pub fn aggregate(
    vendor_name: &str,
    categories: Vec<CategoryScoreResult>,
    extraction_trusted: bool,
    policy: &ScoringPolicy,
) -> VendorScore {
    let earned: f64 = categories.iter().map(|result| result.total_earned).sum();
    let total_possible = categories
        .iter()
        .fold(0u32, |total, result| total.saturating_add(result.total_possible));
    let total_score = round2(earned);
    let overall_percentage = round2(percentage_of(total_score, total_possible));

    let strengths = categories
        .iter()
        .filter(|result| result.category_percentage >= policy.strength_threshold)
        .map(|result| result.category.label().to_string())
        .collect();
    let weaknesses = categories
        .iter()
        .filter(|result| result.category_percentage < policy.weakness_threshold)
        .map(|result| result.category.label().to_string())
        .collect();

    VendorScore {
        vendor_name: vendor_name.to_string(),
        status: Status::Success,
        total_score,
        total_possible,
        overall_percentage,
        grade: grade_for(overall_percentage, policy),
        extraction_trusted,
        category_breakdown: categories,
        strengths,
        weaknesses,
        message: None,
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::evaluation::CategoryScorer;
    use crate::scoring::rubric::CategoryRubric;
    use crate::scoring::vendors::ExtractionSummary;

    fn category(kind: CategoryKind, earned: f64, possible: u32) -> CategoryScoreResult {
        CategoryScoreResult::new(kind, Vec::new(), earned, possible)
    }

    fn four(earned: [f64; 4]) -> Vec<CategoryScoreResult> {
        CategoryKind::ALL
            .into_iter()
            .zip(earned)
            .map(|(kind, earned)| category(kind, earned, kind.default_points()))
            .collect()
    }

    struct GreedyScorer;

    impl CategoryScorer for GreedyScorer {
        fn category(&self) -> CategoryKind {
            CategoryKind::CostEffectiveness
        }

        fn score(
            &self,
            fragment: &CategoryRubric,
            _bucket: &FeatureBucket,
            _vendor_name: &str,
        ) -> CategoryScoreResult {
            CategoryScoreResult::new(
                CategoryKind::CostEffectiveness,
                Vec::new(),
                f64::from(fragment.points) + 1.0,
                fragment.points,
            )
        }
    }

    #[test]
    fn totals_are_rounded_to_two_places() {
        let score = aggregate(
            "Acme",
            four([26.4, 17.5, 15.0, 16.004]),
            true,
            &ScoringPolicy::default(),
        );
        assert_eq!(score.total_score, 74.9);
        assert_eq!(score.total_possible, 100);
        assert_eq!(score.overall_percentage, 74.9);
        assert_eq!(score.grade, Grade::C);
    }

    #[test]
    fn grades_follow_the_rounded_percentage() {
        let policy = ScoringPolicy::default();
        let cases = [
            ([35.0, 25.0, 20.0, 10.0], Grade::A),
            ([35.0, 25.0, 20.0, 9.99], Grade::B),
            ([35.0, 25.0, 20.0, 0.0], Grade::B),
            ([35.0, 25.0, 19.99, 0.0], Grade::C),
        ];
        for (earned, grade) in cases {
            assert_eq!(aggregate("Acme", four(earned), true, &policy).grade, grade);
        }
    }

    #[test]
    fn empty_budgets_score_zero_percent() {
        let categories = CategoryKind::ALL
            .into_iter()
            .map(|kind| category(kind, 0.0, 0))
            .collect();
        let score = aggregate("Acme", categories, true, &ScoringPolicy::default());
        assert_eq!(score.overall_percentage, 0.0);
        assert_eq!(score.grade, Grade::C);
    }

    #[test]
    fn strengths_and_weaknesses_come_from_category_percentages() {
        let score = aggregate(
            "Acme",
            four([10.5, 17.5, 15.0, 16.0]),
            true,
            &ScoringPolicy::default(),
        );
        assert_eq!(score.strengths, vec!["Implementation approach".to_string()]);
        assert_eq!(score.weaknesses, vec!["Technical capability".to_string()]);
    }

    #[test]
    fn malformed_records_fail_in_isolation() {
        let mut record = VendorRecord::new("Broken");
        record.issues.push(RecordIssue::MalformedBucket {
            bucket: "technical_data",
            found: "a string",
        });

        let score = VendorAggregator::default().score(&Rubric::standard(), &record);
        assert_eq!(score.status, Status::Error);
        assert_eq!(score.grade, Grade::F);
        assert_eq!(score.total_score, 0.0);
        assert_eq!(score.total_possible, 100);
        assert!(score
            .message
            .expect("message present")
            .contains("technical_data"));
    }

    #[test]
    fn scorers_breaking_the_budget_are_caught() {
        let aggregator = VendorAggregator::new(
            ScorerSet::default().with_scorer(Box::new(GreedyScorer)),
            ScoringPolicy::default(),
        );
        let score = aggregator.score(&Rubric::standard(), &VendorRecord::new("Acme"));
        assert_eq!(score.grade, Grade::F);
        assert!(score
            .message
            .expect("message present")
            .contains("cost_effectiveness"));
    }

    #[test]
    fn untrusted_records_earn_no_evidence_credit() {
        let bucket: FeatureBucket = [("encryption_support", true)].into_iter().collect();
        let trusted = VendorRecord::new("Trusted")
            .with_bucket(CategoryKind::TechnicalCapability, bucket.clone());
        let untrusted = VendorRecord::new("Untrusted")
            .with_bucket(CategoryKind::TechnicalCapability, bucket)
            .with_extraction(ExtractionSummary::extracted(false));

        let aggregator = VendorAggregator::default();
        let rubric = Rubric::standard();
        let trusted = aggregator.score(&rubric, &trusted);
        let untrusted = aggregator.score(&rubric, &untrusted);

        assert!(trusted.extraction_trusted);
        assert!(!untrusted.extraction_trusted);
        assert_eq!(untrusted.status, Status::Success);
        assert!(untrusted.total_score < trusted.total_score);
        // 33 allocated technical points at 0.3 plus the flat-rate categories.
        assert_eq!(untrusted.total_score, 58.4);
        assert_eq!(trusted.total_score, 74.9);
    }
}
