use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CategoryScoreResult, CategoryScorer, SubCriterionScore};
use crate::scoring::rubric::{CategoryKind, CategoryRubric};
use crate::scoring::vendors::FeatureBucket;

/// Technical features that count as evidence for every technical sub-criterion.
const SHARED_TECHNICAL_SIGNALS: [&str; 6] = [
    "architecture_provided",
    "scalable_design",
    "security_focused_architecture",
    "encryption_support",
    "uptime_sla",
    "horizontal_scaling",
];

/// Declarative map from sub-criterion to the feature keys that evidence it.
///
/// A sub-criterion is always evidenced by a feature carrying its own name, then by its
/// specific triggers, then by the shared triggers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorTable {
    shared: Vec<String>,
    rules: BTreeMap<String, Vec<String>>,
}

impl DetectorTable {
    pub fn new(shared: Vec<String>) -> Self {
        Self {
            shared,
            rules: BTreeMap::new(),
        }
    }

    /// The shared-signal table the technical scorer uses unless configured otherwise.
    pub fn standard() -> Self {
        Self::new(
            SHARED_TECHNICAL_SIGNALS
                .iter()
                .map(|signal| (*signal).to_string())
                .collect(),
        )
    }

    pub fn with_rule<I, S>(mut self, sub_criterion: &str, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.insert(
            sub_criterion.to_string(),
            triggers.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn triggers<'a>(&'a self, sub_criterion: &'a str) -> impl Iterator<Item = &'a str> {
        let specific = self
            .rules
            .get(sub_criterion)
            .into_iter()
            .flatten()
            .map(String::as_str);
        std::iter::once(sub_criterion)
            .chain(specific)
            .chain(self.shared.iter().map(String::as_str))
    }

    /// First trigger for `sub_criterion` present in the bucket.
    pub fn evidence<'a>(&'a self, sub_criterion: &'a str, bucket: &FeatureBucket) -> Option<&'a str> {
        self.triggers(sub_criterion)
            .find(|trigger| bucket.has_signal(trigger))
    }
}

impl Default for DetectorTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Awards a high or low tier per technical sub-criterion depending on evidence.
#[derive(Debug, Clone)]
pub struct TechnicalScorer {
    detectors: DetectorTable,
    evidence_rate: f64,
    no_evidence_rate: f64,
}

impl TechnicalScorer {
    pub fn new(detectors: DetectorTable, evidence_rate: f64, no_evidence_rate: f64) -> Self {
        Self {
            detectors,
            evidence_rate,
            no_evidence_rate,
        }
    }

    pub fn detectors(&self) -> &DetectorTable {
        &self.detectors
    }
}

impl CategoryScorer for TechnicalScorer {
    fn category(&self) -> CategoryKind {
        CategoryKind::TechnicalCapability
    }

    fn score(
        &self,
        fragment: &CategoryRubric,
        bucket: &FeatureBucket,
        vendor_name: &str,
    ) -> CategoryScoreResult {
        let sub_criteria: Vec<SubCriterionScore> = fragment
            .sub_criteria
            .iter()
            .map(|sub| {
                let evidence = self.detectors.evidence(&sub.name, bucket);
                let rate = if evidence.is_some() {
                    self.evidence_rate
                } else {
                    self.no_evidence_rate
                };
                debug!(
                    vendor = vendor_name,
                    sub_criterion = %sub.name,
                    evidence = evidence.unwrap_or("none"),
                    "technical sub-criterion scored"
                );
                SubCriterionScore::new(&sub.name, f64::from(sub.points) * rate, sub.points)
                    .with_evidence(evidence)
            })
            .collect();

        let total_earned = sub_criteria.iter().map(|sub| sub.earned_points).sum();
        CategoryScoreResult::new(self.category(), sub_criteria, total_earned, fragment.points)
    }
}

/// Awards a fixed share of the category budget regardless of feature values.
#[derive(Debug, Clone)]
pub struct FlatRateScorer {
    category: CategoryKind,
    rate: f64,
}

impl FlatRateScorer {
    pub fn new(category: CategoryKind, rate: f64) -> Self {
        Self { category, rate }
    }
}

impl CategoryScorer for FlatRateScorer {
    fn category(&self) -> CategoryKind {
        self.category
    }

    fn score(
        &self,
        fragment: &CategoryRubric,
        bucket: &FeatureBucket,
        vendor_name: &str,
    ) -> CategoryScoreResult {
        debug!(
            vendor = vendor_name,
            category = self.category.key(),
            features = bucket.len(),
            rate = self.rate,
            "flat-rate category scored"
        );

        let sub_criteria = fragment
            .sub_criteria
            .iter()
            .map(|sub| SubCriterionScore::new(&sub.name, f64::from(sub.points) * self.rate, sub.points))
            .collect();
        let total_earned = f64::from(fragment.points) * self.rate;
        CategoryScoreResult::new(self.category, sub_criteria, total_earned, fragment.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::rubric::CategoryRubric;

    fn bucket(entries: &[(&str, bool)]) -> FeatureBucket {
        entries.iter().map(|(key, value)| (*key, *value)).collect()
    }

    #[test]
    fn triggers_list_own_name_then_specific_then_shared() {
        let table = DetectorTable::new(vec!["uptime_sla".to_string()])
            .with_rule("scalability", ["horizontal_scaling", "auto_scaling"]);
        let triggers: Vec<&str> = table.triggers("scalability").collect();
        assert_eq!(
            triggers,
            vec!["scalability", "horizontal_scaling", "auto_scaling", "uptime_sla"]
        );
        let triggers: Vec<&str> = table.triggers("performance_sla").collect();
        assert_eq!(triggers, vec!["performance_sla", "uptime_sla"]);
    }

    #[test]
    fn standard_table_shares_signals_across_sub_criteria() {
        let table = DetectorTable::standard();
        let evidence = bucket(&[("encryption_support", true)]);
        for name in ["solution_architecture", "scalability", "anything_else"] {
            assert_eq!(table.evidence(name, &evidence), Some("encryption_support"));
        }
        assert_eq!(table.evidence("scalability", &FeatureBucket::new()), None);
    }

    #[test]
    fn technical_scorer_applies_both_tiers() {
        let table = DetectorTable::new(Vec::new()).with_rule("scalability", ["horizontal_scaling"]);
        let scorer = TechnicalScorer::new(table, 0.8, 0.3);
        let fragment = CategoryRubric::standard(CategoryKind::TechnicalCapability);
        let result = scorer.score(&fragment, &bucket(&[("horizontal_scaling", true)]), "Acme");

        let scalability = result
            .sub_criteria
            .iter()
            .find(|sub| sub.name == "scalability")
            .expect("scalability scored");
        assert!((scalability.earned_points - 4.0).abs() < 1e-9);
        assert_eq!(scalability.evidence.as_deref(), Some("horizontal_scaling"));

        let architecture = result
            .sub_criteria
            .iter()
            .find(|sub| sub.name == "solution_architecture")
            .expect("architecture scored");
        assert!((architecture.earned_points - 3.0).abs() < 1e-9);
        assert!(architecture.evidence.is_none());

        // 10*0.3 + 10*0.3 + 8*0.3 + 5*0.8
        assert!((result.total_earned - 12.4).abs() < 1e-9);
        assert_eq!(result.total_possible, 35);
    }

    #[test]
    fn flat_rate_scorer_ignores_features() {
        let scorer = FlatRateScorer::new(CategoryKind::CostEffectiveness, 0.7);
        let fragment = CategoryRubric::standard(CategoryKind::CostEffectiveness);
        let rich = scorer.score(&fragment, &bucket(&[("transparent_pricing", true)]), "A");
        let empty = scorer.score(&fragment, &FeatureBucket::new(), "B");

        assert_eq!(rich.total_earned, empty.total_earned);
        assert!((rich.total_earned - 17.5).abs() < 1e-9);
        assert!((rich.category_percentage - 70.0).abs() < 1e-9);
        assert_eq!(rich.sub_criteria.len(), 3);
    }
}
