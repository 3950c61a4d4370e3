use tracing::{info, warn};

use super::aggregate::{VendorAggregator, VendorScore};
use super::assessment::{self, Assessment, RunProvenance};
use super::evaluation::{DetectorTable, ScorerSet, ScoringPolicy};
use super::input::RawInput;
use super::rubric::{self, Rubric};
use super::vendors::{DataSource, ReferenceDataset, VendorLoader, VendorRecord};
use crate::config::ScoringConfig;

/// Normalizes rubrics, loads vendor payloads, and produces ranked assessments.
///
/// Holds no per-run state, so one engine can serve concurrent evaluations.
pub struct EvaluationEngine {
    loader: VendorLoader,
    detectors: DetectorTable,
    aggregator: VendorAggregator,
}

impl Default for EvaluationEngine {
    fn default() -> Self {
        Self::new(VendorLoader::default(), VendorAggregator::default())
    }
}

impl EvaluationEngine {
    /// Later `with_policy`/`with_detectors` calls rebuild the aggregator from the standard
    /// detector table unless `with_detectors` replaces it.
    pub fn new(loader: VendorLoader, aggregator: VendorAggregator) -> Self {
        Self {
            loader,
            detectors: DetectorTable::standard(),
            aggregator,
        }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        let loader = if config.reference_fallback {
            VendorLoader::default()
        } else {
            VendorLoader::without_fallback()
        };
        Self::new(loader, VendorAggregator::default())
    }

    /// Replace the dataset substituted for unusable vendor payloads.
    ///
    /// Leaves the fallback switch as configured.
    pub fn with_reference(mut self, reference: ReferenceDataset) -> Self {
        self.loader = self.loader.with_reference(reference);
        self
    }

    /// Rebuild the scorers around a custom technical detector table.
    pub fn with_detectors(mut self, detectors: DetectorTable) -> Self {
        self.detectors = detectors;
        let policy = self.aggregator.policy().clone();
        self.rebuild_scorers(policy);
        self
    }

    /// Rebuild the scorers around different rates and thresholds.
    pub fn with_policy(mut self, policy: ScoringPolicy) -> Self {
        self.rebuild_scorers(policy);
        self
    }

    fn rebuild_scorers(&mut self, policy: ScoringPolicy) {
        let scorers = ScorerSet::new(&policy, self.detectors.clone());
        self.aggregator = VendorAggregator::new(scorers, policy);
    }

    pub fn loader(&self) -> &VendorLoader {
        &self.loader
    }

    pub fn policy(&self) -> &ScoringPolicy {
        self.aggregator.policy()
    }

    pub fn normalize_rubric(&self, raw: impl Into<RawInput>) -> Rubric {
        rubric::normalize_rubric(raw)
    }

    /// Score every vendor in the payload against an already normalized rubric.
    pub fn score_vendors(&self, rubric: &Rubric, payload: impl Into<RawInput>) -> Assessment {
        let batch = self.loader.resolve(payload);
        let fallback_reason = match batch.source {
            DataSource::Reference => batch.load_error.clone(),
            DataSource::Payload => None,
        };

        let vendor_scores = self.score_records(rubric, &batch.vendors);
        let assessment = assessment::build(
            rubric,
            vendor_scores,
            RunProvenance {
                data_source: batch.source,
                fallback_reason,
                load_error: batch.load_error,
            },
            self.aggregator.policy(),
        );

        if assessment.used_reference_data() {
            warn!(
                reason = assessment.metadata.fallback_reason.as_deref().unwrap_or_default(),
                "assessment built from reference vendor data"
            );
        }
        info!(
            status = assessment.status.label(),
            vendors = assessment.metadata.vendors_received,
            evaluated = assessment.metadata.vendors_evaluated,
            winner = assessment.winner.label(),
            "vendor evaluation complete"
        );
        assessment
    }

    /// Normalize the rubric and score the payload in one step.
    pub fn evaluate(
        &self,
        raw_rubric: impl Into<RawInput>,
        payload: impl Into<RawInput>,
    ) -> Assessment {
        let rubric = self.normalize_rubric(raw_rubric);
        self.score_vendors(&rubric, payload)
    }

    /// Score already-loaded records, preserving their order.
    pub fn score_records(&self, rubric: &Rubric, vendors: &[VendorRecord]) -> Vec<VendorScore> {
        vendors
            .iter()
            .map(|vendor| self.aggregator.score(rubric, vendor))
            .collect()
    }
}

/// Score a vendor payload with the default engine.
pub fn score_vendors(rubric: &Rubric, payload: impl Into<RawInput>) -> Assessment {
    EvaluationEngine::default().score_vendors(rubric, payload)
}
