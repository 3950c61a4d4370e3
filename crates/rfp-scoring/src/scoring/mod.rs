//! RFP scorecard evaluation.
//!
//! Rubrics of any supported shape are normalized into four canonical categories, vendor
//! feature payloads are loaded (falling back to a reference dataset when unusable), each
//! vendor is scored category by category, and the results are ranked into an [`Assessment`].

mod aggregate;
mod assessment;
mod engine;
pub mod evaluation;
mod input;
pub mod router;
pub mod rubric;
pub mod vendors;

#[cfg(test)]
mod tests;

pub use aggregate::{aggregate, ScoringError, VendorAggregator, VendorScore};
pub use assessment::{
    rank, Assessment, EvaluationMetadata, RankedVendor, RubricMetadata, Winner, NO_WINNER,
};
pub use engine::{score_vendors, EvaluationEngine};
pub use evaluation::{
    CategoryScoreResult, CategoryScorer, ConfidenceLevel, DetectorTable, Grade, ScorerSet,
    ScoringPolicy, SubCriterionScore,
};
pub use input::{InputError, RawInput};
pub use router::evaluation_router;
pub use rubric::{normalize_rubric, CategoryKind, CategoryRubric, Rubric, RubricSource};
pub use vendors::{DataSource, ReferenceDataset, VendorLoader, VendorRecord};

use serde::Serialize;

/// Outcome marker shared by loader results, vendor scores, and assessments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Error,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Error => "error",
        }
    }
}
