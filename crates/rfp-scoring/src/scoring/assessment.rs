use serde::Serialize;

use super::aggregate::VendorScore;
use super::evaluation::{confidence_for, ConfidenceLevel, Grade, ScoringPolicy};
use super::rubric::Rubric;
use super::vendors::DataSource;
use super::Status;

/// Label used wherever a vendor name is expected but no vendor won.
pub const NO_WINNER: &str = "No winner";

/// Recommended vendor, or the explicit sentinel when every vendor failed scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Winner {
    Vendor {
        vendor_name: String,
        total_score: f64,
        overall_percentage: f64,
    },
    NoWinner,
}

impl Winner {
    pub fn vendor_name(&self) -> Option<&str> {
        match self {
            Winner::Vendor { vendor_name, .. } => Some(vendor_name),
            Winner::NoWinner => None,
        }
    }

    pub fn label(&self) -> &str {
        self.vendor_name().unwrap_or(NO_WINNER)
    }
}

/// Position of a successfully scored vendor in the final ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedVendor {
    pub rank: usize,
    pub vendor_name: String,
    pub total_score: f64,
    pub overall_percentage: f64,
    pub grade: Grade,
}

/// Echo of the rubric every vendor was scored against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RubricMetadata {
    pub total_possible_points: u32,
    pub structure: Rubric,
}

/// How the run went, including whether reference data stood in for the payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationMetadata {
    pub data_source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    pub vendors_received: usize,
    pub vendors_evaluated: usize,
    pub vendors_failed: usize,
    pub evaluation_complete: bool,
}

/// Final ranked, cross-vendor comparison report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub vendor_scores: Vec<VendorScore>,
    pub ranking: Vec<RankedVendor>,
    pub winner: Winner,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<ConfidenceLevel>,
    pub rubric: RubricMetadata,
    pub metadata: EvaluationMetadata,
}

impl Assessment {
    /// One-line recommendation for summaries and CLI output.
    pub fn headline(&self) -> String {
        match (&self.winner, self.confidence_level) {
            (
                Winner::Vendor {
                    vendor_name,
                    total_score,
                    overall_percentage,
                },
                Some(confidence),
            ) => format!(
                "{vendor_name} recommended: {total_score:.2}/{} ({overall_percentage:.2}%), {} confidence",
                self.rubric.total_possible_points,
                confidence.label()
            ),
            _ => format!(
                "{NO_WINNER}: {}",
                self.message.as_deref().unwrap_or("no vendor could be ranked")
            ),
        }
    }

    pub fn used_reference_data(&self) -> bool {
        self.metadata.data_source == DataSource::Reference
    }
}

/// Where the scored vendors came from, for the metadata block.
#[derive(Debug, Clone)]
pub(crate) struct RunProvenance {
    pub(crate) data_source: DataSource,
    pub(crate) fallback_reason: Option<String>,
    pub(crate) load_error: Option<String>,
}

/// Successful vendors ordered by descending score; ties keep input order.
pub fn rank(vendor_scores: &[VendorScore]) -> Vec<RankedVendor> {
    let mut successful: Vec<&VendorScore> = vendor_scores
        .iter()
        .filter(|score| score.is_success())
        .collect();
    // `sort_by` is stable, which is what resolves exact ties.
    successful.sort_by(|left, right| right.total_score.total_cmp(&left.total_score));

    successful
        .into_iter()
        .enumerate()
        .map(|(index, score)| RankedVendor {
            rank: index + 1,
            vendor_name: score.vendor_name.clone(),
            total_score: score.total_score,
            overall_percentage: score.overall_percentage,
            grade: score.grade,
        })
        .collect()
}

pub(crate) fn build(
    rubric: &Rubric,
    vendor_scores: Vec<VendorScore>,
    provenance: RunProvenance,
    policy: &ScoringPolicy,
) -> Assessment {
    let ranking = rank(&vendor_scores);

    let winner = ranking
        .first()
        .map(|top| Winner::Vendor {
            vendor_name: top.vendor_name.clone(),
            total_score: top.total_score,
            overall_percentage: top.overall_percentage,
        })
        .unwrap_or(Winner::NoWinner);
    let confidence_level = ranking
        .first()
        .map(|top| confidence_for(top.overall_percentage, policy));

    let vendors_received = vendor_scores.len();
    let vendors_evaluated = ranking.len();
    let (status, message) = if vendors_evaluated > 0 {
        (Status::Success, None)
    } else if vendors_received == 0 {
        let reason = provenance
            .load_error
            .unwrap_or_else(|| "no vendor records supplied".to_string());
        (Status::Error, Some(format!("No vendors to evaluate: {reason}")))
    } else {
        (
            Status::Error,
            Some(format!(
                "All {vendors_received} vendor(s) failed scoring; no winner selected"
            )),
        )
    };

    Assessment {
        status,
        message,
        ranking,
        winner,
        confidence_level,
        rubric: RubricMetadata {
            total_possible_points: rubric.total_points(),
            structure: rubric.clone(),
        },
        metadata: EvaluationMetadata {
            data_source: provenance.data_source,
            fallback_reason: provenance.fallback_reason,
            vendors_received,
            vendors_evaluated,
            vendors_failed: vendors_received - vendors_evaluated,
            evaluation_complete: status == Status::Success,
        },
        vendor_scores,
    }
}
