//! Scorecard normalization and vendor scoring for RFP proposal evaluation.
//!
//! The [`scoring`] module holds the engine: rubric normalization, vendor payload loading,
//! per-category scorers, aggregation, and the final ranked assessment. The remaining modules
//! carry the application plumbing shared with the HTTP service.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;

pub use scoring::{
    normalize_rubric, score_vendors, Assessment, EvaluationEngine, RawInput, Rubric, VendorScore,
};
