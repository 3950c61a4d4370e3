use crate::infra::{build_engine, read_input};
use clap::Args;
use rfp_scoring::config::{AppConfig, ScoringConfig};
use rfp_scoring::error::AppError;
use rfp_scoring::scoring::{CategoryKind, ReferenceDataset, Status};
use rfp_scoring::{Assessment, EvaluationEngine, RawInput};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Rubric file (JSON, optionally wrapped in a Markdown code fence)
    #[arg(long)]
    pub(crate) rubric: PathBuf,
    /// Vendor payload file produced by the feature extractor
    #[arg(long)]
    pub(crate) vendors: PathBuf,
    /// Pretty-print the assessment JSON
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional rubric file; the standard 35/25/20/20 rubric is used otherwise.
    #[arg(long)]
    pub(crate) rubric: Option<PathBuf>,
    /// Print the full assessment JSON after the summary table.
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        rubric,
        vendors,
        pretty,
    } = args;

    let config = AppConfig::load()?;
    let engine = build_engine(&config.scoring);

    let rubric = read_input(&rubric)?;
    let vendors = read_input(&vendors)?;
    let assessment = engine.evaluate(rubric, vendors);

    let rendered = if pretty {
        serde_json::to_string_pretty(&assessment)?
    } else {
        serde_json::to_string(&assessment)?
    };
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { rubric, json } = args;

    let rubric = match rubric {
        Some(path) => read_input(&path)?,
        None => RawInput::Structured(serde_json::Value::Null),
    };
    let assessment = demo_assessment(rubric)?;

    println!("RFP evaluation demo");
    print!("{}", render_assessment(&assessment));

    if json {
        println!("\n{}", serde_json::to_string_pretty(&assessment)?);
    }
    Ok(())
}

/// Score the reference vendors as if they had arrived in a real payload.
fn demo_assessment(rubric: RawInput) -> Result<Assessment, AppError> {
    let reference = ReferenceDataset::standard();
    let vendors = serde_json::to_value(reference.vendors())?;
    let engine = EvaluationEngine::from_config(&ScoringConfig::default());
    Ok(engine.evaluate(rubric, vendors))
}

pub(crate) fn render_assessment(assessment: &Assessment) -> String {
    let mut out = String::new();
    let rubric = &assessment.rubric.structure;

    let allocation: Vec<String> = CategoryKind::ALL
        .iter()
        .map(|kind| format!("{} {}", kind.label(), rubric.category(*kind).points))
        .collect();
    let _ = writeln!(
        out,
        "Rubric: {} points ({})",
        assessment.rubric.total_possible_points,
        allocation.join(" | ")
    );

    if assessment.used_reference_data() {
        let _ = writeln!(
            out,
            "Vendor data: reference dataset ({})",
            assessment
                .metadata
                .fallback_reason
                .as_deref()
                .unwrap_or("payload unusable")
        );
    }

    let _ = writeln!(out, "\nRanking");
    for entry in &assessment.ranking {
        let _ = writeln!(
            out,
            "  {}. {:<20} {:>6.2} / {} ({:.2}%) grade {}",
            entry.rank,
            entry.vendor_name,
            entry.total_score,
            assessment.rubric.total_possible_points,
            entry.overall_percentage,
            entry.grade.label()
        );
    }

    for score in &assessment.vendor_scores {
        if score.status == Status::Error {
            let _ = writeln!(
                out,
                "  - {}: not ranked ({})",
                score.vendor_name,
                score.message.as_deref().unwrap_or("scoring failed")
            );
            continue;
        }
        let strengths = if score.strengths.is_empty() {
            "none".to_string()
        } else {
            score.strengths.join(", ")
        };
        let weaknesses = if score.weaknesses.is_empty() {
            "none".to_string()
        } else {
            score.weaknesses.join(", ")
        };
        let _ = writeln!(
            out,
            "  - {}: strengths {strengths}; weaknesses {weaknesses}",
            score.vendor_name
        );
    }

    let _ = writeln!(out, "\nRecommendation: {}", assessment.headline());
    out
}
