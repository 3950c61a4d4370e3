use metrics_exporter_prometheus::PrometheusHandle;
use rfp_scoring::config::ScoringConfig;
use rfp_scoring::error::AppError;
use rfp_scoring::{EvaluationEngine, RawInput};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn build_engine(config: &ScoringConfig) -> Arc<EvaluationEngine> {
    Arc::new(EvaluationEngine::from_config(config))
}

/// Read a rubric or vendor file as raw text; parsing is left to the engine.
pub(crate) fn read_input(path: &Path) -> Result<RawInput, AppError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(RawInput::Text(contents))
}
