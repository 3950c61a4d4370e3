use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::engine::EvaluationEngine;
use super::Status;

/// Body of `POST /api/v1/rubrics/normalize`.
#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    #[serde(default)]
    pub rubric: Value,
}

/// Body of `POST /api/v1/evaluations`.
#[derive(Debug, Deserialize)]
pub struct EvaluationRequest {
    #[serde(default)]
    pub rubric: Value,
    #[serde(default)]
    pub vendors: Value,
}

/// Router exposing rubric normalization and vendor evaluation.
pub fn evaluation_router(engine: Arc<EvaluationEngine>) -> Router {
    Router::new()
        .route("/api/v1/rubrics/normalize", post(normalize_handler))
        .route("/api/v1/evaluations", post(evaluate_handler))
        .with_state(engine)
}

pub(crate) async fn normalize_handler(
    State(engine): State<Arc<EvaluationEngine>>,
    Json(request): Json<NormalizeRequest>,
) -> Response {
    let rubric = engine.normalize_rubric(request.rubric);
    (StatusCode::OK, Json(rubric)).into_response()
}

/// Always answers 200 with the assessment; run-level failures are carried in its `status`.
pub(crate) async fn evaluate_handler(
    State(engine): State<Arc<EvaluationEngine>>,
    Json(request): Json<EvaluationRequest>,
) -> Response {
    let assessment = engine.evaluate(request.rubric, request.vendors);
    if assessment.status == Status::Error {
        warn!(
            message = assessment.message.as_deref().unwrap_or_default(),
            "evaluation produced no winner"
        );
    }
    (StatusCode::OK, Json(assessment)).into_response()
}
