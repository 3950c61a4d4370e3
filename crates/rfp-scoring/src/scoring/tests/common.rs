use std::sync::Arc;

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};

use crate::scoring::{evaluation_router, EvaluationEngine};

pub(super) fn category_map_rubric(
    technical: u32,
    cost: u32,
    experience: u32,
    implementation: u32,
) -> Value {
    json!({
        "technical_capability": { "points": technical },
        "cost_effectiveness": { "points": cost },
        "vendor_experience": { "points": experience },
        "implementation_approach": { "points": implementation }
    })
}

pub(super) fn vendor(name: &str, technical: Value) -> Value {
    json!({
        "vendor_name": name,
        "extraction_summary": { "features_extracted": true, "extraction_complete": true },
        "technical_data": technical,
        "financial_data": { "pricing_model": "subscription" },
        "vendor_data": { "years_in_business": "9" },
        "implementation_data": { "methodology": "agile" }
    })
}

pub(super) fn uptime_only(name: &str) -> Value {
    vendor(name, json!({ "uptime_sla": "99.9%" }))
}

pub(super) fn payload(vendors: Vec<Value>) -> Value {
    json!({ "status": "success", "vendors": vendors })
}

pub(super) fn router() -> Router {
    evaluation_router(Arc::new(EvaluationEngine::default()))
}

pub(super) async fn json_body(response: Response) -> Value {
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}
