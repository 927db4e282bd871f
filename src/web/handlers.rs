use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::classifier::TermWeight;
use crate::translate::Translation;

use super::{AppState, EMPTY_MESSAGE_WARNING, TOP_TERMS};

const PAGE: &str = include_str!("page.html");

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Text the pipeline actually classified.
    pub translated: String,
    /// Source language the translation service detected, if any.
    pub detected_source: Option<String>,
    /// True when translation failed and `translated` is the raw input.
    pub translation_fallback: bool,
    pub label: String,
    pub urgent: bool,
    pub confidence: f32,
    pub top_terms: Vec<TermWeight>,
}

/// Serves the single page.
pub async fn page() -> Html<&'static str> {
    Html(PAGE)
}

/// Liveness summary for probes.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let info = state.pipeline.info();
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "vocabulary_size": info.vocabulary_size,
        "classes": info.classes,
        "translation": state.translator.is_some(),
    }))
}

/// Runs translate, classify, rank for one submission.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Response {
    if request.text.trim().is_empty() {
        let body = Json(json!({ "warning": EMPTY_MESSAGE_WARNING }));
        return (StatusCode::BAD_REQUEST, body).into_response();
    }

    let translation = match &state.translator {
        Some(translator) => translator.translate(&request.text).await,
        None => Translation::passthrough(&request.text),
    };

    let prediction = state.pipeline.classify(&translation.text);
    let top_terms = state.pipeline.top_terms(&translation.text, TOP_TERMS);
    let urgent = prediction.label.eq_ignore_ascii_case(&state.urgent_label);

    info!(
        "Classified {} chars as '{}' ({:.1}% confidence, translation fallback: {})",
        request.text.chars().count(),
        prediction.label,
        prediction.confidence * 100.0,
        translation.fallback,
    );

    Json(AnalyzeResponse {
        translated: translation.text,
        detected_source: translation.detected_source,
        translation_fallback: translation.fallback,
        label: prediction.label,
        urgent,
        confidence: prediction.confidence,
        top_terms,
    })
    .into_response()
}
