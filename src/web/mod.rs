mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::classifier::Pipeline;
use crate::translate::Translator;

pub use handlers::{AnalyzeRequest, AnalyzeResponse};

/// How many contributing terms the analyze response carries.
pub const TOP_TERMS: usize = 10;

/// Shown when a submission is empty or whitespace-only.
pub const EMPTY_MESSAGE_WARNING: &str = "Please enter a message first.";

/// Read-only state shared by every request: the process-wide pipeline, the
/// translator handle (absent when translation is disabled), and the label
/// rendered as urgent.
pub struct AppState {
    pub pipeline: Pipeline,
    pub translator: Option<Translator>,
    pub urgent_label: String,
}

/// Builds the three-route application: the page, the analyze endpoint, and
/// the health probe.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::page))
        .route("/api/analyze", post(handlers::analyze))
        .route("/health", get(handlers::health))
        .with_state(state)
}
