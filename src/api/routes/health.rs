use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::{AppState, Readiness, ReadinessStatus};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: ReadinessStatus,
    /// Whether `/api/generate` will accept requests
    pub ready: bool,
    pub notice: Option<String>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let readiness = state.readiness.read().await;
    let status = readiness.status();
    let notice = match &*readiness {
        Readiness::Loaded(loaded) => loaded.notice.clone(),
        Readiness::Loading => None,
    };

    Json(HealthResponse {
        status,
        ready: status != ReadinessStatus::Loading,
        notice,
    })
}
