use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::state::{AppState, Readiness};
use crate::api::ApiError;
use crate::models::StatsSnapshot;
use crate::provider::DataMode;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub data_mode: DataMode,
    pub dataset_id: Option<String>,
    pub origin: String,
    pub loaded_at: DateTime<Utc>,
    pub notice: Option<String>,
    pub stats: StatsSnapshot,
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let readiness = state.readiness.read().await;
    let loaded = match &*readiness {
        Readiness::Loading => {
            return Err(ApiError::ServiceUnavailable(
                "Statistics are still loading".to_string(),
            ))
        }
        Readiness::Loaded(loaded) => loaded,
    };

    let Some(snapshot) = &loaded.snapshot else {
        return Err(ApiError::NotFound(
            loaded
                .notice
                .clone()
                .unwrap_or_else(|| "No statistics available".to_string()),
        ));
    };

    Ok(Json(StatsResponse {
        data_mode: loaded.mode,
        dataset_id: loaded.dataset_id.as_ref().map(|id| id.to_string()),
        origin: loaded.origin.clone(),
        loaded_at: loaded.loaded_at,
        notice: loaded.notice.clone(),
        stats: snapshot.as_ref().clone(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::config::GeneratorConfig;
    use crate::provider::{FallbackMode, LoadedStats, OFFLINE_HOT};
    use crate::source::{DrawSource, StaticSource};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    async fn live_state() -> AppState {
        let source = StaticSource::new(
            r#"[{"Concurso": 1, "Dezenas": ["01", "02", "03", "04", "05", "06"]}]"#,
        );
        let loaded = LoadedStats::from_history(source.load().await.unwrap());
        AppState::with_loaded(GeneratorConfig::default(), loaded)
    }

    // ── Unit Tests ───────────────────────────────────────────────

    #[tokio::test]
    async fn test_stats_while_loading() {
        let app = build_router(AppState::new(GeneratorConfig::default()), "*");
        let (status, json) = get_json(app, "/api/stats").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["error"]["code"], "SERVICE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_stats_live() {
        let app = build_router(live_state().await, "*");
        let (status, json) = get_json(app, "/api/stats").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data_mode"], "live");
        assert_eq!(json["origin"], "static payload");
        assert_eq!(json["stats"]["total_contests"], 1);
        assert_eq!(json["stats"]["frequency"]["1"], 1);
        assert_eq!(json["stats"]["last_seen"]["7"], Value::Null);
        assert_eq!(json["stats"]["hot"].as_array().unwrap().len(), 10);
        assert_eq!(json["dataset_id"].as_str().unwrap().len(), 16);
        assert_eq!(json["notice"], Value::Null);
    }

    #[tokio::test]
    async fn test_stats_degraded_random() {
        let loaded = LoadedStats::degraded(FallbackMode::Random, "network down");
        let app = build_router(AppState::with_loaded(GeneratorConfig::default(), loaded), "*");
        let (status, json) = get_json(app, "/api/stats").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("network down"));
    }

    #[tokio::test]
    async fn test_stats_degraded_offline() {
        let loaded = LoadedStats::degraded(FallbackMode::OfflineStats, "network down");
        let app = build_router(AppState::with_loaded(GeneratorConfig::default(), loaded), "*");
        let (status, json) = get_json(app, "/api/stats").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data_mode"], "degraded");
        assert_eq!(json["dataset_id"], "offline");
        let hot: Vec<u8> = serde_json::from_value(json["stats"]["hot"].clone()).unwrap();
        assert_eq!(hot, OFFLINE_HOT.to_vec());
        assert!(json["notice"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_health_transitions() {
        let state = AppState::new(GeneratorConfig::default());
        let (_, json) = get_json(build_router(state.clone(), "*"), "/api/health").await;
        assert_eq!(json["status"], "loading");
        assert_eq!(json["ready"], false);

        let loaded = LoadedStats::degraded(FallbackMode::Random, "timeout");
        *state.readiness.write().await = crate::api::state::Readiness::Loaded(loaded);

        let (status, json) = get_json(build_router(state, "*"), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["ready"], true);
        assert!(json["notice"].as_str().unwrap().contains("timeout"));
    }
}
