use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::{AppState, Readiness};
use crate::api::ApiError;
use crate::generate::{generate, rng_from_seed, GenerationMode};
use crate::provider::DataMode;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    /// Defaults to the configured mode
    pub mode: Option<GenerationMode>,
    /// Number of games, defaults to 1
    pub count: Option<usize>,
    /// Fixed seed for reproducible output
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct Game {
    pub numbers: Vec<u8>,
    /// Two-digit display form
    pub tokens: Vec<String>,
    /// Strategy that actually produced this game
    pub mode: GenerationMode,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub requested_mode: GenerationMode,
    pub data_mode: DataMode,
    pub notice: Option<String>,
    pub games: Vec<Game>,
}

pub async fn generate_games(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let count = request.count.unwrap_or(1);
    let max_batch = state.generator.max_batch;
    if count == 0 || count > max_batch {
        return Err(ApiError::BadRequest(format!(
            "count must be between 1 and {}",
            max_batch
        )));
    }
    let requested_mode = request.mode.unwrap_or(state.generator.default_mode);

    let readiness = state.readiness.read().await;
    let loaded = match &*readiness {
        Readiness::Loading => {
            return Err(ApiError::ServiceUnavailable(
                "Statistics are still loading".to_string(),
            ))
        }
        Readiness::Loaded(loaded) => loaded,
    };

    let mut rng = rng_from_seed(request.seed);
    let mut games = Vec::with_capacity(count);
    for _ in 0..count {
        let generated = generate(requested_mode, loaded.snapshot.as_deref(), &mut rng)?;
        games.push(Game {
            numbers: generated.selection.numbers().to_vec(),
            tokens: generated.selection.tokens(),
            mode: generated.mode,
        });
    }

    tracing::debug!("Generated {} {} game(s)", games.len(), requested_mode);

    Ok(Json(GenerateResponse {
        requested_mode,
        data_mode: loaded.mode,
        notice: loaded.notice.clone(),
        games,
    }))
}
