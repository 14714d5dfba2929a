//! API Handlers
//!
//! HTTP request handlers for each player endpoint. Every handler delegates to
//! the shared [`PlayerService`]; errors map to status codes via `ServiceError`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::config::Config;
use crate::error::Result;
use crate::models::{
    DeleteResponse, ExportResponse, HealthResponse, ImportResponse, Player, PlayerRequest,
    StatsResponse, TransferRequest,
};
use crate::service::PlayerService;
use crate::store::MemoryStore;
use crate::transfer::{CsvFileSource, JsonFileSink};
use crate::validator::PlayerValidator;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PlayerService>,
}

impl AppState {
    pub fn new(service: PlayerService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Wires an in-memory store and the player validator behind a service
    /// configured from `config`.
    pub fn from_config(config: &Config) -> Self {
        let service = PlayerService::new(
            Arc::new(MemoryStore::new()),
            PlayerValidator::new(),
            config.cache_settings(),
        )
        .with_import_policy(config.import_policy);
        Self::new(service)
    }
}

/// Handler for GET /players
pub async fn list_players_handler(State(state): State<AppState>) -> Result<Json<Vec<Player>>> {
    Ok(Json(state.service.find_all().await?))
}

/// Handler for GET /players/:id
pub async fn get_player_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Player>> {
    Ok(Json(state.service.find_by_id(id).await?))
}

/// Handler for POST /players
///
/// Responds with 201 and the saved player, including its assigned id.
pub async fn create_player_handler(
    State(state): State<AppState>,
    Json(req): Json<PlayerRequest>,
) -> Result<(StatusCode, Json<Player>)> {
    let saved = state.service.create(req.into_player()).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Handler for PUT /players/:id
///
/// The id in the path always wins over anything in the body.
pub async fn update_player_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<PlayerRequest>,
) -> Result<Json<Player>> {
    let updated = state.service.update(req.into_player_with_id(id)).await?;
    Ok(Json(updated))
}

/// Handler for DELETE /players/:id
pub async fn delete_player_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>> {
    state.service.delete(id).await?;
    Ok(Json(DeleteResponse::new(id)))
}

/// Handler for POST /players/import
///
/// Reads a CSV file on the server's filesystem.
pub async fn import_players_handler(
    State(state): State<AppState>,
    Json(req): Json<TransferRequest>,
) -> Result<Json<ImportResponse>> {
    let source = CsvFileSource::new(&req.path);
    let report = state.service.import(&source).await?;
    Ok(Json(ImportResponse::new(req.path, report)))
}

/// Handler for POST /players/export
pub async fn export_players_handler(
    State(state): State<AppState>,
    Json(req): Json<TransferRequest>,
) -> Result<Json<ExportResponse>> {
    let sink = JsonFileSink::new(&req.path);
    let exported = state.service.export(&sink).await?;
    Ok(Json(ExportResponse::new(req.path, exported)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.service.cache_stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
