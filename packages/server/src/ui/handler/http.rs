//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{LobbyDetailDto, LobbySummaryDto},
    ui::state::AppState,
    usecase::GetLobbyDetailError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// List live lobbies
pub async fn get_lobbies(State(state): State<Arc<AppState>>) -> Json<Vec<LobbySummaryDto>> {
    let lobbies = state.get_lobbies_usecase.execute().await;
    Json(lobbies.iter().map(LobbySummaryDto::from).collect())
}

/// Get one lobby by code
pub async fn get_lobby_detail(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<LobbyDetailDto>, StatusCode> {
    match state.get_lobby_detail_usecase.execute(&code).await {
        Ok(lobby) => Ok(Json(LobbyDetailDto::from(&lobby))),
        Err(GetLobbyDetailError::LobbyNotFound(_)) => Err(StatusCode::NOT_FOUND),
    }
}
