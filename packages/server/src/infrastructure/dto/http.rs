//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::PlayerDto;

/// Entry of `GET /api/lobbies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbySummaryDto {
    pub code: String,
    pub host_id: String,
    pub player_count: usize,
    /// RFC 3339
    pub created_at: String,
}

/// Body of `GET /api/lobbies/{code}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyDetailDto {
    pub code: String,
    pub host_id: String,
    pub players: Vec<PlayerDto>,
    /// RFC 3339
    pub created_at: String,
}
