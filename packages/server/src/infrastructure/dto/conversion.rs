//! Conversions from domain types to DTOs.

use lobby_signal_shared::time::timestamp_to_rfc3339;

use crate::domain::{LobbySnapshot, Player, PlayerId};

use super::{
    http::{LobbyDetailDto, LobbySummaryDto},
    websocket::{LobbyDto, LobbyEnteredPayload, PlayerDto},
};

impl From<&Player> for PlayerDto {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.to_string(),
            name: player.name.as_str().to_string(),
            is_host: player.is_host,
        }
    }
}

impl From<&LobbySnapshot> for LobbyDto {
    fn from(snapshot: &LobbySnapshot) -> Self {
        Self {
            code: snapshot.code.as_str().to_string(),
            host_id: snapshot.host_id.to_string(),
            players: snapshot.players.iter().map(PlayerDto::from).collect(),
        }
    }
}

impl LobbyEnteredPayload {
    /// Payload telling `player_id` it is now inside `snapshot`.
    pub fn new(player_id: &PlayerId, snapshot: &LobbySnapshot) -> Self {
        Self {
            code: snapshot.code.as_str().to_string(),
            player_id: player_id.to_string(),
            host_id: snapshot.host_id.to_string(),
            lobby: snapshot.into(),
        }
    }
}

impl From<&LobbySnapshot> for LobbySummaryDto {
    fn from(snapshot: &LobbySnapshot) -> Self {
        Self {
            code: snapshot.code.as_str().to_string(),
            host_id: snapshot.host_id.to_string(),
            player_count: snapshot.players.len(),
            created_at: timestamp_to_rfc3339(snapshot.created_at.value()),
        }
    }
}

impl From<&LobbySnapshot> for LobbyDetailDto {
    fn from(snapshot: &LobbySnapshot) -> Self {
        Self {
            code: snapshot.code.as_str().to_string(),
            host_id: snapshot.host_id.to_string(),
            players: snapshot.players.iter().map(PlayerDto::from).collect(),
            created_at: timestamp_to_rfc3339(snapshot.created_at.value()),
        }
    }
}
