//! UseCase: connection closed

use std::sync::Arc;

use lobby_signal_shared::time::now_millis;

use crate::domain::{ConnectionRepository, LobbyRepository, PlayerId, PlayerRemoval};

use super::lobby_exit::leave_lobby;

pub struct DisconnectPlayerUseCase {
    lobbies: Arc<dyn LobbyRepository>,
    connections: Arc<dyn ConnectionRepository>,
}

impl DisconnectPlayerUseCase {
    pub fn new(
        lobbies: Arc<dyn LobbyRepository>,
        connections: Arc<dyn ConnectionRepository>,
    ) -> Self {
        Self {
            lobbies,
            connections,
        }
    }

    /// Drop the connection record and cascade into the lobby it was in.
    ///
    /// Calling this twice for the same player is a no-op the second time.
    pub async fn execute(&self, player_id: &PlayerId) -> PlayerRemoval {
        let Some(record) = self.connections.disconnect(player_id).await else {
            return PlayerRemoval::NotMember;
        };
        tracing::info!(
            "Player '{}' was connected for {} ms",
            record.id,
            now_millis().saturating_sub(record.connected_at.value())
        );

        match record.lobby_code {
            Some(code) => {
                leave_lobby(
                    self.lobbies.as_ref(),
                    self.connections.as_ref(),
                    &code,
                    player_id,
                )
                .await
            }
            None => PlayerRemoval::NotMember,
        }
    }
}
