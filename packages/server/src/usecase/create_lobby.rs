//! UseCase: `lobby:create`
//!
//! A connection belongs to at most one lobby. Creating a lobby while already
//! inside one first leaves the old lobby; if the creator hosted it, that lobby
//! is closed rather than left behind without anyone able to close it.

use std::sync::Arc;

use lobby_signal_shared::time::now_millis;

use crate::domain::{
    ConnectionRepository, LobbyRepository, LobbySnapshot, PlayerId, PlayerName, PlayerRemoval,
    Timestamp,
};

use super::{error::CreateLobbyError, lobby_exit::leave_lobby};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLobbyOutput {
    pub lobby: LobbySnapshot,
    /// Cleanup of the lobby the creator was in before, if any.
    pub previous: Option<PlayerRemoval>,
}

pub struct CreateLobbyUseCase {
    lobbies: Arc<dyn LobbyRepository>,
    connections: Arc<dyn ConnectionRepository>,
}

impl CreateLobbyUseCase {
    pub fn new(
        lobbies: Arc<dyn LobbyRepository>,
        connections: Arc<dyn ConnectionRepository>,
    ) -> Self {
        Self {
            lobbies,
            connections,
        }
    }

    /// Create a lobby hosted by `host_id`.
    ///
    /// # Errors
    ///
    /// `PlayerNotConnected` if `host_id` has no live connection.
    pub async fn execute(
        &self,
        host_id: PlayerId,
        host_name: PlayerName,
    ) -> Result<CreateLobbyOutput, CreateLobbyError> {
        let current = self
            .connections
            .lobby_of(&host_id)
            .await
            .map_err(|_| CreateLobbyError::PlayerNotConnected(host_id.to_string()))?;

        let previous = match current {
            Some(code) => Some(
                leave_lobby(
                    self.lobbies.as_ref(),
                    self.connections.as_ref(),
                    &code,
                    &host_id,
                )
                .await,
            ),
            None => None,
        };

        let lobby = self
            .lobbies
            .create_lobby(host_id, host_name, Timestamp::new(now_millis()))
            .await;

        if self
            .connections
            .set_lobby(&host_id, Some(lobby.code.clone()))
            .await
            .is_err()
        {
            self.lobbies.remove_player(&lobby.code, &host_id).await;
            return Err(CreateLobbyError::PlayerNotConnected(host_id.to_string()));
        }

        tracing::info!("Lobby {} created by '{}'", lobby.code, host_id);
        Ok(CreateLobbyOutput { lobby, previous })
    }
}
