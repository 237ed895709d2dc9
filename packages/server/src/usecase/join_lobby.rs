//! UseCase: `lobby:join`

use std::sync::Arc;

use crate::domain::{
    ConnectionRepository, LobbyCode, LobbyRepository, LobbySnapshot, PlayerId, PlayerName,
    PlayerRemoval,
};

use super::{error::JoinLobbyError, lobby_exit::leave_lobby};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinLobbyOutput {
    pub lobby: LobbySnapshot,
    /// `false` when the player was already inside the lobby.
    pub newly_joined: bool,
    /// Cleanup of the lobby the player was in before, if any.
    pub previous: Option<PlayerRemoval>,
}

pub struct JoinLobbyUseCase {
    lobbies: Arc<dyn LobbyRepository>,
    connections: Arc<dyn ConnectionRepository>,
}

impl JoinLobbyUseCase {
    pub fn new(
        lobbies: Arc<dyn LobbyRepository>,
        connections: Arc<dyn ConnectionRepository>,
    ) -> Self {
        Self {
            lobbies,
            connections,
        }
    }

    /// Add `player_id` to the lobby named by `raw_code`.
    ///
    /// The code is looked up before anything else changes, so a failed join
    /// leaves the player where it was.
    pub async fn execute(
        &self,
        player_id: PlayerId,
        raw_code: Option<&str>,
        name: PlayerName,
    ) -> Result<JoinLobbyOutput, JoinLobbyError> {
        let raw_code = raw_code
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .ok_or(JoinLobbyError::MissingCode)?;
        let code = LobbyCode::parse(raw_code)
            .map_err(|_| JoinLobbyError::LobbyNotFound(raw_code.to_string()))?;

        let current = self
            .connections
            .lobby_of(&player_id)
            .await
            .map_err(|_| JoinLobbyError::PlayerNotConnected(player_id.to_string()))?;

        let Some(target) = self.lobbies.get_snapshot(&code).await else {
            return Err(JoinLobbyError::LobbyNotFound(code.into_string()));
        };

        if current.as_ref() == Some(&code) && target.player(&player_id).is_some() {
            return Ok(JoinLobbyOutput {
                lobby: target,
                newly_joined: false,
                previous: None,
            });
        }

        let previous = match current {
            Some(previous_code) => Some(
                leave_lobby(
                    self.lobbies.as_ref(),
                    self.connections.as_ref(),
                    &previous_code,
                    &player_id,
                )
                .await,
            ),
            None => None,
        };

        let lobby = self
            .lobbies
            .join_lobby(&code, player_id, name)
            .await
            .map_err(|_| JoinLobbyError::LobbyNotFound(code.to_string()))?;

        if self
            .connections
            .set_lobby(&player_id, Some(code.clone()))
            .await
            .is_err()
        {
            self.lobbies.remove_player(&code, &player_id).await;
            return Err(JoinLobbyError::PlayerNotConnected(player_id.to_string()));
        }

        tracing::info!("Player '{}' joined lobby {}", player_id, code);
        Ok(JoinLobbyOutput {
            lobby,
            newly_joined: true,
            previous,
        })
    }
}
