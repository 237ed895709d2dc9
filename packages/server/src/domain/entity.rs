//! Domain entities.

use super::{
    message_pusher::PusherChannel,
    value_object::{LobbyCode, PlayerId, PlayerName, Timestamp},
};

/// A player entry inside a lobby.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: PlayerName,
    pub is_host: bool,
}

/// A multiplayer session container identified by a short code.
///
/// The host is always the first entry of `players` and stays in it for as
/// long as the lobby exists.
#[derive(Debug, Clone)]
pub struct Lobby {
    pub code: LobbyCode,
    pub host_id: PlayerId,
    pub created_at: Timestamp,
    players: Vec<Player>,
}

impl Lobby {
    /// Create a lobby with the host as its sole player.
    pub fn new(
        code: LobbyCode,
        host_id: PlayerId,
        host_name: PlayerName,
        created_at: Timestamp,
    ) -> Self {
        Self {
            code,
            host_id,
            created_at,
            players: vec![Player {
                id: host_id,
                name: host_name,
                is_host: true,
            }],
        }
    }

    /// Players in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn contains(&self, player_id: &PlayerId) -> bool {
        self.players.iter().any(|p| &p.id == player_id)
    }

    pub fn is_host(&self, player_id: &PlayerId) -> bool {
        &self.host_id == player_id
    }

    /// Append a non-host player. Returns `false` if the player is already in.
    pub fn add_player(&mut self, player_id: PlayerId, name: PlayerName) -> bool {
        if self.contains(&player_id) {
            return false;
        }
        self.players.push(Player {
            id: player_id,
            name,
            is_host: false,
        });
        true
    }

    /// Remove a player, returning its entry if it was present.
    ///
    /// Removing the host leaves the lobby in a state that must be discarded
    /// by the caller.
    pub fn remove_player(&mut self, player_id: &PlayerId) -> Option<Player> {
        let index = self.players.iter().position(|p| &p.id == player_id)?;
        Some(self.players.remove(index))
    }

    /// Read-only projection used in outbound payloads.
    pub fn snapshot(&self) -> LobbySnapshot {
        LobbySnapshot {
            code: self.code.clone(),
            host_id: self.host_id,
            players: self.players.clone(),
            created_at: self.created_at,
        }
    }
}

/// Immutable view of a lobby at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbySnapshot {
    pub code: LobbyCode,
    pub host_id: PlayerId,
    pub players: Vec<Player>,
    pub created_at: Timestamp,
}

impl LobbySnapshot {
    pub fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == player_id)
    }
}

/// Result of removing a player from a lobby.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerRemoval {
    /// No such lobby, or the player was not in it.
    NotMember,
    /// A non-host player left; the lobby lives on.
    PlayerLeft {
        code: LobbyCode,
        host_id: PlayerId,
        player_id: PlayerId,
    },
    /// The host left and the lobby is gone. `orphaned` lists the players that
    /// were still inside, in join order.
    LobbyClosed {
        code: LobbyCode,
        orphaned: Vec<PlayerId>,
    },
}

/// One live transport connection.
#[derive(Debug, Clone)]
pub struct ConnectionRecord {
    pub id: PlayerId,
    pub lobby_code: Option<LobbyCode>,
    pub channel: PusherChannel,
    pub connected_at: Timestamp,
}
