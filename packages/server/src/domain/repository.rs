//! Repository trait 定義
//!
//! Router が更新する 2 つのレジストリのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 依存性の逆転（DIP）
//!
//! - UseCase 層はこの trait にのみ依存する
//! - テストでは実装を差し替えられる
//! - 永続化されたバックエンドもこの trait を実装するだけで利用できる

use async_trait::async_trait;

use super::{
    entity::{ConnectionRecord, LobbySnapshot, PlayerRemoval},
    error::RepositoryError,
    message_pusher::PusherChannel,
    value_object::{LobbyCode, PlayerId, PlayerName, Timestamp},
};

/// Lobby registry: owns every live lobby, keyed by code.
#[async_trait]
pub trait LobbyRepository: Send + Sync {
    /// Create a lobby under a fresh code that no live lobby uses.
    async fn create_lobby(
        &self,
        host_id: PlayerId,
        host_name: PlayerName,
        created_at: Timestamp,
    ) -> LobbySnapshot;

    /// Append a non-host player. Joining a lobby the player is already in
    /// leaves it unchanged.
    async fn join_lobby(
        &self,
        code: &LobbyCode,
        player_id: PlayerId,
        name: PlayerName,
    ) -> Result<LobbySnapshot, RepositoryError>;

    /// Remove a player; removing the host deletes the lobby.
    async fn remove_player(&self, code: &LobbyCode, player_id: &PlayerId) -> PlayerRemoval;

    async fn get_snapshot(&self, code: &LobbyCode) -> Option<LobbySnapshot>;

    /// All live lobbies, oldest first.
    async fn list_snapshots(&self) -> Vec<LobbySnapshot>;

    async fn count_lobbies(&self) -> usize;
}

/// Connection registry: one record per live transport connection.
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// Register a connection under a freshly allocated identity.
    async fn connect(&self, channel: PusherChannel, connected_at: Timestamp) -> PlayerId;

    /// Outbound channel for a live connection.
    async fn resolve(&self, player_id: &PlayerId) -> Option<PusherChannel>;

    /// Remove the record and hand it back, lobby pointer included. Unknown
    /// identities yield `None`.
    async fn disconnect(&self, player_id: &PlayerId) -> Option<ConnectionRecord>;

    async fn set_lobby(
        &self,
        player_id: &PlayerId,
        code: Option<LobbyCode>,
    ) -> Result<(), RepositoryError>;

    /// Lobby the connection currently belongs to.
    async fn lobby_of(&self, player_id: &PlayerId) -> Result<Option<LobbyCode>, RepositoryError>;

    async fn count_connections(&self) -> usize;
}
