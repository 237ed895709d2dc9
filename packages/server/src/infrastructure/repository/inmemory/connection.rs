//! InMemory Connection Repository 実装
//!
//! 接続ごとに `ConnectionRecord`（送信チャンネルと所属 Lobby のコード）を保持します。
//!
//! ## 設計ノート
//!
//! Lobby のデータは持たず、所属 Lobby のコードだけを逆参照として持ちます。
//! 切断時にはレコードごと返し、UseCase 層がそのコードで Lobby Registry 側の後始末を行います。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionRecord, ConnectionRepository, LobbyCode, PlayerId, PlayerIdFactory, PusherChannel,
    RepositoryError, Timestamp,
};

/// Connection registry keyed by player identity.
///
/// Doubles as the identity → transport map used for directed relay.
#[derive(Default)]
pub struct InMemoryConnectionRepository {
    connections: Mutex<HashMap<PlayerId, ConnectionRecord>>,
}

impl InMemoryConnectionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn connect(&self, channel: PusherChannel, connected_at: Timestamp) -> PlayerId {
        let mut connections = self.connections.lock().await;

        // v4 collisions are not a practical concern, but an identity must never
        // be handed out twice.
        let id = loop {
            let candidate = PlayerIdFactory::generate();
            if !connections.contains_key(&candidate) {
                break candidate;
            }
        };

        connections.insert(
            id,
            ConnectionRecord {
                id,
                lobby_code: None,
                channel,
                connected_at,
            },
        );
        tracing::debug!("Connection '{}' registered", id);
        id
    }

    async fn resolve(&self, player_id: &PlayerId) -> Option<PusherChannel> {
        let connections = self.connections.lock().await;
        connections
            .get(player_id)
            .filter(|record| !record.channel.is_closed())
            .map(|record| record.channel.clone())
    }

    async fn disconnect(&self, player_id: &PlayerId) -> Option<ConnectionRecord> {
        let mut connections = self.connections.lock().await;
        let record = connections.remove(player_id)?;
        tracing::debug!("Connection '{}' unregistered", player_id);
        Some(record)
    }

    async fn set_lobby(
        &self,
        player_id: &PlayerId,
        code: Option<LobbyCode>,
    ) -> Result<(), RepositoryError> {
        let mut connections = self.connections.lock().await;
        let record = connections
            .get_mut(player_id)
            .ok_or_else(|| RepositoryError::PlayerNotFound(player_id.to_string()))?;
        record.lobby_code = code;
        Ok(())
    }

    async fn lobby_of(&self, player_id: &PlayerId) -> Result<Option<LobbyCode>, RepositoryError> {
        let connections = self.connections.lock().await;
        connections
            .get(player_id)
            .map(|record| record.lobby_code.clone())
            .ok_or_else(|| RepositoryError::PlayerNotFound(player_id.to_string()))
    }

    async fn count_connections(&self) -> usize {
        self.connections.lock().await.len()
    }
}
