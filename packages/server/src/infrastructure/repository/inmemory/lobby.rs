//! InMemory Lobby Repository 実装
//!
//! ドメイン層が定義する LobbyRepository trait の具体的な実装。
//! コード → `Lobby` の HashMap をインメモリ DB として使用します。
//!
//! ## 設計ノート
//!
//! - コードの発行と登録は同じロックの中で行うため、生存中の Lobby と
//!   コードが衝突することはありません（衝突時は引き直し）
//! - 外部に返すのは常に `LobbySnapshot` で、`Lobby` 自体は
//!   このレジストリの外に出ません

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Lobby, LobbyCode, LobbyCodeFactory, LobbyRepository, LobbySnapshot, PlayerId, PlayerName,
    PlayerRemoval, RepositoryError, Timestamp,
};

/// Lobby registry keyed by code.
#[derive(Default)]
pub struct InMemoryLobbyRepository {
    lobbies: Mutex<HashMap<LobbyCode, Lobby>>,
}

impl InMemoryLobbyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LobbyRepository for InMemoryLobbyRepository {
    async fn create_lobby(
        &self,
        host_id: PlayerId,
        host_name: PlayerName,
        created_at: Timestamp,
    ) -> LobbySnapshot {
        let mut lobbies = self.lobbies.lock().await;

        let code = loop {
            let candidate = LobbyCodeFactory::generate();
            if !lobbies.contains_key(&candidate) {
                break candidate;
            }
            tracing::debug!("Lobby code {} collided, drawing again", candidate);
        };

        let lobby = Lobby::new(code.clone(), host_id, host_name, created_at);
        let snapshot = lobby.snapshot();
        lobbies.insert(code, lobby);
        snapshot
    }

    async fn join_lobby(
        &self,
        code: &LobbyCode,
        player_id: PlayerId,
        name: PlayerName,
    ) -> Result<LobbySnapshot, RepositoryError> {
        let mut lobbies = self.lobbies.lock().await;
        let lobby = lobbies
            .get_mut(code)
            .ok_or_else(|| RepositoryError::LobbyNotFound(code.to_string()))?;
        lobby.add_player(player_id, name);
        Ok(lobby.snapshot())
    }

    async fn remove_player(&self, code: &LobbyCode, player_id: &PlayerId) -> PlayerRemoval {
        let mut lobbies = self.lobbies.lock().await;

        let Some(lobby) = lobbies.get_mut(code) else {
            return PlayerRemoval::NotMember;
        };
        if lobby.remove_player(player_id).is_none() {
            return PlayerRemoval::NotMember;
        }

        if lobby.is_host(player_id) {
            let orphaned = lobby.players().iter().map(|p| p.id).collect();
            lobbies.remove(code);
            return PlayerRemoval::LobbyClosed {
                code: code.clone(),
                orphaned,
            };
        }

        PlayerRemoval::PlayerLeft {
            code: code.clone(),
            host_id: lobby.host_id,
            player_id: *player_id,
        }
    }

    async fn get_snapshot(&self, code: &LobbyCode) -> Option<LobbySnapshot> {
        let lobbies = self.lobbies.lock().await;
        lobbies.get(code).map(Lobby::snapshot)
    }

    async fn list_snapshots(&self) -> Vec<LobbySnapshot> {
        let lobbies = self.lobbies.lock().await;
        let mut snapshots: Vec<LobbySnapshot> = lobbies.values().map(Lobby::snapshot).collect();
        snapshots.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.code.cmp(&b.code))
        });
        snapshots
    }

    async fn count_lobbies(&self) -> usize {
        self.lobbies.lock().await.len()
    }
}
