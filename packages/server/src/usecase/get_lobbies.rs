//! UseCase: list live lobbies

use std::sync::Arc;

use crate::domain::{LobbyRepository, LobbySnapshot};

pub struct GetLobbiesUseCase {
    lobbies: Arc<dyn LobbyRepository>,
}

impl GetLobbiesUseCase {
    pub fn new(lobbies: Arc<dyn LobbyRepository>) -> Self {
        Self { lobbies }
    }

    /// All live lobbies, oldest first.
    pub async fn execute(&self) -> Vec<LobbySnapshot> {
        self.lobbies.list_snapshots().await
    }
}
