//! UseCase: look up one lobby

use std::sync::Arc;

use crate::domain::{LobbyCode, LobbyRepository, LobbySnapshot};

use super::error::GetLobbyDetailError;

pub struct GetLobbyDetailUseCase {
    lobbies: Arc<dyn LobbyRepository>,
}

impl GetLobbyDetailUseCase {
    pub fn new(lobbies: Arc<dyn LobbyRepository>) -> Self {
        Self { lobbies }
    }

    /// Snapshot of the lobby named by `raw_code`, normalized like a join.
    pub async fn execute(&self, raw_code: &str) -> Result<LobbySnapshot, GetLobbyDetailError> {
        let not_found = || GetLobbyDetailError::LobbyNotFound(raw_code.to_string());
        let code = LobbyCode::parse(raw_code).map_err(|_| not_found())?;
        self.lobbies.get_snapshot(&code).await.ok_or_else(not_found)
    }
}
