//! UseCase errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateLobbyError {
    #[error("Player '{0}' is not connected")]
    PlayerNotConnected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinLobbyError {
    #[error("Lobby code is required")]
    MissingCode,

    #[error("Lobby '{0}' not found")]
    LobbyNotFound(String),

    #[error("Player '{0}' is not connected")]
    PlayerNotConnected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelaySignalError {
    #[error("Target peer '{0}' not found")]
    TargetNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetLobbyDetailError {
    #[error("Lobby '{0}' not found")]
    LobbyNotFound(String),
}
