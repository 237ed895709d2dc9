//! Domain errors.

use thiserror::Error;

/// A string that cannot be a lobby code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyCodeError {
    #[error("Lobby code is empty")]
    Empty,

    #[error("Lobby code '{0}' must be 8 ASCII letters")]
    InvalidFormat(String),
}

/// A string that cannot be a player identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid player id '{0}'")]
pub struct PlayerIdError(pub String);

/// Registry lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Lobby '{0}' not found")]
    LobbyNotFound(String),

    #[error("Player '{0}' not found")]
    PlayerNotFound(String),
}

/// Outbound delivery failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
