//! Domain layer.
//!
//! Lobby and connection models, plus the seams the use cases depend on:
//! - `LobbyRepository`: the lobby registry
//! - `ConnectionRepository`: the connection registry
//! - `MessagePusher`: outbound delivery to a connected player

pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{ConnectionRecord, Lobby, LobbySnapshot, Player, PlayerRemoval};
pub use error::{LobbyCodeError, MessagePushError, PlayerIdError, RepositoryError};
pub use factory::{LobbyCodeFactory, PlayerIdFactory};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{ConnectionRepository, LobbyRepository};
pub use value_object::{LobbyCode, PlayerId, PlayerName, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
