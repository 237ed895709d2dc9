//! MessagePusher trait
//!
//! Outbound delivery to connected players. The use cases and the router only
//! see this trait; the WebSocket implementation lives in the infrastructure
//! layer.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::MessagePushError, value_object::PlayerId};

/// Outbound channel of one connection. Each item is one JSON text frame.
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Push one frame to a single player.
    ///
    /// Fails with `ClientNotFound` if the player is not connected.
    async fn push_to(&self, target: &PlayerId, content: &str) -> Result<(), MessagePushError>;

    /// Push one frame to every target. Missing or closed targets are skipped.
    async fn broadcast(&self, targets: Vec<PlayerId>, content: &str)
    -> Result<(), MessagePushError>;
}
