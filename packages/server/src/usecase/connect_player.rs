//! UseCase: connection accepted

use std::sync::Arc;

use lobby_signal_shared::time::now_millis;

use crate::domain::{ConnectionRepository, PlayerId, PusherChannel, Timestamp};

/// Assigns an identity to a freshly accepted connection.
pub struct ConnectPlayerUseCase {
    connections: Arc<dyn ConnectionRepository>,
}

impl ConnectPlayerUseCase {
    pub fn new(connections: Arc<dyn ConnectionRepository>) -> Self {
        Self { connections }
    }

    /// Register the connection's outbound channel and return its identity.
    pub async fn execute(&self, channel: PusherChannel) -> PlayerId {
        self.connections
            .connect(channel, Timestamp::new(now_millis()))
            .await
    }

    pub async fn count_connections(&self) -> usize {
        self.connections.count_connections().await
    }
}
