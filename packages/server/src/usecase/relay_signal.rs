//! UseCase: `webrtc:signal`
//!
//! Directed relay by identity. The frame is built by the caller; this use case
//! never looks inside the signal.

use std::sync::Arc;

use crate::domain::{MessagePusher, PlayerId};

use super::error::RelaySignalError;

pub struct RelaySignalUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelaySignalUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// Deliver `frame` to the connection identified by `raw_target_id`.
    ///
    /// # Errors
    ///
    /// `TargetNotFound` if the target is malformed, never connected, or has
    /// disconnected. Nothing is delivered in that case.
    pub async fn execute(
        &self,
        raw_target_id: &str,
        frame: &str,
    ) -> Result<PlayerId, RelaySignalError> {
        let target: PlayerId = raw_target_id
            .parse()
            .map_err(|_| RelaySignalError::TargetNotFound(raw_target_id.to_string()))?;

        self.message_pusher
            .push_to(&target, frame)
            .await
            .map_err(|e| {
                tracing::debug!("Relay to '{}' failed: {}", target, e);
                RelaySignalError::TargetNotFound(raw_target_id.to_string())
            })?;

        Ok(target)
    }
}
