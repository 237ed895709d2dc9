//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 宛先 `PlayerId` を Connection Registry で送信チャンネルに解決
//! - 解決したチャンネルへのフレーム送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成と `UnboundedSender` の登録は UI 層
//! （`ui/handler/websocket.rs`）と `ConnectPlayerUseCase` が行います。
//! この実装は sender を自分で保持せず、送信のたびに `ConnectionRepository`
//! から引き直します。
//!
//! - UI 層: WebSocket 接続の受付、sender の生成と登録
//! - Connection Registry: identity → sender の対応を唯一の情報源として保持
//! - Infrastructure 層（この実装）: 宛先の解決とメッセージ送信
//!
//! 受信側が既に閉じている接続は `resolve` の時点で除外されるため、
//! 切断済みの宛先は `ClientNotFound` になります。

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{ConnectionRepository, MessagePushError, MessagePusher, PlayerId};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let connections: Arc<dyn ConnectionRepository> = Arc::new(InMemoryConnectionRepository::new());
/// let pusher = WebSocketMessagePusher::new(connections.clone());
///
/// pusher.push_to(&player_id, r#"{"type":"lobby:closed","payload":{"code":"ABCDEFGH"}}"#).await?;
/// ```
pub struct WebSocketMessagePusher {
    /// 宛先解決に使う Connection Registry
    connections: Arc<dyn ConnectionRepository>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    ///
    /// `connections` は UseCase 層と共有されます。
    pub fn new(connections: Arc<dyn ConnectionRepository>) -> Self {
        Self { connections }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn push_to(&self, target: &PlayerId, content: &str) -> Result<(), MessagePushError> {
        let sender = self
            .connections
            .resolve(target)
            .await
            .ok_or_else(|| MessagePushError::ClientNotFound(target.to_string()))?;

        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to client '{}'", target);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<PlayerId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        for target in targets {
            // A peer that vanished mid-broadcast must not stop the others.
            if let Err(e) = self.push_to(&target, content).await {
                tracing::warn!("Skipping client '{}' during broadcast: {}", target, e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::{
        domain::{PlayerIdFactory, Timestamp},
        infrastructure::repository::InMemoryConnectionRepository,
    };

    fn create_test_pusher() -> (WebSocketMessagePusher, Arc<InMemoryConnectionRepository>) {
        let connections = Arc::new(InMemoryConnectionRepository::new());
        let pusher = WebSocketMessagePusher::new(connections.clone());
        (pusher, connections)
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 接続中のクライアントにメッセージを送信できる
        // given (前提条件):
        let (pusher, connections) = create_test_pusher();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let alice = connections.connect(tx, Timestamp::new(1)).await;

        // when (操作):
        let result = pusher.push_to(&alice, "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しないクライアントへの送信はエラーを返す
        // given (前提条件):
        let (pusher, _connections) = create_test_pusher();

        // when (操作):
        let result = pusher.push_to(&PlayerIdFactory::generate(), "Hello").await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_push_to_disconnected_client() {
        // テスト項目: 切断済みクライアントへの送信はエラーを返す
        // given (前提条件):
        let (pusher, connections) = create_test_pusher();
        let (tx, _rx) = mpsc::unbounded_channel();
        let alice = connections.connect(tx, Timestamp::new(1)).await;
        connections.disconnect(&alice).await;

        // when (操作):
        let result = pusher.push_to(&alice, "Hello").await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: 一部のクライアントが存在しなくてもブロードキャストは成功する
        // given (前提条件):
        let (pusher, connections) = create_test_pusher();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let alice = connections.connect(tx1, Timestamp::new(1)).await;
        let bob = connections.connect(tx2, Timestamp::new(2)).await;

        // when (操作):
        let targets = vec![alice, PlayerIdFactory::generate(), bob];
        let result = pusher.broadcast(targets, "Broadcast message").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
        assert_eq!(rx2.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_empty_targets() {
        // テスト項目: 空のターゲットリストでもエラーにならない
        let (pusher, _connections) = create_test_pusher();
        assert!(pusher.broadcast(vec![], "Message").await.is_ok());
    }
}
