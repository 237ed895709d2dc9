//! Message router.
//!
//! Dispatches each inbound frame by its `type` to a use case and pushes the
//! resulting responses and peer notifications. Every failure is answered with
//! a single frame to the sender; nothing here closes a connection.
//!
//! Dispatch is serialized: one inbound frame (or one disconnect) is handled to
//! completion before the next starts, so no two handlers interleave on the
//! same lobby.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use tokio::sync::Mutex;

use crate::{
    domain::{MessagePusher, PlayerId, PlayerName, PlayerRemoval},
    infrastructure::dto::websocket::{
        CreateLobbyPayload, ErrorPayload, InboundEnvelope, JoinLobbyPayload, LobbyClosedPayload,
        LobbyEnteredPayload, MessageType, OutboundMessage, PeerJoinedPayload, PeerLeftPayload,
        SignalPayload, SignalRelayPayload,
    },
    usecase::{
        CreateLobbyUseCase, DisconnectPlayerUseCase, JoinLobbyError, JoinLobbyUseCase,
        RelaySignalUseCase,
    },
};

pub const INVALID_MESSAGE_FORMAT: &str = "Invalid message format";
pub const LOBBY_CODE_REQUIRED: &str = "Lobby code is required";
pub const LOBBY_NOT_FOUND: &str = "Lobby not found";
pub const TARGET_PEER_NOT_FOUND: &str = "Target peer not found";
pub const PLAYER_NOT_CONNECTED: &str = "Player not connected";

pub struct MessageRouter {
    create_lobby_usecase: Arc<CreateLobbyUseCase>,
    join_lobby_usecase: Arc<JoinLobbyUseCase>,
    relay_signal_usecase: Arc<RelaySignalUseCase>,
    disconnect_player_usecase: Arc<DisconnectPlayerUseCase>,
    message_pusher: Arc<dyn MessagePusher>,
    dispatch_lock: Mutex<()>,
}

impl MessageRouter {
    pub fn new(
        create_lobby_usecase: Arc<CreateLobbyUseCase>,
        join_lobby_usecase: Arc<JoinLobbyUseCase>,
        relay_signal_usecase: Arc<RelaySignalUseCase>,
        disconnect_player_usecase: Arc<DisconnectPlayerUseCase>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            create_lobby_usecase,
            join_lobby_usecase,
            relay_signal_usecase,
            disconnect_player_usecase,
            message_pusher,
            dispatch_lock: Mutex::new(()),
        }
    }

    /// Handle one text frame received from `sender`.
    ///
    /// The dispatch runs on its own task: cancelling the caller leaves it to
    /// finish, so both registries are always updated together.
    pub async fn route(self: &Arc<Self>, sender: &PlayerId, text: &str) {
        let router = Arc::clone(self);
        let sender = *sender;
        let text = text.to_string();
        run_detached(async move { router.dispatch(&sender, &text).await }).await;
    }

    /// Handle one binary frame; it must carry the same UTF-8 JSON as a text
    /// frame.
    pub async fn route_binary(self: &Arc<Self>, sender: &PlayerId, bytes: &[u8]) {
        match std::str::from_utf8(bytes) {
            Ok(text) => self.route(sender, text).await,
            Err(e) => {
                tracing::warn!("Binary frame from '{}' is not UTF-8: {}", sender, e);
                self.send_error(sender, MessageType::Error, INVALID_MESSAGE_FORMAT)
                    .await;
            }
        }
    }

    /// Clean up after `player_id`'s transport closed.
    pub async fn disconnect(self: &Arc<Self>, player_id: &PlayerId) {
        let router = Arc::clone(self);
        let player_id = *player_id;
        run_detached(async move {
            let _guard = router.dispatch_lock.lock().await;
            let removal = router.disconnect_player_usecase.execute(&player_id).await;
            router.announce_removal(&removal).await;
        })
        .await;
    }

    async fn dispatch(&self, sender: &PlayerId, text: &str) {
        let _guard = self.dispatch_lock.lock().await;

        let envelope = match serde_json::from_str::<InboundEnvelope>(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!("Malformed frame from '{}': {}", sender, e);
                self.send_error(sender, MessageType::Error, INVALID_MESSAGE_FORMAT)
                    .await;
                return;
            }
        };

        match MessageType::from_inbound(&envelope.r#type) {
            Some(MessageType::LobbyCreate) => self.handle_create(sender, envelope.payload).await,
            Some(MessageType::LobbyJoin) => self.handle_join(sender, envelope.payload).await,
            Some(MessageType::WebRtcSignal) => self.handle_signal(sender, envelope.payload).await,
            _ => {
                tracing::warn!(
                    "Unknown message type '{}' from '{}'",
                    envelope.r#type,
                    sender
                );
                self.send_error(
                    sender,
                    MessageType::Error,
                    format!("Unknown message type: {}", envelope.r#type),
                )
                .await;
            }
        }
    }

    async fn handle_create(&self, sender: &PlayerId, payload: Option<&RawValue>) {
        let payload: CreateLobbyPayload = match decode_payload(payload) {
            Ok(payload) => payload,
            Err(e) => return self.reject_malformed(sender, e).await,
        };
        let name = PlayerName::new(payload.player_name.as_deref());

        match self.create_lobby_usecase.execute(*sender, name).await {
            Ok(output) => {
                if let Some(previous) = &output.previous {
                    self.announce_removal(previous).await;
                }
                self.send(
                    sender,
                    MessageType::LobbyCreated,
                    LobbyEnteredPayload::new(sender, &output.lobby),
                )
                .await;
            }
            Err(e) => {
                tracing::warn!("lobby:create failed: {}", e);
                self.send_error(sender, MessageType::LobbyError, PLAYER_NOT_CONNECTED)
                    .await;
            }
        }
    }

    async fn handle_join(&self, sender: &PlayerId, payload: Option<&RawValue>) {
        let payload: JoinLobbyPayload = match decode_payload(payload) {
            Ok(payload) => payload,
            Err(e) => return self.reject_malformed(sender, e).await,
        };
        let name = PlayerName::new(payload.player_name.as_deref());

        let output = match self
            .join_lobby_usecase
            .execute(*sender, payload.code.as_deref(), name)
            .await
        {
            Ok(output) => output,
            Err(e) => {
                tracing::info!("lobby:join from '{}' rejected: {}", sender, e);
                let reason = match e {
                    JoinLobbyError::MissingCode => LOBBY_CODE_REQUIRED,
                    JoinLobbyError::LobbyNotFound(_) => LOBBY_NOT_FOUND,
                    JoinLobbyError::PlayerNotConnected(_) => PLAYER_NOT_CONNECTED,
                };
                self.send_error(sender, MessageType::LobbyError, reason).await;
                return;
            }
        };

        if let Some(previous) = &output.previous {
            self.announce_removal(previous).await;
        }
        self.send(
            sender,
            MessageType::LobbyJoined,
            LobbyEnteredPayload::new(sender, &output.lobby),
        )
        .await;

        if !output.newly_joined {
            return;
        }
        if let Some(player) = output.lobby.player(sender) {
            self.send(
                &output.lobby.host_id,
                MessageType::LobbyPeerJoined,
                PeerJoinedPayload {
                    player_id: player.id.to_string(),
                    player_name: player.name.as_str().to_string(),
                },
            )
            .await;
        }
    }

    async fn handle_signal(&self, sender: &PlayerId, payload: Option<&RawValue>) {
        let payload: SignalPayload = match decode_payload(payload) {
            Ok(payload) => payload,
            Err(e) => return self.reject_malformed(sender, e).await,
        };

        let relay = OutboundMessage::new(
            MessageType::WebRtcSignal,
            SignalRelayPayload {
                from_id: sender.to_string(),
                signal: payload.signal,
            },
        );
        let frame = match relay.to_json() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to encode relayed signal: {}", e);
                return;
            }
        };

        match self
            .relay_signal_usecase
            .execute(&payload.target_id, &frame)
            .await
        {
            Ok(target) => tracing::debug!("Relayed signal '{}' -> '{}'", sender, target),
            Err(e) => {
                tracing::info!("Signal from '{}' dropped: {}", sender, e);
                self.send_error(sender, MessageType::LobbyError, TARGET_PEER_NOT_FOUND)
                    .await;
            }
        }
    }

    /// Notify whoever is affected by a player leaving a lobby.
    async fn announce_removal(&self, removal: &PlayerRemoval) {
        match removal {
            PlayerRemoval::LobbyClosed { code, orphaned } => {
                let closed = OutboundMessage::new(
                    MessageType::LobbyClosed,
                    LobbyClosedPayload {
                        code: code.as_str().to_string(),
                    },
                );
                match closed.to_json() {
                    Ok(frame) => {
                        if let Err(e) = self.message_pusher.broadcast(orphaned.clone(), &frame).await
                        {
                            tracing::warn!("Failed to broadcast lobby:closed: {}", e);
                        }
                    }
                    Err(e) => tracing::error!("Failed to encode lobby:closed: {}", e),
                }
            }
            PlayerRemoval::PlayerLeft {
                host_id, player_id, ..
            } => {
                self.send(
                    host_id,
                    MessageType::LobbyPeerLeft,
                    PeerLeftPayload {
                        player_id: player_id.to_string(),
                    },
                )
                .await;
            }
            PlayerRemoval::NotMember => {}
        }
    }

    async fn reject_malformed(&self, sender: &PlayerId, error: serde_json::Error) {
        tracing::warn!("Malformed payload from '{}': {}", sender, error);
        self.send_error(sender, MessageType::Error, INVALID_MESSAGE_FORMAT)
            .await;
    }

    async fn send_error(&self, target: &PlayerId, r#type: MessageType, message: impl Into<String>) {
        self.send(
            target,
            r#type,
            ErrorPayload {
                message: message.into(),
            },
        )
        .await;
    }

    async fn send<T: Serialize + Send>(&self, target: &PlayerId, r#type: MessageType, payload: T) {
        let frame = match OutboundMessage::new(r#type, payload).to_json() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to encode {}: {}", r#type.as_str(), e);
                return;
            }
        };
        if let Err(e) = self.message_pusher.push_to(target, &frame).await {
            tracing::warn!("Failed to send {} to '{}': {}", r#type.as_str(), target, e);
        }
    }
}

/// Await `work` on a separate task. Dropping the returned future detaches
/// the task instead of cancelling it.
async fn run_detached<F>(work: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Err(e) = tokio::spawn(work).await {
        tracing::error!("Dispatch task failed: {}", e);
    }
}

/// Decode a payload; a missing payload decodes like `{}`.
fn decode_payload<'a, T: Deserialize<'a>>(payload: Option<&'a RawValue>) -> serde_json::Result<T> {
    serde_json::from_str(payload.map_or("{}", RawValue::get))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use serde_json::Value;
    use tokio::sync::{Notify, mpsc};

    use super::*;
    use crate::{
        domain::{
            ConnectionRecord, ConnectionRepository, LobbyCode, LobbyRepository, PlayerIdFactory,
            PusherChannel, RepositoryError, Timestamp,
        },
        infrastructure::{
            message_pusher::WebSocketMessagePusher,
            repository::{InMemoryConnectionRepository, InMemoryLobbyRepository},
        },
    };

    // ========================================
    // 【何をテストするか】
    // - MessageRouter が type ごとに正しいユースケースへ振り分けること
    // - 応答・通知が正しい相手にだけ、正しい形で届くこと
    //
    // 【どのようなシナリオをテストするか】
    // 1. lobby:create / lobby:join の成功・失敗
    // 2. ホスト切断による lobby:closed、参加者切断による lobby:peer-left
    // 3. webrtc:signal の中継と宛先不明時のエラー
    // 4. 不正なフレームへの error 応答（接続は維持される）
    // ========================================

    struct TestClient {
        id: PlayerId,
        rx: mpsc::UnboundedReceiver<String>,
    }

    impl TestClient {
        fn next_raw(&mut self) -> String {
            self.rx.try_recv().expect("expected a pending frame")
        }

        fn next(&mut self) -> Value {
            serde_json::from_str(&self.next_raw()).expect("frame should be JSON")
        }

        fn assert_silent(&mut self) {
            assert!(self.rx.try_recv().is_err(), "unexpected frame");
        }
    }

    struct Harness {
        router: Arc<MessageRouter>,
        lobbies: Arc<InMemoryLobbyRepository>,
        connections: Arc<InMemoryConnectionRepository>,
    }

    impl Harness {
        fn new() -> Self {
            let lobbies = Arc::new(InMemoryLobbyRepository::new());
            let connections = Arc::new(InMemoryConnectionRepository::new());
            let message_pusher = Arc::new(WebSocketMessagePusher::new(connections.clone()));
            let router = Arc::new(MessageRouter::new(
                Arc::new(CreateLobbyUseCase::new(lobbies.clone(), connections.clone())),
                Arc::new(JoinLobbyUseCase::new(lobbies.clone(), connections.clone())),
                Arc::new(RelaySignalUseCase::new(message_pusher.clone())),
                Arc::new(DisconnectPlayerUseCase::new(
                    lobbies.clone(),
                    connections.clone(),
                )),
                message_pusher,
            ));
            Self {
                router,
                lobbies,
                connections,
            }
        }

        async fn connect(&self) -> TestClient {
            let (tx, rx) = mpsc::unbounded_channel();
            let id = self.connections.connect(tx, Timestamp::new(0)).await;
            TestClient { id, rx }
        }

        async fn send(&self, client: &TestClient, frame: Value) {
            self.router.route(&client.id, &frame.to_string()).await;
        }

        /// `client` creates a lobby; returns its code.
        async fn create(&self, client: &mut TestClient, name: &str) -> String {
            self.send(
                client,
                serde_json::json!({"type": "lobby:create", "payload": {"playerName": name}}),
            )
            .await;
            let created = client.next();
            assert_eq!(created["type"], "lobby:created");
            created["payload"]["code"].as_str().unwrap().to_string()
        }

        async fn join(&self, client: &TestClient, code: &str, name: &str) {
            self.send(
                client,
                serde_json::json!({"type": "lobby:join", "payload": {"code": code, "playerName": name}}),
            )
            .await;
        }
    }

    #[tokio::test]
    async fn test_create_lobby_replies_with_snapshot() {
        // テスト項目: lobby:create で作成者がホストとして 1 度だけ含まれる
        // given (前提条件):
        let harness = Harness::new();
        let mut alice = harness.connect().await;

        // when (操作):
        harness
            .send(
                &alice,
                serde_json::json!({"type": "lobby:create", "payload": {"playerName": "alice"}}),
            )
            .await;

        // then (期待する結果):
        let frame = alice.next();
        let payload = &frame["payload"];
        assert_eq!(frame["type"], "lobby:created");
        let code = payload["code"].as_str().unwrap();
        assert!(LobbyCode::parse(code).is_ok());
        assert_eq!(code.len(), 8);
        assert_eq!(payload["playerId"], alice.id.to_string());
        assert_eq!(payload["hostId"], alice.id.to_string());
        assert_eq!(payload["lobby"]["code"], code);
        assert_eq!(
            payload["lobby"]["players"],
            serde_json::json!([{"id": alice.id.to_string(), "name": "alice", "isHost": true}])
        );
        alice.assert_silent();
    }

    #[tokio::test]
    async fn test_create_without_payload_uses_default_name() {
        // テスト項目: payload を省略した lobby:create はデフォルト名で作成される
        // given (前提条件):
        let harness = Harness::new();
        let mut alice = harness.connect().await;

        // when (操作):
        harness
            .send(&alice, serde_json::json!({"type": "lobby:create"}))
            .await;

        // then (期待する結果):
        let frame = alice.next();
        assert_eq!(frame["payload"]["lobby"]["players"][0]["name"], "Player");
    }

    #[tokio::test]
    async fn test_join_notifies_host() {
        // テスト項目: 参加者に lobby:joined、ホストに同じ ID の lobby:peer-joined が届く
        // given (前提条件):
        let harness = Harness::new();
        let mut alice = harness.connect().await;
        let mut bob = harness.connect().await;
        let code = harness.create(&mut alice, "alice").await;

        // when (操作):
        harness.join(&bob, &code.to_lowercase(), "bob").await;

        // then (期待する結果):
        let joined = bob.next();
        assert_eq!(joined["type"], "lobby:joined");
        assert_eq!(joined["payload"]["code"], code);
        assert_eq!(joined["payload"]["playerId"], bob.id.to_string());
        assert_eq!(joined["payload"]["hostId"], alice.id.to_string());
        let players = joined["payload"]["lobby"]["players"].as_array().unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0]["id"], alice.id.to_string());
        assert_eq!(players[1]["id"], bob.id.to_string());
        assert_eq!(players[1]["isHost"], false);

        let peer_joined = alice.next();
        assert_eq!(
            peer_joined,
            serde_json::json!({
                "type": "lobby:peer-joined",
                "payload": {"playerId": players[1]["id"], "playerName": "bob"}
            })
        );
        alice.assert_silent();
        bob.assert_silent();
    }

    #[tokio::test]
    async fn test_join_unknown_code_replies_lobby_error() {
        // テスト項目: 存在しないコードでの参加は lobby:error のみで、状態は変化しない
        // given (前提条件):
        let harness = Harness::new();
        let mut alice = harness.connect().await;
        let mut bob = harness.connect().await;
        let code = harness.create(&mut alice, "alice").await;
        let before = harness.lobbies.list_snapshots().await;

        // when (操作):
        harness.join(&bob, "ZZZZZZZZ", "bob").await;

        // then (期待する結果):
        assert_eq!(
            bob.next(),
            serde_json::json!({"type": "lobby:error", "payload": {"message": LOBBY_NOT_FOUND}})
        );
        bob.assert_silent();
        alice.assert_silent();
        assert_eq!(harness.lobbies.list_snapshots().await, before);
        assert_ne!(code, "ZZZZZZZZ");
    }

    #[tokio::test]
    async fn test_join_without_code_replies_lobby_error() {
        // テスト項目: コードのない lobby:join は lobby:error になる
        // given (前提条件):
        let harness = Harness::new();
        let mut bob = harness.connect().await;

        // when (操作):
        harness
            .send(&bob, serde_json::json!({"type": "lobby:join", "payload": {}}))
            .await;

        // then (期待する結果):
        assert_eq!(bob.next()["payload"]["message"], LOBBY_CODE_REQUIRED);
    }

    #[tokio::test]
    async fn test_host_disconnect_closes_lobby_for_every_peer() {
        // テスト項目: ホスト切断で残りの N 人に lobby:closed が 1 通ずつ届き、コードは無効になる
        // given (前提条件):
        let harness = Harness::new();
        let mut alice = harness.connect().await;
        let mut bob = harness.connect().await;
        let mut carol = harness.connect().await;
        let code = harness.create(&mut alice, "alice").await;
        harness.join(&bob, &code, "bob").await;
        harness.join(&carol, &code, "carol").await;
        bob.next();
        carol.next();
        alice.next();
        alice.next();

        // when (操作):
        harness.router.disconnect(&alice.id).await;

        // then (期待する結果):
        let closed = serde_json::json!({"type": "lobby:closed", "payload": {"code": code}});
        assert_eq!(bob.next(), closed);
        assert_eq!(carol.next(), closed);
        bob.assert_silent();
        carol.assert_silent();
        assert_eq!(harness.lobbies.count_lobbies().await, 0);

        let mut dave = harness.connect().await;
        harness.join(&dave, &code, "dave").await;
        assert_eq!(dave.next()["type"], "lobby:error");
    }

    #[tokio::test]
    async fn test_guest_disconnect_notifies_host_once() {
        // テスト項目: 参加者の切断でホストに lobby:peer-left が 1 通だけ届き、Lobby は存続する
        // given (前提条件):
        let harness = Harness::new();
        let mut alice = harness.connect().await;
        let mut bob = harness.connect().await;
        let code = harness.create(&mut alice, "alice").await;
        harness.join(&bob, &code, "bob").await;
        bob.next();
        alice.next();

        // when (操作):
        harness.router.disconnect(&bob.id).await;
        harness.router.disconnect(&bob.id).await;

        // then (期待する結果):
        assert_eq!(
            alice.next(),
            serde_json::json!({"type": "lobby:peer-left", "payload": {"playerId": bob.id.to_string()}})
        );
        alice.assert_silent();

        let mut carol = harness.connect().await;
        harness.join(&carol, &code, "carol").await;
        assert_eq!(carol.next()["type"], "lobby:joined");
        assert_eq!(alice.next()["type"], "lobby:peer-joined");
    }

    #[tokio::test]
    async fn test_signal_is_relayed_verbatim() {
        // テスト項目: webrtc:signal は fromId 付きで signal をそのまま宛先へ届ける
        // given (前提条件):
        let harness = Harness::new();
        let mut alice = harness.connect().await;
        let mut bob = harness.connect().await;
        let signal = r#"{"type":"offer", "sdp":"v=0\r\no=- 1 2 IN IP4 127.0.0.1\r\n", "n": 1.10}"#;
        let frame = format!(
            r#"{{"type":"webrtc:signal","payload":{{"targetId":"{}","signal":{}}}}}"#,
            bob.id, signal
        );

        // when (操作):
        harness.router.route(&alice.id, &frame).await;

        // then (期待する結果):
        let received = bob.next_raw();
        assert_eq!(
            received,
            format!(
                r#"{{"type":"webrtc:signal","payload":{{"fromId":"{}","signal":{}}}}}"#,
                alice.id, signal
            )
        );
        alice.assert_silent();
        bob.assert_silent();
    }

    #[tokio::test]
    async fn test_signal_to_unknown_target_replies_lobby_error() {
        // テスト項目: 未接続・切断済みの宛先への signal は送信者にのみ lobby:error が返る
        // given (前提条件):
        let harness = Harness::new();
        let mut alice = harness.connect().await;
        let mut bob = harness.connect().await;
        let gone = harness.connect().await;
        harness.router.disconnect(&gone.id).await;
        let targets = [PlayerIdFactory::generate().to_string(), gone.id.to_string(), "nobody".to_string()];

        for target in targets {
            // when (操作):
            harness
                .send(
                    &alice,
                    serde_json::json!({"type": "webrtc:signal", "payload": {"targetId": target, "signal": {"candidate": "x"}}}),
                )
                .await;

            // then (期待する結果):
            assert_eq!(
                alice.next(),
                serde_json::json!({"type": "lobby:error", "payload": {"message": TARGET_PEER_NOT_FOUND}})
            );
        }
        alice.assert_silent();
        bob.assert_silent();
    }

    #[tokio::test]
    async fn test_malformed_frames_reply_error_and_keep_connection() {
        // テスト項目: 不正な JSON・未知の type・不正な payload には error が返り、その後も処理できる
        // given (前提条件):
        let harness = Harness::new();
        let mut alice = harness.connect().await;

        // when (操作) / then (期待する結果):
        harness.router.route(&alice.id, "not json").await;
        assert_eq!(
            alice.next(),
            serde_json::json!({"type": "error", "payload": {"message": INVALID_MESSAGE_FORMAT}})
        );

        harness
            .send(&alice, serde_json::json!({"type": "lobby:explode", "payload": {}}))
            .await;
        assert_eq!(
            alice.next()["payload"]["message"],
            "Unknown message type: lobby:explode"
        );

        harness
            .send(&alice, serde_json::json!({"type": "webrtc:signal", "payload": {"signal": 1}}))
            .await;
        assert_eq!(alice.next()["type"], "error");

        harness
            .send(&alice, serde_json::json!({"type": "lobby:join", "payload": {"code": 42}}))
            .await;
        assert_eq!(alice.next()["type"], "error");

        assert_eq!(harness.lobbies.count_lobbies().await, 0);
        harness.create(&mut alice, "alice").await;
        assert_eq!(harness.lobbies.count_lobbies().await, 1);
    }

    #[tokio::test]
    async fn test_recreate_closes_previous_lobby() {
        // テスト項目: ホストが再度 lobby:create すると以前の Lobby の参加者に lobby:closed が届く
        // given (前提条件):
        let harness = Harness::new();
        let mut alice = harness.connect().await;
        let mut bob = harness.connect().await;
        let first = harness.create(&mut alice, "alice").await;
        harness.join(&bob, &first, "bob").await;
        bob.next();
        alice.next();

        // when (操作):
        let second = harness.create(&mut alice, "alice").await;

        // then (期待する結果):
        assert_ne!(first, second);
        assert_eq!(
            bob.next(),
            serde_json::json!({"type": "lobby:closed", "payload": {"code": first}})
        );
        assert_eq!(harness.lobbies.count_lobbies().await, 1);
        assert_eq!(harness.connections.lobby_of(&bob.id).await, Ok(None));
    }

    #[tokio::test]
    async fn test_created_codes_are_distinct_across_hosts() {
        // テスト項目: 複数の lobby:create で得られるコードは全て異なる
        // given (前提条件):
        let harness = Harness::new();
        let mut codes = std::collections::HashSet::new();

        // when (操作):
        for i in 0..50 {
            let mut host = harness.connect().await;
            codes.insert(harness.create(&mut host, &format!("host{i}")).await);
        }

        // then (期待する結果):
        assert_eq!(codes.len(), 50);
        assert!(codes.iter().all(|c| c.bytes().all(|b| b.is_ascii_uppercase())));
    }

    #[tokio::test]
    async fn test_binary_frames_are_routed_like_text() {
        // テスト項目: バイナリフレームの JSON もテキストと同様に処理され、UTF-8 でなければ error が返る
        // given (前提条件):
        let harness = Harness::new();
        let mut alice = harness.connect().await;

        // when (操作):
        harness
            .router
            .route_binary(&alice.id, br#"{"type":"lobby:create","payload":{"playerName":"alice"}}"#)
            .await;

        // then (期待する結果):
        let created = alice.next();
        assert_eq!(created["type"], "lobby:created");
        assert_eq!(created["payload"]["lobby"]["players"][0]["name"], "alice");

        // when (操作):
        harness.router.route_binary(&alice.id, &[0xff, 0xfe, 0x00]).await;

        // then (期待する結果):
        assert_eq!(
            alice.next(),
            serde_json::json!({"type": "error", "payload": {"message": INVALID_MESSAGE_FORMAT}})
        );
        alice.assert_silent();
        assert_eq!(harness.lobbies.count_lobbies().await, 1);
    }

    /// Connection registry whose `set_lobby` parks until released once armed.
    #[derive(Default)]
    struct GatedConnections {
        inner: InMemoryConnectionRepository,
        armed: AtomicBool,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl ConnectionRepository for GatedConnections {
        async fn connect(&self, channel: PusherChannel, connected_at: Timestamp) -> PlayerId {
            self.inner.connect(channel, connected_at).await
        }

        async fn resolve(&self, player_id: &PlayerId) -> Option<PusherChannel> {
            self.inner.resolve(player_id).await
        }

        async fn disconnect(&self, player_id: &PlayerId) -> Option<ConnectionRecord> {
            self.inner.disconnect(player_id).await
        }

        async fn set_lobby(
            &self,
            player_id: &PlayerId,
            code: Option<LobbyCode>,
        ) -> Result<(), RepositoryError> {
            if self.armed.swap(false, Ordering::SeqCst) {
                self.entered.notify_one();
                self.release.notified().await;
            }
            self.inner.set_lobby(player_id, code).await
        }

        async fn lobby_of(
            &self,
            player_id: &PlayerId,
        ) -> Result<Option<LobbyCode>, RepositoryError> {
            self.inner.lobby_of(player_id).await
        }

        async fn count_connections(&self) -> usize {
            self.inner.count_connections().await
        }
    }

    #[tokio::test]
    async fn test_cancelled_join_completes_before_disconnect() {
        // テスト項目: join の途中で受信タスクが中断されても参加処理は完了し、切断で Lobby から確実に取り除かれる
        // given (前提条件):
        let lobbies = Arc::new(InMemoryLobbyRepository::new());
        let connections = Arc::new(GatedConnections::default());
        let message_pusher = Arc::new(WebSocketMessagePusher::new(connections.clone()));
        let router = Arc::new(MessageRouter::new(
            Arc::new(CreateLobbyUseCase::new(lobbies.clone(), connections.clone())),
            Arc::new(JoinLobbyUseCase::new(lobbies.clone(), connections.clone())),
            Arc::new(RelaySignalUseCase::new(message_pusher.clone())),
            Arc::new(DisconnectPlayerUseCase::new(
                lobbies.clone(),
                connections.clone(),
            )),
            message_pusher,
        ));
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, _rx_b) = mpsc::unbounded_channel();
        let alice = connections.connect(tx_a, Timestamp::new(0)).await;
        let bob = connections.connect(tx_b, Timestamp::new(0)).await;
        router.route(&alice, r#"{"type":"lobby:create"}"#).await;
        let code = lobbies.list_snapshots().await[0].code.clone();

        // when (操作): bob's receive task is aborted while the join is parked
        connections.armed.store(true, Ordering::SeqCst);
        let frame = serde_json::json!({"type": "lobby:join", "payload": {"code": code.as_str()}})
            .to_string();
        let recv_task = tokio::spawn({
            let router = router.clone();
            async move { router.route(&bob, &frame).await }
        });
        connections.entered.notified().await;
        recv_task.abort();
        assert!(recv_task.await.unwrap_err().is_cancelled());
        connections.release.notify_one();
        router.disconnect(&bob).await;

        // then (期待する結果):
        let snapshot = lobbies.get_snapshot(&code).await.unwrap();
        assert_eq!(snapshot.players.len(), 1);
        assert_eq!(snapshot.players[0].id, alice);
        assert_eq!(connections.count_connections().await, 1);
    }
}
