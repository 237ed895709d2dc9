//! WebSocket signaling frames.
//!
//! Every frame is `{"type": string, "payload": object}`. Inbound frames are
//! decoded in two steps: first the envelope, then the payload for the given
//! type. `signal` payloads stay raw JSON end to end.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::value::RawValue;

/// Frame discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    // inbound
    LobbyCreate,
    LobbyJoin,
    // both directions
    WebRtcSignal,
    // outbound
    LobbyCreated,
    LobbyJoined,
    LobbyPeerJoined,
    LobbyPeerLeft,
    LobbyClosed,
    LobbyError,
    Error,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LobbyCreate => "lobby:create",
            Self::LobbyJoin => "lobby:join",
            Self::WebRtcSignal => "webrtc:signal",
            Self::LobbyCreated => "lobby:created",
            Self::LobbyJoined => "lobby:joined",
            Self::LobbyPeerJoined => "lobby:peer-joined",
            Self::LobbyPeerLeft => "lobby:peer-left",
            Self::LobbyClosed => "lobby:closed",
            Self::LobbyError => "lobby:error",
            Self::Error => "error",
        }
    }

    /// Types a client is allowed to send.
    pub fn from_inbound(value: &str) -> Option<Self> {
        match value {
            "lobby:create" => Some(Self::LobbyCreate),
            "lobby:join" => Some(Self::LobbyJoin),
            "webrtc:signal" => Some(Self::WebRtcSignal),
            _ => None,
        }
    }
}

impl Serialize for MessageType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ========================================
// Inbound
// ========================================

/// Inbound frame before the payload is interpreted.
#[derive(Debug, Deserialize)]
pub struct InboundEnvelope<'a> {
    pub r#type: String,
    #[serde(borrow, default)]
    pub payload: Option<&'a RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLobbyPayload {
    #[serde(default)]
    pub player_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinLobbyPayload {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub player_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalPayload<'a> {
    pub target_id: String,
    #[serde(borrow)]
    pub signal: &'a RawValue,
}

// ========================================
// Outbound
// ========================================

/// Outbound frame.
#[derive(Debug, Serialize)]
pub struct OutboundMessage<T> {
    pub r#type: MessageType,
    pub payload: T,
}

impl<T: Serialize> OutboundMessage<T> {
    pub fn new(r#type: MessageType, payload: T) -> Self {
        Self { r#type, payload }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub id: String,
    pub name: String,
    pub is_host: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyDto {
    pub code: String,
    pub host_id: String,
    pub players: Vec<PlayerDto>,
}

/// Payload of `lobby:created` and `lobby:joined`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyEnteredPayload {
    pub code: String,
    pub player_id: String,
    pub host_id: String,
    pub lobby: LobbyDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerJoinedPayload {
    pub player_id: String,
    pub player_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerLeftPayload {
    pub player_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyClosedPayload {
    pub code: String,
}

/// Payload of `lobby:error` and `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

/// Payload of a relayed `webrtc:signal`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalRelayPayload<'a> {
    pub from_id: String,
    pub signal: &'a RawValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_keeps_payload_raw() {
        // テスト項目: エンベロープの payload は未解釈のまま保持される
        // given (前提条件):
        let text = r#"{"type":"webrtc:signal","payload":{"targetId":"x","signal":{"sdp":"v=0\r\n", "n": 1.50}}}"#;

        // when (操作):
        let envelope: InboundEnvelope = serde_json::from_str(text).unwrap();
        let payload: SignalPayload = serde_json::from_str(envelope.payload.unwrap().get()).unwrap();

        // then (期待する結果):
        assert_eq!(envelope.r#type, "webrtc:signal");
        assert_eq!(payload.target_id, "x");
        assert_eq!(payload.signal.get(), r#"{"sdp":"v=0\r\n", "n": 1.50}"#);
    }

    #[test]
    fn test_envelope_without_payload() {
        // テスト項目: payload が省略されたフレームも解釈できる
        let envelope: InboundEnvelope = serde_json::from_str(r#"{"type":"lobby:create"}"#).unwrap();
        assert!(envelope.payload.is_none());
    }

    #[test]
    fn test_envelope_requires_type() {
        // テスト項目: type のないフレームはエラーになる
        assert!(serde_json::from_str::<InboundEnvelope>(r#"{"payload":{}}"#).is_err());
    }

    #[test]
    fn test_outbound_message_shape() {
        // テスト項目: 送信フレームは {type, payload} 形式で camelCase になる
        // given (前提条件):
        let message = OutboundMessage::new(
            MessageType::LobbyPeerJoined,
            PeerJoinedPayload {
                player_id: "p1".to_string(),
                player_name: "bob".to_string(),
            },
        );

        // when (操作):
        let json = message.to_json().unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            r#"{"type":"lobby:peer-joined","payload":{"playerId":"p1","playerName":"bob"}}"#
        );
    }

    #[test]
    fn test_signal_relay_is_verbatim() {
        // テスト項目: 中継する signal はバイト単位でそのまま出力される
        // given (前提条件):
        let raw = RawValue::from_string(r#"{ "candidate" : "a=1", "x": [1, 2.0] }"#.to_string()).unwrap();
        let message = OutboundMessage::new(
            MessageType::WebRtcSignal,
            SignalRelayPayload {
                from_id: "p1".to_string(),
                signal: &raw,
            },
        );

        // when (操作):
        let json = message.to_json().unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            r#"{"type":"webrtc:signal","payload":{"fromId":"p1","signal":{ "candidate" : "a=1", "x": [1, 2.0] }}}"#
        );
    }

    #[test]
    fn test_only_client_types_are_inbound() {
        // テスト項目: クライアントが送れる type のみ受け付ける
        assert_eq!(MessageType::from_inbound("lobby:create"), Some(MessageType::LobbyCreate));
        assert_eq!(MessageType::from_inbound("lobby:join"), Some(MessageType::LobbyJoin));
        assert_eq!(MessageType::from_inbound("webrtc:signal"), Some(MessageType::WebRtcSignal));
        assert_eq!(MessageType::from_inbound("lobby:created"), None);
        assert_eq!(MessageType::from_inbound("LOBBY:CREATE"), None);
    }
}
