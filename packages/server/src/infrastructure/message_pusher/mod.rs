//! メッセージ送信（通知）の実装
//!
//! ## 概要
//!
//! このモジュールは `MessagePusher` trait の具体的な実装を提供します。
//! Router とユースケースは trait にのみ依存し、送信経路を知りません。
//!
//! ## 実装
//!
//! - `websocket`: 接続ごとの WebSocket 送信チャンネルを使った実装

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
