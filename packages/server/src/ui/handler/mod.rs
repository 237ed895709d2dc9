//! axum handlers.

pub mod http;
pub mod websocket;

pub use http::{get_lobbies, get_lobby_detail, health_check};
pub use websocket::websocket_handler;
