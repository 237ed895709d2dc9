//! WebRTC signaling and lobby relay server.
//!
//! Clients connect over WebSocket, create or join lobbies identified by short
//! codes, and relay opaque WebRTC signaling payloads to each other by
//! server-assigned identity.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
