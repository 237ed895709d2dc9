//! Infrastructure layer: in-memory registries, WebSocket delivery, wire DTOs.

pub mod dto;
pub mod message_pusher;
pub mod repository;
