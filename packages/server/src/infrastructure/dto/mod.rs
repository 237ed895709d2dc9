//! Data Transfer Objects.
//!
//! - `websocket`: signaling frames
//! - `http`: HTTP API responses

pub mod conversion;
pub mod http;
pub mod websocket;
