//! Utilities shared by the lobby signaling binaries.

pub mod logger;
pub mod time;
