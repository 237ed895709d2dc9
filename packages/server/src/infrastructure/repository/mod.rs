//! Repository 実装
//!
//! ドメイン層が定義する `LobbyRepository` / `ConnectionRepository` trait の
//! 具体的な実装を提供します。
//!
//! - `inmemory`: HashMap をインメモリ DB として使用する実装

pub mod inmemory;

pub use inmemory::{InMemoryConnectionRepository, InMemoryLobbyRepository};
