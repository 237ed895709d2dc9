//! InMemory Repository 実装
//!
//! どちらのレジストリも `tokio::sync::Mutex<HashMap<..>>` で状態を保持します。
//! プロセスを再起動すると全ての Lobby と接続は失われます。

mod connection;
mod lobby;

pub use connection::InMemoryConnectionRepository;
pub use lobby::InMemoryLobbyRepository;
