//! WebRTC signaling / lobby relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin lobby-signal-server
//! cargo run --bin lobby-signal-server -- --host 0.0.0.0 --port 3000
//! PORT=3000 cargo run --bin lobby-signal-server
//! ```

use std::sync::Arc;

use clap::Parser;
use lobby_signal_server::{
    domain::{ConnectionRepository, LobbyRepository, MessagePusher},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryConnectionRepository, InMemoryLobbyRepository},
    },
    ui::{MessageRouter, Server},
    usecase::{
        ConnectPlayerUseCase, CreateLobbyUseCase, DisconnectPlayerUseCase, GetLobbiesUseCase,
        GetLobbyDetailUseCase, JoinLobbyUseCase, RelaySignalUseCase,
    },
};
use lobby_signal_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "lobby-signal-server")]
#[command(about = "WebRTC signaling and lobby relay server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repositories (lobby / connection registries)
    // 2. MessagePusher
    // 3. UseCases
    // 4. MessageRouter
    // 5. Server

    // 1. In-memory registries
    let lobbies: Arc<dyn LobbyRepository> = Arc::new(InMemoryLobbyRepository::new());
    let connections: Arc<dyn ConnectionRepository> = Arc::new(InMemoryConnectionRepository::new());

    // 2. MessagePusher (WebSocket implementation)
    let message_pusher: Arc<dyn MessagePusher> =
        Arc::new(WebSocketMessagePusher::new(connections.clone()));

    // 3. UseCases
    let connect_player_usecase = Arc::new(ConnectPlayerUseCase::new(connections.clone()));
    let create_lobby_usecase = Arc::new(CreateLobbyUseCase::new(
        lobbies.clone(),
        connections.clone(),
    ));
    let join_lobby_usecase = Arc::new(JoinLobbyUseCase::new(lobbies.clone(), connections.clone()));
    let relay_signal_usecase = Arc::new(RelaySignalUseCase::new(message_pusher.clone()));
    let disconnect_player_usecase = Arc::new(DisconnectPlayerUseCase::new(
        lobbies.clone(),
        connections.clone(),
    ));
    let get_lobbies_usecase = Arc::new(GetLobbiesUseCase::new(lobbies.clone()));
    let get_lobby_detail_usecase = Arc::new(GetLobbyDetailUseCase::new(lobbies));

    // 4. MessageRouter
    let router = Arc::new(MessageRouter::new(
        create_lobby_usecase,
        join_lobby_usecase,
        relay_signal_usecase,
        disconnect_player_usecase,
        message_pusher,
    ));

    // 5. Create and run the server
    let server = Server::new(
        connect_player_usecase,
        router,
        get_lobbies_usecase,
        get_lobby_detail_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
