//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{ConnectPlayerUseCase, GetLobbiesUseCase, GetLobbyDetailUseCase};

use super::{
    handler::{get_lobbies, get_lobby_detail, health_check, websocket_handler},
    router::MessageRouter,
    signal::shutdown_signal,
    state::AppState,
};

/// Lobby signaling server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_player_usecase,
///     router,
///     get_lobbies_usecase,
///     get_lobby_detail_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    connect_player_usecase: Arc<ConnectPlayerUseCase>,
    router: Arc<MessageRouter>,
    get_lobbies_usecase: Arc<GetLobbiesUseCase>,
    get_lobby_detail_usecase: Arc<GetLobbyDetailUseCase>,
}

impl Server {
    pub fn new(
        connect_player_usecase: Arc<ConnectPlayerUseCase>,
        router: Arc<MessageRouter>,
        get_lobbies_usecase: Arc<GetLobbiesUseCase>,
        get_lobby_detail_usecase: Arc<GetLobbyDetailUseCase>,
    ) -> Self {
        Self {
            connect_player_usecase,
            router,
            get_lobbies_usecase,
            get_lobby_detail_usecase,
        }
    }

    /// Build the axum application.
    pub fn app(self) -> Router {
        let app_state = Arc::new(AppState {
            connect_player_usecase: self.connect_player_usecase,
            router: self.router,
            get_lobbies_usecase: self.get_lobbies_usecase,
            get_lobby_detail_usecase: self.get_lobby_detail_usecase,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/lobbies", get(get_lobbies))
            .route("/api/lobbies/{code}", get(get_lobby_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Bind to `host:port` and serve until Ctrl+C / SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if binding fails or the server stops abnormally.
    pub async fn run(
        self,
        host: String,
        port: u16,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!("Connect to: ws://{}/ws", bind_addr);

        self.serve(listener).await
    }

    /// Serve on an already bound listener until Ctrl+C / SIGTERM.
    pub async fn serve(
        self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::info!(
            "Lobby signaling server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, self.app())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
