//! WebSocket connection handler.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::ui::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drains the connection's outbound channel into the WebSocket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let player_id = state.connect_player_usecase.execute(tx).await;
    tracing::info!("Client '{}' connected", player_id);

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    let router = state.router.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", player_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", player_id, text.as_str());
                    router.route(&player_id, text.as_str()).await;
                }
                Message::Binary(bytes) => {
                    tracing::debug!("Received {} bytes from '{}'", bytes.len(), player_id);
                    router.route_binary(&player_id, &bytes).await;
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", player_id);
                    break;
                }
                // Ping/pong is answered by the WebSocket layer
                _ => {}
            }
        }
    });

    // Aborting the receive task never cuts a dispatch short; the router runs
    // it on a separate task and `disconnect` waits for it.
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.router.disconnect(&player_id).await;
    tracing::info!("Client '{}' disconnected", player_id);
}
