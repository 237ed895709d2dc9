//! Shared application state.

use std::sync::Arc;

use crate::usecase::{ConnectPlayerUseCase, GetLobbiesUseCase, GetLobbyDetailUseCase};

use super::router::MessageRouter;

pub struct AppState {
    /// Assigns identities to new connections
    pub connect_player_usecase: Arc<ConnectPlayerUseCase>,
    /// Dispatches inbound frames and connection closes
    pub router: Arc<MessageRouter>,
    pub get_lobbies_usecase: Arc<GetLobbiesUseCase>,
    pub get_lobby_detail_usecase: Arc<GetLobbyDetailUseCase>,
}
