//! UseCase layer: one struct per protocol operation.

mod connect_player;
mod create_lobby;
mod disconnect_player;
mod error;
mod get_lobbies;
mod get_lobby_detail;
mod join_lobby;
mod lobby_exit;
mod relay_signal;

pub use connect_player::ConnectPlayerUseCase;
pub use create_lobby::{CreateLobbyOutput, CreateLobbyUseCase};
pub use disconnect_player::DisconnectPlayerUseCase;
pub use error::{CreateLobbyError, GetLobbyDetailError, JoinLobbyError, RelaySignalError};
pub use get_lobbies::GetLobbiesUseCase;
pub use get_lobby_detail::GetLobbyDetailUseCase;
pub use join_lobby::{JoinLobbyOutput, JoinLobbyUseCase};
pub use relay_signal::RelaySignalUseCase;
