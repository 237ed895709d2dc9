//! Shared cleanup when a player leaves its lobby.

use crate::domain::{ConnectionRepository, LobbyCode, LobbyRepository, PlayerId, PlayerRemoval};

/// Remove `player_id` from lobby `code`.
///
/// When the host leaves, the lobby is gone and every orphaned player's
/// lobby pointer is cleared. The leaving player's own pointer is left to the
/// caller.
pub(super) async fn leave_lobby(
    lobbies: &dyn LobbyRepository,
    connections: &dyn ConnectionRepository,
    code: &LobbyCode,
    player_id: &PlayerId,
) -> PlayerRemoval {
    let removal = lobbies.remove_player(code, player_id).await;

    match &removal {
        PlayerRemoval::LobbyClosed { code, orphaned } => {
            tracing::info!(
                "Lobby {} closed by host '{}' ({} player(s) orphaned)",
                code,
                player_id,
                orphaned.len()
            );
            for orphan in orphaned {
                if let Err(e) = connections.set_lobby(orphan, None).await {
                    tracing::debug!("Orphaned player already gone: {}", e);
                }
            }
        }
        PlayerRemoval::PlayerLeft { code, .. } => {
            tracing::info!("Player '{}' left lobby {}", player_id, code);
        }
        PlayerRemoval::NotMember => {
            tracing::debug!("Player '{}' was not a member of lobby {}", player_id, code);
        }
    }

    removal
}
