//! Factories for generated identifiers.

use rand::Rng;
use uuid::Uuid;

use super::value_object::{LobbyCode, PlayerId};

/// Allocates fresh player identities.
pub struct PlayerIdFactory;

impl PlayerIdFactory {
    pub fn generate() -> PlayerId {
        PlayerId::new(Uuid::new_v4())
    }
}

/// Draws lobby codes uniformly from the 26^8 code space.
///
/// Uniqueness against live lobbies is the registry's job.
pub struct LobbyCodeFactory;

impl LobbyCodeFactory {
    pub fn generate() -> LobbyCode {
        Self::generate_with(&mut rand::rng())
    }

    pub fn generate_with<R: Rng>(rng: &mut R) -> LobbyCode {
        let code: String = (0..LobbyCode::LENGTH)
            .map(|_| char::from(b'A' + rng.random_range(0..26u8)))
            .collect();
        LobbyCode::from_generated(code)
    }
}
