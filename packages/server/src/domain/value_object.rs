//! Value objects.

use std::{fmt, str::FromStr};

use uuid::Uuid;

use super::error::{LobbyCodeError, PlayerIdError};

/// Server-assigned opaque identity of a connection.
///
/// Never derived from the display name and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(Uuid);

impl PlayerId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PlayerId {
    type Err = PlayerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| PlayerIdError(s.to_string()))
    }
}

/// Short human-typable lobby code: 8 uppercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LobbyCode(String);

impl LobbyCode {
    pub const LENGTH: usize = 8;

    /// Parse user input. Surrounding whitespace is dropped and letters are
    /// uppercased before validation, so `" abcdEFGH "` is `ABCDEFGH`.
    pub fn parse(raw: &str) -> Result<Self, LobbyCodeError> {
        let normalized = raw.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(LobbyCodeError::Empty);
        }
        if normalized.len() != Self::LENGTH || !normalized.bytes().all(|b| b.is_ascii_uppercase())
        {
            return Err(LobbyCodeError::InvalidFormat(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    /// Wrap a string already known to be 8 uppercase ASCII letters.
    pub(crate) fn from_generated(value: String) -> Self {
        debug_assert!(value.len() == Self::LENGTH && value.bytes().all(|b| b.is_ascii_uppercase()));
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for LobbyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display name chosen by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerName(String);

impl PlayerName {
    pub const DEFAULT: &'static str = "Player";
    pub const MAX_CHARS: usize = 32;

    /// Build a display name from optional client input.
    ///
    /// Blank or missing input falls back to [`PlayerName::DEFAULT`]; longer
    /// names are cut at [`PlayerName::MAX_CHARS`] characters.
    pub fn new(raw: Option<&str>) -> Self {
        let trimmed = raw.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Self(Self::DEFAULT.to_string());
        }
        Self(trimmed.chars().take(Self::MAX_CHARS).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
