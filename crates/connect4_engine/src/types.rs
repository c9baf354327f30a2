//! Core domain types for Connect Four.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Glyph identifying a player's pieces.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
pub enum Icon {
    /// First registrant (moves first).
    X,
    /// Second registrant.
    O,
}

impl Icon {
    /// Returns the opposing icon.
    pub fn opponent(self) -> Self {
        match self {
            Icon::X => Icon::O,
            Icon::O => Icon::X,
        }
    }
}

/// A cell on the board.
///
/// On the wire an empty cell is the number `0` and an occupied cell is the
/// icon string (`"X"` or `"O"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "CellRepr", try_from = "CellRepr")]
pub enum Cell {
    /// Nothing here yet.
    #[default]
    Empty,
    /// Holds a piece.
    Occupied(Icon),
}

impl Cell {
    /// Returns the icon in this cell, if any.
    pub fn icon(self) -> Option<Icon> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(icon) => Some(icon),
        }
    }

    /// True for [`Cell::Empty`].
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CellRepr {
    Empty(u8),
    Icon(Icon),
}

impl From<Cell> for CellRepr {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => CellRepr::Empty(0),
            Cell::Occupied(icon) => CellRepr::Icon(icon),
        }
    }
}

impl TryFrom<CellRepr> for Cell {
    type Error = String;

    fn try_from(repr: CellRepr) -> Result<Self, Self::Error> {
        match repr {
            CellRepr::Empty(0) => Ok(Cell::Empty),
            CellRepr::Empty(other) => Err(format!("invalid empty cell marker {other}")),
            CellRepr::Icon(icon) => Ok(Cell::Occupied(icon)),
        }
    }
}

/// Player identifier was empty.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("player id must not be empty")]
pub struct EmptyPlayerId;

/// Opaque, non-empty player identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Parses an identifier, rejecting empty or whitespace-only input.
    pub fn parse(raw: impl Into<String>) -> Result<Self, EmptyPlayerId> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(EmptyPlayerId);
        }
        Ok(Self(raw))
    }

    /// Builds an identifier that is unique within this host for practical purposes.
    pub fn generate(label: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let label = label.trim().to_lowercase().replace(' ', "_");
        let label = if label.is_empty() { "player".to_string() } else { label };
        Self(format!("{}_{}_{:x}", label, std::process::id(), nanos))
    }

    /// Borrows the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PlayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One of the two fixed player positions, bound to an icon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerSlot {
    id: PlayerId,
    icon: Icon,
}

impl PlayerSlot {
    pub(crate) fn new(id: PlayerId, icon: Icon) -> Self {
        Self { id, icon }
    }

    /// The registered player's identifier.
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    /// The icon assigned at registration.
    pub fn icon(&self) -> Icon {
        self.icon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_wire_format() {
        let row = vec![Cell::Empty, Cell::Occupied(Icon::X), Cell::Occupied(Icon::O)];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"[0,"X","O"]"#);

        let back: Vec<Cell> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn test_cell_rejects_nonzero_number() {
        assert!(serde_json::from_str::<Cell>("3").is_err());
    }

    #[test]
    fn test_player_id_rejects_blank() {
        assert_eq!(PlayerId::parse(""), Err(EmptyPlayerId));
        assert_eq!(PlayerId::parse("   "), Err(EmptyPlayerId));
        assert_eq!(PlayerId::parse("p1").unwrap().as_str(), "p1");
    }

    #[test]
    fn test_generated_ids_carry_label() {
        let id = PlayerId::generate("Red Team");
        assert!(id.as_str().starts_with("red_team_"));
    }

    #[test]
    fn test_icon_opponent() {
        assert_eq!(Icon::X.opponent(), Icon::O);
        assert_eq!(Icon::O.opponent(), Icon::X);
        assert_eq!(Icon::X.to_string(), "X");
    }
}
