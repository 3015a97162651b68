//! Core types shared across the crate
//! This module contains pure data types with no external dependencies

/// Default grid dimensions
pub const GRID_ROWS: usize = 8;
pub const GRID_COLS: usize = 8;

/// Default world-space cell size
pub const CELL_SIZE: f32 = 1.0;

/// Number of candidate pieces offered at once
pub const SPAWN_SLOTS: usize = 3;

/// Cluster size at which a contact cluster explodes (fixed, not configurable)
pub const BOMB_THRESHOLD: usize = 3;

/// Discrete steps a piece rotation takes to settle
pub const TURN_STEPS: u8 = 6;

/// Scoring constants
pub const SCORE_PER_PLACEMENT: u32 = 100;
pub const SCORE_PER_COMBO: u32 = 100;
pub const SCORE_PER_BOMB: u32 = 200;
pub const SCORE_PER_BOARD_CLEAR: u32 = 10_000;

/// Reroll budget: one earned per score step, capped
pub const MAX_REROLLS: u32 = 2;
pub const REROLL_SCORE_STEP: u32 = 5_000;

/// Piece type tags; same-kind adjacency forms clusters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Red,
    Green,
    Blue,
    Yellow,
}

impl PieceKind {
    /// All kinds, in spawn-table order
    pub const ALL: [PieceKind; 4] = [
        PieceKind::Red,
        PieceKind::Green,
        PieceKind::Blue,
        PieceKind::Yellow,
    ];

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(PieceKind::Red),
            "green" => Some(PieceKind::Green),
            "blue" => Some(PieceKind::Blue),
            "yellow" => Some(PieceKind::Yellow),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::Red => "red",
            PieceKind::Green => "green",
            PieceKind::Blue => "blue",
            PieceKind::Yellow => "yellow",
        }
    }
}

/// Rotation states in quarter turns (R0 = spawn orientation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Rotate clockwise by a quarter turn
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::R0 => Rotation::R90,
            Rotation::R90 => Rotation::R180,
            Rotation::R180 => Rotation::R270,
            Rotation::R270 => Rotation::R0,
        }
    }

    /// Rotate counter-clockwise by a quarter turn
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::R0 => Rotation::R270,
            Rotation::R270 => Rotation::R180,
            Rotation::R180 => Rotation::R90,
            Rotation::R90 => Rotation::R0,
        }
    }

    /// Number of clockwise quarter turns from spawn orientation
    pub fn quarter_turns(&self) -> u8 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 1,
            Rotation::R180 => 2,
            Rotation::R270 => 3,
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "0" | "r0" => Some(Rotation::R0),
            "90" | "r90" => Some(Rotation::R90),
            "180" | "r180" => Some(Rotation::R180),
            "270" | "r270" => Some(Rotation::R270),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::R0 => "0",
            Rotation::R90 => "90",
            Rotation::R180 => "180",
            Rotation::R270 => "270",
        }
    }
}

/// Stable identifier of a spawned piece instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u32);

/// Events produced for the external scoring/timer collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A piece was committed to the grid
    PlacementScored,
    /// A same-kind contact cluster of the given size formed
    ComboScored(usize),
    /// A cluster reached the bomb threshold and was eliminated
    BombScored(usize),
    /// Every cell of the grid became occupied
    BoardCleared,
    /// No offered piece fits anywhere on the grid
    GameOverSignal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_round_trip() {
        let mut r = Rotation::R0;
        for _ in 0..4 {
            r = r.rotate_cw();
        }
        assert_eq!(r, Rotation::R0);
        assert_eq!(Rotation::R90.rotate_ccw(), Rotation::R0);
    }

    #[test]
    fn test_kind_str_round_trip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(PieceKind::from_str("purple"), None);
    }

    #[test]
    fn test_rotation_str_round_trip() {
        for r in [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270] {
            assert_eq!(Rotation::from_str(r.as_str()), Some(r));
        }
    }
}
