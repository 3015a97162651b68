//! Placement module - validates, commits, and removes piece placements
//!
//! The engine owns the grid, the spawned pieces, and the cluster tracker;
//! everything mutates synchronously on discrete external events. Rejections
//! are ordinary results, not errors: the caller restores the piece's pose and
//! the grid is left untouched.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::core::cluster::{ClusterTracker, ContactOutcome};
use crate::core::grid::{AtomRef, Grid};
use crate::core::piece::Piece;
use crate::core::shape::SchemaError;
use crate::types::{GameEvent, PieceId, PieceKind};

/// Why a placement attempt was rejected. All variants are recoverable: the
/// caller reverts the pose and play continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    /// The session is not accepting placements (not started or over)
    NotPlayable,
    UnknownPiece,
    /// An atom's world position maps to no cell
    NoCell,
    /// A target cell is already bound to another atom
    Occupied,
    /// Two atoms of the piece map to the same cell
    Overlap,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "not_playable",
            PlaceError::UnknownPiece => "unknown_piece",
            PlaceError::NoCell | PlaceError::Occupied | PlaceError::Overlap => "invalid_place",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "the session is not accepting placements",
            PlaceError::UnknownPiece => "no piece with that id",
            PlaceError::NoCell => "an atom is not over any cell",
            PlaceError::Occupied => "a target cell is already occupied",
            PlaceError::Overlap => "two atoms map to the same cell",
        }
    }
}

/// Result of the position-exact drag validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragCheck {
    pub fits: bool,
    /// The distinct empty cells found under atoms (the placement preview)
    pub cells: Vec<(usize, usize)>,
}

/// Owns grid occupancy, spawned pieces, and cluster state
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    grid: Grid,
    pieces: BTreeMap<PieceId, Piece>,
    tracker: ClusterTracker,
    preview: Vec<(usize, usize)>,
    events: Vec<GameEvent>,
    next_id: u32,
}

/// Map every atom to a distinct, currently-empty cell, in atom order.
/// Position-exact; fails on the first atom that misses.
fn resolve_cells(grid: &Grid, piece: &Piece) -> Result<Vec<(usize, usize)>, PlaceError> {
    let mut cells: Vec<(usize, usize)> = Vec::with_capacity(piece.atom_count());
    for (x, y) in piece.world_atoms(grid.cell_size()) {
        let Some((row, col)) = grid.cell_at_position(x, y) else {
            return Err(PlaceError::NoCell);
        };
        if !grid.is_vacant(row as i32, col as i32) {
            return Err(PlaceError::Occupied);
        }
        if cells.contains(&(row, col)) {
            return Err(PlaceError::Overlap);
        }
        cells.push((row, col));
    }
    Ok(cells)
}

impl PlacementEngine {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            pieces: BTreeMap::new(),
            tracker: ClusterTracker::new(),
            preview: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn tracker(&self) -> &ClusterTracker {
        &self.tracker
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    pub fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(&id)
    }

    pub fn piece_ids(&self) -> Vec<PieceId> {
        self.pieces.keys().copied().collect()
    }

    /// Register a new piece. Malformed offsets are rejected here, before the
    /// piece ever reaches the grid; the defect is fatal only for this piece.
    pub fn spawn_piece(
        &mut self,
        kind: PieceKind,
        offsets: &[(i8, i8)],
        spawn_slot: Option<usize>,
        position: (f32, f32),
    ) -> Result<PieceId, SchemaError> {
        let id = PieceId(self.next_id);
        let mut piece = Piece::new(id, kind, offsets.to_vec(), spawn_slot, position);
        piece.schemas()?;
        self.next_id += 1;
        self.pieces.insert(id, piece);
        Ok(id)
    }

    /// Position-exact fit test against the piece's current pose. Collects
    /// whatever valid cells exist under atoms and stores them as the
    /// placement preview for the rendering collaborator; the piece fits only
    /// when every atom found a distinct empty cell.
    pub fn validate_drag(&mut self, id: PieceId) -> DragCheck {
        let Some(piece) = self.pieces.get(&id) else {
            return DragCheck {
                fits: false,
                cells: Vec::new(),
            };
        };

        let mut cells: Vec<(usize, usize)> = Vec::with_capacity(piece.atom_count());
        for (x, y) in piece.world_atoms(self.grid.cell_size()) {
            let Some((row, col)) = self.grid.cell_at_position(x, y) else {
                continue;
            };
            if !self.grid.is_vacant(row as i32, col as i32) || cells.contains(&(row, col)) {
                continue;
            }
            cells.push((row, col));
        }

        let fits = cells.len() == piece.atom_count();
        self.preview = cells.clone();
        DragCheck { fits, cells }
    }

    /// Current placement-preview cells
    pub fn preview(&self) -> &[(usize, usize)] {
        &self.preview
    }

    /// Reset the placement preview (aborted drag)
    pub fn clear_preview(&mut self) {
        self.preview.clear();
    }

    /// Commit the piece at its current pose.
    ///
    /// Joins any in-flight rotation first, then re-runs the exact validation
    /// (the pose may have changed since the preview check). On failure
    /// nothing is mutated and the caller restores the prior pose. On success
    /// every atom is bound to its cell atomically, the piece snaps onto the
    /// cell lattice, and cluster resolution runs.
    pub fn commit_placement(&mut self, id: PieceId) -> Result<(), PlaceError> {
        let Some(piece) = self.pieces.get_mut(&id) else {
            return Err(PlaceError::UnknownPiece);
        };
        piece.settle_spin();

        let cells = resolve_cells(&self.grid, piece)?;
        let kind = piece.kind();

        // Snap the pose so atom 0 sits exactly on its cell center.
        if let (Some(&(row, col)), Some(&(ax, ay))) = (
            cells.first(),
            piece.world_atoms(self.grid.cell_size()).first(),
        ) {
            let (cx, cy) = self.grid.cell_center(row, col);
            piece.translate(cx - ax, cy - ay);
        }
        piece.set_placed(true);

        for (atom, &(row, col)) in cells.iter().enumerate() {
            self.grid.occupy(row, col, AtomRef { piece: id, atom });
        }
        self.events.push(GameEvent::PlacementScored);

        self.resolve_contacts(id, kind, &cells);

        if self.grid.is_full() {
            self.events.push(GameEvent::BoardCleared);
            self.clear_board();
        }

        self.preview.clear();
        Ok(())
    }

    /// Scan the 4-directional neighbors of the newly-occupied cells for
    /// distinct other placed pieces of the same kind, then resolve the
    /// contact with the tracker.
    fn resolve_contacts(&mut self, id: PieceId, kind: PieceKind, cells: &[(usize, usize)]) {
        let mut neighbors: BTreeSet<PieceId> = BTreeSet::new();
        for &(row, col) in cells {
            let (r, c) = (row as i32, col as i32);
            for (nr, nc) in [(r - 1, c), (r + 1, c), (r, c - 1), (r, c + 1)] {
                let Some(Some(atom)) = self.grid.get(nr, nc) else {
                    continue;
                };
                if atom.piece == id {
                    continue;
                }
                if self
                    .pieces
                    .get(&atom.piece)
                    .map_or(false, |p| p.kind() == kind)
                {
                    neighbors.insert(atom.piece);
                }
            }
        }

        match self.tracker.on_placed(kind, id, &neighbors) {
            ContactOutcome::None => {}
            ContactOutcome::Combo { size } => {
                self.events.push(GameEvent::ComboScored(size));
            }
            ContactOutcome::Bomb { cluster } => {
                log::debug!(
                    "bomb: {} {} pieces eliminated",
                    cluster.len(),
                    kind.as_str()
                );
                self.events.push(GameEvent::ComboScored(cluster.len()));
                self.events.push(GameEvent::BombScored(cluster.len()));
                for piece in cluster {
                    self.remove_piece(piece, true);
                }
            }
        }
    }

    /// Unbind every atom/cell pair owned by the piece, delete every contact
    /// record referencing it, and optionally dispose of the piece entirely.
    /// Returns false when the piece is unknown.
    pub fn remove_piece(&mut self, id: PieceId, destroy: bool) -> bool {
        if !self.pieces.contains_key(&id) {
            return false;
        }

        let bound: Vec<(usize, usize)> = self
            .grid
            .occupied_cells()
            .filter(|&(_, _, atom)| atom.piece == id)
            .map(|(row, col, _)| (row, col))
            .collect();
        for (row, col) in bound {
            self.grid.vacate(row, col);
        }

        self.tracker.remove_piece(id);

        if destroy {
            self.pieces.remove(&id);
        } else if let Some(piece) = self.pieces.get_mut(&id) {
            piece.set_placed(false);
        }
        true
    }

    /// Remove and destroy every placed piece (board-clear bonus)
    fn clear_board(&mut self) {
        let placed: Vec<PieceId> = self
            .pieces
            .values()
            .filter(|p| p.is_placed())
            .map(|p| p.id())
            .collect();
        for id in placed {
            self.remove_piece(id, true);
        }
    }

    /// Drain the events produced since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CELL_SIZE;

    fn engine() -> PlacementEngine {
        PlacementEngine::new(Grid::new(8, 8, (0.0, 0.0), CELL_SIZE))
    }

    /// Spawn a piece and park its origin atom over the given cell
    fn spawn_at(
        engine: &mut PlacementEngine,
        kind: PieceKind,
        offsets: &[(i8, i8)],
        row: usize,
        col: usize,
    ) -> PieceId {
        let id = engine.spawn_piece(kind, offsets, None, (0.0, 0.0)).unwrap();
        let center = engine.grid().cell_center(row, col);
        engine.piece_mut(id).unwrap().set_position(center);
        id
    }

    #[test]
    fn test_spawn_rejects_malformed_offsets() {
        let mut e = engine();
        assert_eq!(
            e.spawn_piece(PieceKind::Red, &[], None, (0.0, 0.0)),
            Err(SchemaError::Empty)
        );
        assert!(e.piece_ids().is_empty());
    }

    #[test]
    fn test_commit_binds_every_atom() {
        let mut e = engine();
        let id = spawn_at(&mut e, PieceKind::Red, &[(0, 0), (1, 0), (0, 1)], 2, 2);
        assert!(e.validate_drag(id).fits);
        e.commit_placement(id).unwrap();

        assert!(e.grid().is_occupied(2, 2));
        assert!(e.grid().is_occupied(2, 3));
        assert!(e.grid().is_occupied(3, 2));
        assert!(e.piece(id).unwrap().is_placed());
        assert_eq!(e.take_events(), vec![GameEvent::PlacementScored]);
    }

    #[test]
    fn test_commit_rejects_out_of_grid() {
        let mut e = engine();
        let id = e
            .spawn_piece(PieceKind::Red, &[(0, 0), (1, 0)], None, (0.0, 0.0))
            .unwrap();
        e.piece_mut(id).unwrap().set_position((100.0, 100.0));
        assert_eq!(e.commit_placement(id), Err(PlaceError::NoCell));
        assert!(e.grid().vacancy_map().ones() == 64);
    }

    #[test]
    fn test_double_commit_rejected_and_grid_unchanged() {
        let mut e = engine();
        let id = spawn_at(&mut e, PieceKind::Red, &[(0, 0), (1, 0)], 4, 4);
        e.commit_placement(id).unwrap();
        let before = e.grid().clone();

        assert_eq!(e.commit_placement(id), Err(PlaceError::Occupied));
        assert_eq!(e.grid(), &before);
    }

    #[test]
    fn test_commit_joins_pending_rotation() {
        let mut e = engine();
        // Vertical domino after one clockwise turn.
        let id = spawn_at(&mut e, PieceKind::Red, &[(0, 0), (1, 0)], 0, 7);
        e.piece_mut(id).unwrap().start_turn(true);
        assert!(e.piece(id).unwrap().is_turning());

        // Horizontal pose would poke out at col 8; the settled pose fits.
        e.commit_placement(id).unwrap();
        assert!(!e.piece(id).unwrap().is_turning());
        assert!(e.grid().is_occupied(0, 7));
        assert!(e.grid().is_occupied(1, 7));
    }

    #[test]
    fn test_remove_piece_unbinds_and_purges() {
        let mut e = engine();
        let a = spawn_at(&mut e, PieceKind::Red, &[(0, 0)], 0, 0);
        e.commit_placement(a).unwrap();
        let b = spawn_at(&mut e, PieceKind::Red, &[(0, 0)], 0, 1);
        e.commit_placement(b).unwrap();
        assert_eq!(e.tracker().records().len(), 1);

        assert!(e.remove_piece(b, false));
        assert!(e.grid().is_vacant(0, 1));
        assert!(e.tracker().records().is_empty());
        assert!(!e.piece(b).unwrap().is_placed());
        // Destroy drops the piece entirely.
        assert!(e.remove_piece(a, true));
        assert!(e.piece(a).is_none());
    }

    #[test]
    fn test_preview_tracks_partial_fit() {
        let mut e = engine();
        let blocker = spawn_at(&mut e, PieceKind::Blue, &[(0, 0)], 3, 4);
        e.commit_placement(blocker).unwrap();

        let id = spawn_at(&mut e, PieceKind::Red, &[(0, 0), (1, 0)], 3, 3);
        let check = e.validate_drag(id);
        assert!(!check.fits);
        // Only the vacant cell shows up in the preview.
        assert_eq!(e.preview(), &[(3, 3)]);

        e.clear_preview();
        assert!(e.preview().is_empty());
    }

    #[test]
    fn test_board_clear_bonus() {
        let mut e = PlacementEngine::new(Grid::new(1, 2, (0.0, 0.0), 1.0));
        let a = spawn_at(&mut e, PieceKind::Red, &[(0, 0)], 0, 0);
        e.commit_placement(a).unwrap();
        let b = spawn_at(&mut e, PieceKind::Blue, &[(0, 0)], 0, 1);
        e.commit_placement(b).unwrap();

        let events = e.take_events();
        assert!(events.contains(&GameEvent::BoardCleared));
        // The clear bonus empties the board again.
        assert!(e.grid().is_vacant(0, 0));
        assert!(e.grid().is_vacant(0, 1));
    }
}
