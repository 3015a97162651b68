//! Piece module - a multi-cell unit of atoms with a world pose
//!
//! Atom offsets are fixed at spawn and never mutate. The pose (position +
//! rotation) is what the drag collaborator moves around. Rotation-in-progress
//! is a short cooperative state driven by discrete steps; committing a
//! placement joins it back to idle before the pose is read.

use arrayvec::ArrayVec;

use crate::core::shape::{generate_schemas, Schema, SchemaError};
use crate::types::{PieceId, PieceKind, Rotation, TURN_STEPS};

/// Cooperative rotation state. `Turning` counts down discrete steps; the
/// committed rotation only changes once the turn settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinState {
    Idle,
    Turning { remaining: u8, target: Rotation },
}

/// A spawned piece instance
#[derive(Debug, Clone)]
pub struct Piece {
    id: PieceId,
    kind: PieceKind,
    /// Atom offsets (dx, dy) in grid steps, relative to the piece origin
    offsets: Vec<(i8, i8)>,
    /// World position of the piece origin
    position: (f32, f32),
    rotation: Rotation,
    spin: SpinState,
    placed: bool,
    spawn_slot: Option<usize>,
    /// Pose to restore after an aborted drag
    home_position: (f32, f32),
    /// Memoized rotation variants of the canonical bitmap
    schemas: Option<ArrayVec<Schema, 4>>,
}

/// Rotate an atom offset by quarter turns, clockwise on screen
/// (dy grows downward, so one turn maps (dx, dy) to (-dy, dx))
fn rotate_offset(offset: (i8, i8), rotation: Rotation) -> (i8, i8) {
    let (mut dx, mut dy) = offset;
    for _ in 0..rotation.quarter_turns() {
        let t = dx;
        dx = -dy;
        dy = t;
    }
    (dx, dy)
}

impl Piece {
    pub fn new(
        id: PieceId,
        kind: PieceKind,
        offsets: Vec<(i8, i8)>,
        spawn_slot: Option<usize>,
        position: (f32, f32),
    ) -> Self {
        Self {
            id,
            kind,
            offsets,
            position,
            rotation: Rotation::R0,
            spin: SpinState::Idle,
            placed: false,
            spawn_slot,
            home_position: position,
            schemas: None,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn offsets(&self) -> &[(i8, i8)] {
        &self.offsets
    }

    pub fn atom_count(&self) -> usize {
        self.offsets.len()
    }

    pub fn position(&self) -> (f32, f32) {
        self.position
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn is_placed(&self) -> bool {
        self.placed
    }

    pub fn spawn_slot(&self) -> Option<usize> {
        self.spawn_slot
    }

    pub fn is_turning(&self) -> bool {
        matches!(self.spin, SpinState::Turning { .. })
    }

    pub(crate) fn set_placed(&mut self, placed: bool) {
        self.placed = placed;
    }

    /// Move the piece origin to a new world position (drag input)
    pub fn set_position(&mut self, position: (f32, f32)) {
        self.position = position;
    }

    /// Translate the piece origin by a world-space delta
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.position.0 += dx;
        self.position.1 += dy;
    }

    /// Restore the spawn pose after an aborted drag
    pub fn return_to_home(&mut self) {
        self.settle_spin();
        self.position = self.home_position;
        self.rotation = Rotation::R0;
    }

    /// Begin a quarter-turn. Ignored while a turn is already in flight or
    /// once the piece is placed, matching drag-time behavior.
    pub fn start_turn(&mut self, clockwise: bool) -> bool {
        if self.placed || self.is_turning() {
            return false;
        }
        let target = if clockwise {
            self.rotation.rotate_cw()
        } else {
            self.rotation.rotate_ccw()
        };
        self.spin = SpinState::Turning {
            remaining: TURN_STEPS,
            target,
        };
        true
    }

    /// Advance an in-flight turn by one discrete step
    pub fn step_spin(&mut self) {
        if let SpinState::Turning { remaining, target } = self.spin {
            if remaining <= 1 {
                self.rotation = target;
                self.spin = SpinState::Idle;
            } else {
                self.spin = SpinState::Turning {
                    remaining: remaining - 1,
                    target,
                };
            }
        }
    }

    /// Join point: run any in-flight turn to completion so the pose is final.
    /// A rendezvous on the cooperative spin state, not a sleep.
    pub fn settle_spin(&mut self) {
        while self.is_turning() {
            self.step_spin();
        }
    }

    /// World positions of every atom under the current committed rotation
    pub fn world_atoms(&self, cell_size: f32) -> Vec<(f32, f32)> {
        self.offsets
            .iter()
            .map(|&offset| {
                let (dx, dy) = rotate_offset(offset, self.rotation);
                (
                    self.position.0 + f32::from(dx) * cell_size,
                    self.position.1 - f32::from(dy) * cell_size,
                )
            })
            .collect()
    }

    /// Rotation variants of the canonical bitmap, generated on first use and
    /// memoized. Malformed offsets surface here as a [`SchemaError`].
    pub fn schemas(&mut self) -> Result<&ArrayVec<Schema, 4>, SchemaError> {
        let schemas = match self.schemas.take() {
            Some(schemas) => schemas,
            None => generate_schemas(&self.offsets)?,
        };
        Ok(self.schemas.insert(schemas))
    }
}
