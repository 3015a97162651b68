//! Availability module - translational existence search over the vacancy map
//!
//! Answers "could this shape be placed somewhere", not "does it fit at this
//! exact position" - that second question belongs to the placement engine's
//! drag validation and the two must stay separate.

use crate::core::placement::PlacementEngine;
use crate::core::shape::Schema;
use crate::types::PieceId;

/// Result of an availability query over a candidate set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub any_fits: bool,
    /// Candidates for which at least one rotation fits somewhere
    pub fittable: Vec<PieceId>,
}

/// Existence test: can the shape slide anywhere onto the vacancy map?
///
/// Every in-bounds top-left window is tried. The window's vacancy sum is
/// compared against the shape's 1-count first (a necessary condition that
/// prunes most windows cheaply); survivors get an exact comparison where
/// every shape 1 needs a vacancy 1 and shape 0s are unconstrained. Returns on
/// the first valid window.
pub fn fit_test(vacant: &Schema, shape: &Schema) -> bool {
    let (vrows, vcols) = (vacant.rows(), vacant.cols());
    let (srows, scols) = (shape.rows(), shape.cols());
    if srows > vrows || scols > vcols {
        return false;
    }

    let needed = shape.ones();
    for i in 0..=(vrows - srows) {
        for j in 0..=(vcols - scols) {
            if vacant.window_sum(i, j, srows, scols) < needed {
                continue;
            }
            if window_matches(vacant, shape, i, j) {
                return true;
            }
        }
    }
    false
}

fn window_matches(vacant: &Schema, shape: &Schema, i: usize, j: usize) -> bool {
    for m in 0..shape.rows() {
        for n in 0..shape.cols() {
            if shape.get(m, n) == 1 && vacant.get(i + m, j + n) != 1 {
                return false;
            }
        }
    }
    true
}

impl PlacementEngine {
    /// Check which candidate pieces can still be placed somewhere.
    ///
    /// Builds the vacancy snapshot once; each candidate lazily generates its
    /// schema variants if absent and is fittable when any rotation passes
    /// [`fit_test`]. Unknown ids and malformed templates are simply not
    /// fittable.
    pub fn check_available(&mut self, candidates: &[PieceId]) -> Availability {
        let vacant = self.grid().vacancy_map();
        let mut fittable = Vec::new();
        for &id in candidates {
            let Some(piece) = self.piece_mut(id) else {
                continue;
            };
            let Ok(schemas) = piece.schemas() else {
                continue;
            };
            if schemas.iter().any(|shape| fit_test(&vacant, shape)) {
                fittable.push(id);
            }
        }
        Availability {
            any_fits: !fittable.is_empty(),
            fittable,
        }
    }
}
