//! Cluster module - same-kind contact records and threshold elimination
//!
//! The tracker stores a flat list of contact records whose piece sets may
//! overlap; it deliberately does not maintain a canonical disjoint-set
//! partition. Records below the bomb threshold are appended but never merged
//! or pruned, matching the observed behavior of the game this core was
//! extracted from.

use std::collections::BTreeSet;

use crate::types::{PieceId, PieceKind, BOMB_THRESHOLD};

/// Grouping of mutually-or-transitively adjacent same-kind placed pieces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub kind: PieceKind,
    pub pieces: BTreeSet<PieceId>,
}

/// Result of registering a placement with the tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactOutcome {
    /// No same-kind neighbor touched the placement
    None,
    /// A cluster formed below the bomb threshold
    Combo { size: usize },
    /// A cluster reached the threshold; every member must be eliminated
    Bomb { cluster: BTreeSet<PieceId> },
}

/// Tracks same-kind adjacency among placed pieces
#[derive(Debug, Clone, Default)]
pub struct ClusterTracker {
    records: Vec<ContactRecord>,
}

impl ClusterTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ContactRecord] {
        &self.records
    }

    /// Register a freshly-placed piece together with the distinct same-kind
    /// placed neighbors found next to its cells.
    ///
    /// The new contact set is unioned with every stored same-kind record it
    /// intersects. Below the threshold only the new record is appended and
    /// the matched records stay exactly as they were; at or above it the new
    /// record and every matched record are dropped and the caller removes
    /// the cluster pieces.
    pub fn on_placed(
        &mut self,
        kind: PieceKind,
        piece: PieceId,
        neighbors: &BTreeSet<PieceId>,
    ) -> ContactOutcome {
        if neighbors.is_empty() {
            return ContactOutcome::None;
        }

        let mut contact: BTreeSet<PieceId> = neighbors.clone();
        contact.insert(piece);

        let mut cluster = contact.clone();
        let mut matched: Vec<usize> = Vec::new();
        for (idx, record) in self.records.iter().enumerate() {
            if record.kind == kind && !record.pieces.is_disjoint(&contact) {
                cluster.extend(record.pieces.iter().copied());
                matched.push(idx);
            }
        }

        if cluster.len() < BOMB_THRESHOLD {
            self.records.push(ContactRecord {
                kind,
                pieces: contact,
            });
            return ContactOutcome::Combo {
                size: cluster.len(),
            };
        }

        for idx in matched.into_iter().rev() {
            self.records.remove(idx);
        }
        ContactOutcome::Bomb { cluster }
    }

    /// Delete every record referencing the piece
    pub fn remove_piece(&mut self, piece: PieceId) {
        self.records.retain(|record| !record.pieces.contains(&piece));
    }

    /// Drop all records (board reset)
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
