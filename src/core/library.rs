//! Piece library - authored piece templates and their JSON descriptor format
//!
//! Templates are validated through schema generation at load time; a
//! malformed template is dropped with a warning and never reaches the
//! spawner. The JSON shape mirrors what the content pipeline exports:
//!
//! ```json
//! [
//!   { "kind": "red", "offsets": [[0, 0], [1, 0]] }
//! ]
//! ```

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::core::shape::generate_schemas;
use crate::types::PieceKind;

/// An authored piece: type tag plus atom offsets fixed at spawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceTemplate {
    pub kind: PieceKind,
    pub offsets: Vec<(i8, i8)>,
}

/// Raw descriptor as it appears in JSON
#[derive(Debug, Deserialize)]
struct TemplateSpec {
    kind: String,
    offsets: Vec<[i8; 2]>,
}

/// The set of piece templates offered to the spawner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceLibrary {
    templates: Vec<PieceTemplate>,
}

impl PieceLibrary {
    /// Build from already-validated templates
    pub fn new(templates: Vec<PieceTemplate>) -> Result<Self> {
        if templates.is_empty() {
            return Err(anyhow!("piece library is empty"));
        }
        Ok(Self { templates })
    }

    /// Parse a JSON descriptor list. Templates that fail schema generation
    /// are dropped (the defect is fatal only for that template); an unknown
    /// kind or unparsable document is an error.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let specs: Vec<TemplateSpec> =
            serde_json::from_str(json).context("parsing piece library JSON")?;

        let mut templates = Vec::with_capacity(specs.len());
        for (index, spec) in specs.into_iter().enumerate() {
            let kind = PieceKind::from_str(&spec.kind)
                .ok_or_else(|| anyhow!("template {}: unknown kind {:?}", index, spec.kind))?;
            let offsets: Vec<(i8, i8)> =
                spec.offsets.iter().map(|&[dx, dy]| (dx, dy)).collect();
            match generate_schemas(&offsets) {
                Ok(_) => templates.push(PieceTemplate { kind, offsets }),
                Err(err) => {
                    log::warn!("dropping template {} ({}): {}", index, kind.as_str(), err.message());
                }
            }
        }
        Self::new(templates)
    }

    /// Built-in template set: the classic drag-puzzle footprints across all
    /// four kinds.
    pub fn standard() -> Self {
        const FOOTPRINTS: [&[(i8, i8)]; 6] = [
            // Single
            &[(0, 0)],
            // Domino
            &[(0, 0), (1, 0)],
            // Line of three
            &[(0, 0), (1, 0), (2, 0)],
            // L-tromino
            &[(0, 0), (1, 0), (0, 1)],
            // Square
            &[(0, 0), (1, 0), (0, 1), (1, 1)],
            // T-tetromino
            &[(0, 0), (1, 0), (2, 0), (1, 1)],
        ];

        let mut templates = Vec::with_capacity(FOOTPRINTS.len() * PieceKind::ALL.len());
        for kind in PieceKind::ALL {
            for footprint in FOOTPRINTS {
                templates.push(PieceTemplate {
                    kind,
                    offsets: footprint.to_vec(),
                });
            }
        }
        Self { templates }
    }

    pub fn templates(&self) -> &[PieceTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PieceTemplate> {
        self.templates.get(index)
    }
}
