//! Core module - pure placement logic with no UI or I/O dependencies
//!
//! Components are explicitly constructed services wired together by
//! [`session::GameSession`]; nothing here reaches for global state.

pub mod availability;
pub mod cluster;
pub mod grid;
pub mod library;
pub mod piece;
pub mod placement;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod shape;

// Re-export commonly used types
pub use availability::{fit_test, Availability};
pub use cluster::{ClusterTracker, ContactRecord};
pub use grid::{AtomRef, Grid};
pub use library::{PieceLibrary, PieceTemplate};
pub use piece::Piece;
pub use placement::{PlaceError, PlacementEngine};
pub use rng::SimpleRng;
pub use session::GameSession;
pub use shape::{generate_schemas, Schema, SchemaError};
