//! Block puzzle placement-and-elimination core.
//!
//! Multi-cell pieces are dragged onto a fixed grid. Placement is legal only
//! against empty cells; placing a piece next to same-kind neighbors forms
//! contact clusters that explode past a threshold. A separate availability
//! search decides whether any offered piece still fits anywhere, which drives
//! game-over.
//!
//! Rendering, input devices, audio, timers, and leaderboards are external
//! collaborators: they feed world poses in and consume [`types::GameEvent`]s
//! out.

pub mod core;
pub mod types;
