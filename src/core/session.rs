//! Session module - explicit wiring of the core services
//!
//! The original game reached every service through global singleton
//! managers; here the session constructs and owns the engine, the piece
//! library, and the spawner state, so the whole core runs headless in unit
//! tests. The session also keeps the reference score tally and the reroll
//! budget, and raises the game-over signal when the availability check finds
//! no fit for the offered candidates.

use crate::core::library::PieceLibrary;
use crate::core::placement::{PlaceError, PlacementEngine};
use crate::core::rng::SimpleRng;
use crate::core::scoring::score_event;
use crate::types::{GameEvent, PieceId, MAX_REROLLS, REROLL_SCORE_STEP, SPAWN_SLOTS};

/// Top-level game core: engine + spawner + score/reroll bookkeeping
#[derive(Debug, Clone)]
pub struct GameSession {
    engine: PlacementEngine,
    library: PieceLibrary,
    rng: SimpleRng,
    slots: [Option<PieceId>; SPAWN_SLOTS],
    score: u32,
    rerolls: u32,
    reroll_watermark: u32,
    started: bool,
    game_over: bool,
}

impl GameSession {
    pub fn new(engine: PlacementEngine, library: PieceLibrary, seed: u32) -> Self {
        Self {
            engine,
            library,
            rng: SimpleRng::new(seed),
            slots: [None; SPAWN_SLOTS],
            score: 0,
            rerolls: 0,
            reroll_watermark: 0,
            started: false,
            game_over: false,
        }
    }

    pub fn engine(&self) -> &PlacementEngine {
        &self.engine
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn rerolls(&self) -> u32 {
        self.rerolls
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Piece ids currently offered in spawn slots
    pub fn candidates(&self) -> Vec<PieceId> {
        self.slots.iter().flatten().copied().collect()
    }

    /// Start the session and spawn the first wave
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.spawn_wave();
    }

    /// World pose where a spawn slot parks its piece, below the grid
    fn slot_home(&self, slot: usize) -> (f32, f32) {
        let grid = self.engine.grid();
        let cell = grid.cell_size();
        let (x0, y0) = grid.cell_center(grid.rows() - 1, 0);
        (x0 + slot as f32 * 3.0 * cell, y0 - 2.0 * cell)
    }

    /// Fill every empty slot with a random template piece
    fn spawn_wave(&mut self) {
        for slot in 0..SPAWN_SLOTS {
            if self.slots[slot].is_some() {
                continue;
            }
            let index = self.rng.next_range(self.library.len() as u32) as usize;
            let Some(template) = self.library.get(index) else {
                continue;
            };
            let home = self.slot_home(slot);
            match self
                .engine
                .spawn_piece(template.kind, &template.offsets, Some(slot), home)
            {
                Ok(id) => self.slots[slot] = Some(id),
                Err(err) => {
                    // Library templates are pre-validated; a miss here is a
                    // content bug worth surfacing.
                    log::warn!("spawn failed for template {}: {}", index, err.message());
                }
            }
        }
    }

    /// Drag input: move a piece's origin to a world position
    pub fn set_piece_position(&mut self, id: PieceId, position: (f32, f32)) -> bool {
        match self.engine.piece_mut(id) {
            Some(piece) if !piece.is_placed() => {
                piece.set_position(position);
                true
            }
            _ => false,
        }
    }

    /// Drag input: request a quarter turn
    pub fn rotate_piece(&mut self, id: PieceId, clockwise: bool) -> bool {
        self.engine
            .piece_mut(id)
            .map_or(false, |piece| piece.start_turn(clockwise))
    }

    /// Advance every in-flight rotation by one discrete step
    pub fn tick_spins(&mut self) {
        for id in self.engine.piece_ids() {
            if let Some(piece) = self.engine.piece_mut(id) {
                piece.step_spin();
            }
        }
    }

    /// Drag feedback: preview the placement at the current pose
    pub fn validate_drag(&mut self, id: PieceId) -> bool {
        self.engine.validate_drag(id).fits
    }

    /// Drag release: try to commit the piece at its current pose.
    ///
    /// On success the spawn slot is freed, events are folded into the score
    /// and reroll budget, the wave respawns once all slots are consumed, and
    /// (when no rerolls remain) the availability check runs over the live
    /// candidates. The returned events include any `GameOverSignal`. On
    /// rejection nothing changes and the caller restores the pose.
    pub fn commit_drag(&mut self, id: PieceId) -> Result<Vec<GameEvent>, PlaceError> {
        if !self.started || self.game_over {
            return Err(PlaceError::NotPlayable);
        }

        self.engine.commit_placement(id)?;

        for slot in self.slots.iter_mut() {
            if *slot == Some(id) {
                *slot = None;
            }
        }

        let mut events = self.engine.take_events();
        for event in &events {
            self.score += score_event(event);
        }
        self.award_rerolls();

        if self.slots.iter().all(Option::is_none) {
            self.spawn_wave();
        }

        // A reroll in hand defers the game-over question: the player can
        // still swap the wave.
        if self.rerolls == 0 {
            let candidates = self.candidates();
            if !self.engine.check_available(&candidates).any_fits {
                log::debug!("no candidate fits anywhere; game over");
                self.game_over = true;
                events.push(GameEvent::GameOverSignal);
            }
        }

        Ok(events)
    }

    /// Aborted drag: restore the spawn pose and drop the preview
    pub fn cancel_drag(&mut self, id: PieceId) {
        self.engine.clear_preview();
        if let Some(piece) = self.engine.piece_mut(id) {
            if !piece.is_placed() {
                piece.return_to_home();
            }
        }
    }

    /// Lift a placed piece back off the grid (where the game mode allows it)
    pub fn pick_up(&mut self, id: PieceId) -> bool {
        let placed = self.engine.piece(id).map_or(false, |p| p.is_placed());
        if !placed {
            return false;
        }
        self.engine.remove_piece(id, false)
    }

    /// Spend a reroll: discard the offered wave and spawn a fresh one
    pub fn reroll(&mut self) -> bool {
        if self.rerolls == 0 || self.game_over || !self.started {
            return false;
        }
        self.rerolls -= 1;
        for slot in 0..SPAWN_SLOTS {
            if let Some(id) = self.slots[slot].take() {
                self.engine.remove_piece(id, true);
            }
        }
        self.spawn_wave();
        log::debug!("rerolled wave; {} rerolls left", self.rerolls);
        true
    }

    /// Award one reroll per score step crossed, up to the cap
    fn award_rerolls(&mut self) {
        while self.score - self.reroll_watermark >= REROLL_SCORE_STEP {
            self.reroll_watermark += REROLL_SCORE_STEP;
            if self.rerolls < MAX_REROLLS {
                self.rerolls += 1;
            }
        }
    }
}
