//! Full game loop through the session API

use blockfit::core::{GameSession, Grid, PieceLibrary, PlacementEngine};
use blockfit::types::{GameEvent, PieceId, CELL_SIZE, GRID_COLS, GRID_ROWS, SPAWN_SLOTS};

fn session(seed: u32) -> GameSession {
    let engine = PlacementEngine::new(Grid::new(GRID_ROWS, GRID_COLS, (0.0, 0.0), CELL_SIZE));
    GameSession::new(engine, PieceLibrary::standard(), seed)
}

/// Scan every cell for a pose where the candidate commits, in reading order
fn place_anywhere(session: &mut GameSession, id: PieceId) -> Option<Vec<GameEvent>> {
    for row in 0..session.engine().grid().rows() {
        for col in 0..session.engine().grid().cols() {
            let center = session.engine().grid().cell_center(row, col);
            session.set_piece_position(id, center);
            if !session.validate_drag(id) {
                continue;
            }
            if let Ok(events) = session.commit_drag(id) {
                return Some(events);
            }
        }
    }
    session.cancel_drag(id);
    None
}

#[test]
fn test_same_seed_same_wave() {
    let mut a = session(777);
    let mut b = session(777);
    a.start();
    b.start();

    let wave_a = a.candidates();
    let wave_b = b.candidates();
    assert_eq!(wave_a, wave_b);
    for (&ia, &ib) in wave_a.iter().zip(wave_b.iter()) {
        let pa = a.engine().piece(ia).unwrap();
        let pb = b.engine().piece(ib).unwrap();
        assert_eq!(pa.kind(), pb.kind());
        assert_eq!(pa.offsets(), pb.offsets());
    }
}

#[test]
fn test_greedy_play_accumulates_score() {
    let mut session = session(2024);
    session.start();

    let mut commits = 0;
    for _ in 0..12 {
        if session.game_over() {
            break;
        }
        let Some(&id) = session.candidates().first() else {
            break;
        };
        if place_anywhere(&mut session, id).is_some() {
            commits += 1;
        } else {
            break;
        }
    }

    assert!(commits >= SPAWN_SLOTS);
    // Every commit pays the base placement value at minimum.
    assert!(session.score() as usize >= 100 * commits);
    // Slots are refilled whenever a wave is consumed.
    assert!(!session.candidates().is_empty());
}

#[test]
fn test_pick_up_and_replace_scores_twice() {
    let mut session = session(5);
    session.start();
    let id = session.candidates()[0];

    let events = place_anywhere(&mut session, id).unwrap();
    assert!(events.contains(&GameEvent::PlacementScored));
    let after_first = session.score();

    assert!(session.pick_up(id));
    let replay = place_anywhere(&mut session, id).unwrap();
    assert!(replay.contains(&GameEvent::PlacementScored));
    assert!(session.score() >= after_first + 100);
}

#[test]
fn test_spawned_wave_parks_off_grid() {
    let mut session = session(9);
    session.start();
    for id in session.candidates() {
        let piece = session.engine().piece(id).unwrap();
        assert!(!piece.is_placed());
        let (x, y) = piece.position();
        // Spawn homes sit below the grid, never over a cell.
        assert_eq!(session.engine().grid().cell_at_position(x, y), None);
    }
}
