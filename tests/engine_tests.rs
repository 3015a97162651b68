//! End-to-end placement flows through the public engine API

use blockfit::core::{Grid, PlaceError, PlacementEngine};
use blockfit::types::{GameEvent, PieceId, PieceKind, CELL_SIZE, GRID_COLS, GRID_ROWS};

fn engine() -> PlacementEngine {
    PlacementEngine::new(Grid::new(GRID_ROWS, GRID_COLS, (0.0, 0.0), CELL_SIZE))
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

/// Kind assignment where no two 4-adjacent cells share a kind
fn checkerboard_kind(row: usize, col: usize) -> PieceKind {
    PieceKind::ALL[(row + col) % PieceKind::ALL.len()]
}

#[test]
fn test_drag_validate_commit_flow() {
    let mut e = engine();
    let id = spawn_at(&mut e, PieceKind::Green, &[(0, 0), (1, 0), (0, 1)], 2, 3);

    let check = e.validate_drag(id);
    assert!(check.fits);
    assert_eq!(check.cells.len(), 3);

    e.commit_placement(id).unwrap();
    assert!(e.grid().is_occupied(2, 3));
    assert!(e.grid().is_occupied(2, 4));
    assert!(e.grid().is_occupied(3, 3));
    assert_eq!(e.take_events(), vec![GameEvent::PlacementScored]);
}

#[test]
fn test_same_kind_chain_bombs_and_vacates() {
    let mut e = engine();
    for col in 0..3 {
        let id = spawn_at(&mut e, PieceKind::Red, &[(0, 0)], 0, col);
        e.commit_placement(id).unwrap();
    }

    let events = e.take_events();
    assert_eq!(
        events,
        vec![
            GameEvent::PlacementScored,
            GameEvent::PlacementScored,
            GameEvent::ComboScored(2),
            GameEvent::PlacementScored,
            GameEvent::ComboScored(3),
            GameEvent::BombScored(3),
        ]
    );
    // The eliminated pieces are gone and their cells are vacant again.
    for col in 0..3 {
        assert!(e.grid().is_vacant(0, col));
    }
    assert!(e.piece_ids().is_empty());
    assert!(e.tracker().records().is_empty());
}

#[test]
fn test_mixed_kinds_do_not_cluster() {
    let mut e = engine();
    let a = spawn_at(&mut e, PieceKind::Red, &[(0, 0)], 0, 0);
    e.commit_placement(a).unwrap();
    let b = spawn_at(&mut e, PieceKind::Blue, &[(0, 0)], 0, 1);
    e.commit_placement(b).unwrap();

    let events = e.take_events();
    assert!(!events.iter().any(|ev| matches!(ev, GameEvent::ComboScored(_))));
    assert!(e.tracker().records().is_empty());
}

#[test]
fn test_diagonal_contact_does_not_count() {
    let mut e = engine();
    let a = spawn_at(&mut e, PieceKind::Yellow, &[(0, 0)], 3, 3);
    e.commit_placement(a).unwrap();
    let b = spawn_at(&mut e, PieceKind::Yellow, &[(0, 0)], 4, 4);
    e.commit_placement(b).unwrap();

    let events = e.take_events();
    assert_eq!(
        events,
        vec![GameEvent::PlacementScored, GameEvent::PlacementScored]
    );
}

#[test]
fn test_remove_then_replace_elsewhere() {
    let mut e = engine();
    let id = spawn_at(&mut e, PieceKind::Blue, &[(0, 0), (1, 0)], 1, 1);
    e.commit_placement(id).unwrap();
    assert!(e.remove_piece(id, false));
    assert!(e.grid().is_vacant(1, 1));
    assert!(e.grid().is_vacant(1, 2));

    let center = e.grid().cell_center(6, 6);
    e.piece_mut(id).unwrap().set_position(center);
    e.commit_placement(id).unwrap();
    assert!(e.grid().is_occupied(6, 6));
    assert!(e.grid().is_occupied(6, 7));
}

#[test]
fn test_exact_drag_vs_translational_availability() {
    // 3x3 board with only the rightmost column vacant.
    let mut e = PlacementEngine::new(Grid::new(3, 3, (0.0, 0.0), CELL_SIZE));
    for row in 0..3 {
        for col in 0..2 {
            let id = spawn_at(&mut e, checkerboard_kind(row, col), &[(0, 0)], row, col);
            e.commit_placement(id).unwrap();
        }
    }

    // A horizontal line of three cannot commit at its current pose, but the
    // availability check finds the vertical rotation in the free column.
    let id = spawn_at(&mut e, PieceKind::Red, &[(0, 0), (1, 0), (2, 0)], 0, 0);
    assert!(!e.validate_drag(id).fits);
    assert_eq!(e.commit_placement(id), Err(PlaceError::Occupied));

    let availability = e.check_available(&[id]);
    assert!(availability.any_fits);
    assert_eq!(availability.fittable, vec![id]);
}

#[test]
fn test_scattered_vacancies_reject_square_candidate() {
    // 4x4 board with four isolated vacant cells.
    let mut e = PlacementEngine::new(Grid::new(4, 4, (0.0, 0.0), CELL_SIZE));
    for row in 0..4 {
        for col in 0..4 {
            if (row, col) == (0, 0)
                || (row, col) == (0, 2)
                || (row, col) == (2, 0)
                || (row, col) == (2, 2)
            {
                continue;
            }
            let id = spawn_at(&mut e, checkerboard_kind(row, col), &[(0, 0)], row, col);
            e.commit_placement(id).unwrap();
        }
    }
    assert_eq!(e.grid().vacancy_map().ones(), 4);

    let square = e
        .spawn_piece(
            PieceKind::Green,
            &[(0, 0), (1, 0), (0, 1), (1, 1)],
            None,
            (0.0, 0.0),
        )
        .unwrap();
    let single = e
        .spawn_piece(PieceKind::Green, &[(0, 0)], None, (0.0, 0.0))
        .unwrap();

    let availability = e.check_available(&[square, single]);
    assert!(availability.any_fits);
    assert_eq!(availability.fittable, vec![single]);
}

#[test]
fn test_rotation_joined_before_commit() {
    let mut e = engine();
    // A vertical line of three would poke past row 7 from row 6; one turn
    // makes it horizontal and it fits.
    let id = spawn_at(&mut e, PieceKind::Red, &[(0, 0), (0, 1), (0, 2)], 6, 2);
    assert!(!e.validate_drag(id).fits);

    e.piece_mut(id).unwrap().start_turn(true);
    e.commit_placement(id).unwrap();
    assert!(e.grid().is_occupied(6, 2));
    assert!(!e.piece(id).unwrap().is_turning());
}
