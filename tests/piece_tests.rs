//! Piece tests - input handling, contact locks and landing

use connecting_squares::core::grid::Grid;
use connecting_squares::core::{BoardConfig, Piece, PieceController};
use connecting_squares::types::{CellColor, ContactPhase, Direction, InputFrame, Origin};

fn controller() -> PieceController {
    let config = BoardConfig::default();
    PieceController::new(Piece::spawn(&config, [0, 1]))
}

fn left() -> InputFrame {
    InputFrame {
        horizontal: -1.0,
        ..InputFrame::default()
    }
}

#[test]
fn test_rotation_into_locked_left_is_noop() {
    let mut c = controller();
    c.apply_contact(Direction::Left, ContactPhase::Begin);

    assert!(!c.rotate_left());
    assert_eq!(c.piece().secondary, Direction::Top);
}

#[test]
fn test_rotation_back_to_top_ignores_locks() {
    let mut c = controller();
    assert!(c.rotate_right());
    assert_eq!(c.piece().secondary, Direction::Right);

    c.apply_contact(Direction::Top, ContactPhase::Begin);
    assert!(c.rotate_left());
    assert_eq!(c.piece().secondary, Direction::Top);

    assert!(c.rotate_left());
    assert_eq!(c.piece().secondary, Direction::Left);
    assert!(c.rotate_right());
    assert_eq!(c.piece().secondary, Direction::Top);
}

#[test]
fn test_left_rotation_wins_over_right_on_same_tick() {
    let config = BoardConfig::default();
    let mut c = controller();
    c.handle_input(
        &InputFrame {
            rotate_left: true,
            rotate_right: true,
            ..InputFrame::default()
        },
        &config,
    );
    assert_eq!(c.piece().secondary, Direction::Left);
}

#[test]
fn test_pressing_into_locked_side_rearms_the_edge() {
    let config = BoardConfig::default();
    let mut c = controller();
    let start = c.piece().x;

    c.apply_contact(Direction::Left, ContactPhase::Begin);
    c.handle_input(&left(), &config);
    assert_eq!(c.piece().x, start);

    // Still holding left when the contact ends moves immediately
    c.apply_contact(Direction::Left, ContactPhase::End);
    c.handle_input(&left(), &config);
    assert_eq!(c.piece().x, start - 1);

    c.handle_input(&left(), &config);
    assert_eq!(c.piece().x, start - 1);
}

#[test]
fn test_overlapping_contacts_need_matching_ends() {
    let mut c = controller();
    c.apply_contact(Direction::Right, ContactPhase::Begin);
    c.apply_contact(Direction::Right, ContactPhase::Begin);
    c.apply_contact(Direction::Right, ContactPhase::End);
    assert!(c.locks().is_locked(Direction::Right));

    c.apply_contact(Direction::Right, ContactPhase::End);
    assert!(!c.locks().is_locked(Direction::Right));

    // An unmatched end never drives the count below zero
    c.apply_contact(Direction::Right, ContactPhase::End);
    assert_eq!(c.locks().count(Direction::Right), 0);
}

#[test]
fn test_sprint_uses_fast_fall_speed() {
    let config = BoardConfig::default();
    let mut normal = controller();
    let mut fast = controller();
    let y = normal.piece().y;

    normal.handle_input(&InputFrame::default(), &config);
    fast.handle_input(
        &InputFrame {
            vertical: -1.0,
            ..InputFrame::default()
        },
        &config,
    );

    assert!(fast.piece().y < normal.piece().y);
    assert!(normal.piece().y < y);
}

#[test]
fn test_landing_rounds_and_freezes() {
    let mut grid = Grid::new();
    let mut c = PieceController::new(Piece {
        x: 2,
        y: 1.02,
        secondary: Direction::Right,
        colors: [3, 1],
    });

    let [main, secondary] = c.land(&mut grid).unwrap();
    let main = grid.get(main).unwrap();
    let secondary = grid.get(secondary).unwrap();
    assert_eq!((main.x, main.y), (2, 1));
    assert_eq!((secondary.x, secondary.y), (3, 1));
    assert_eq!(main.color, CellColor::Palette(3));
    assert_eq!(secondary.origin, Origin::Piece);

    assert!(c.land(&mut grid).is_none());
    assert!(!c.is_enabled());
    assert_eq!(grid.len(), 2);
}
