//! Gravity - settling flying cells after a clear
//!
//! Planning computes every flying cell's resting row in a single pass:
//! cells are visited lowest first (then by x), and each one drops while the
//! row below its working target is free among *all* live cells' working
//! targets. Because lower cells are resolved first, a stack of flying cells
//! in one column settles contiguously without iteration.
//!
//! Movement is then stepped one row per tick for all falling cells at once,
//! so a presenter can pace it.

use std::collections::HashSet;

use crate::grid::{CellId, Grid};
use crate::types::RESTING_FLOOR_Y;

/// Compute targets for every flying cell and clear the flying flags
///
/// Returns the cells that still have to move, ordered by ascending y then x.
/// An empty result means the board is already stable.
pub fn plan(grid: &mut Grid) -> Vec<CellId> {
    let mut flying: Vec<(i32, i32, CellId)> = grid
        .playfield()
        .filter(|cell| cell.flying)
        .map(|cell| (cell.y, cell.x, cell.id))
        .collect();
    if flying.is_empty() {
        return Vec::new();
    }
    flying.sort_unstable();

    // Working targets start at the current position for every live cell.
    let mut occupied: HashSet<(i32, i32)> = HashSet::new();
    for cell in grid.cells_mut() {
        if cell.origin.is_playfield() {
            cell.target_y = cell.y;
            occupied.insert((cell.x, cell.y));
        }
    }

    for &(y, x, id) in &flying {
        let mut target = y;
        while target > RESTING_FLOOR_Y && !occupied.contains(&(x, target - 1)) {
            target -= 1;
        }
        if target != y {
            occupied.remove(&(x, y));
            occupied.insert((x, target));
        }
        if let Some(cell) = grid.get_mut(id) {
            cell.target_y = target;
            cell.flying = false;
        }
    }

    let falling: Vec<CellId> = flying
        .into_iter()
        .filter(|&(y, _, id)| grid.get(id).is_some_and(|cell| cell.target_y != y))
        .map(|(_, _, id)| id)
        .collect();

    tracing::debug!(falling = falling.len(), "planned gravity targets");
    falling
}

/// Move every falling cell one row towards its target
///
/// Returns true while any cell still has to move.
pub fn step(grid: &mut Grid, falling: &[CellId]) -> bool {
    let mut pending = false;

    // `falling` is ordered lowest first, so a cell never moves into a row its
    // neighbor below has not vacated yet.
    for &id in falling {
        let Some(cell) = grid.get(id) else {
            continue;
        };
        if cell.y == cell.target_y {
            continue;
        }

        let next = cell.y - 1;
        let target = cell.target_y;
        if let Err(err) = grid.move_to(id, next) {
            tracing::warn!(%err, cell = id.0, "falling cell blocked, settling in place");
            if let Some(cell) = grid.get_mut(id) {
                cell.target_y = cell.y;
            }
            continue;
        }

        if next != target {
            pending = true;
        }
    }

    pending
}

/// Plan and run gravity to completion without pacing
///
/// Returns the number of rows stepped.
pub fn settle(grid: &mut Grid) -> usize {
    let falling = plan(grid);
    if falling.is_empty() {
        return 0;
    }

    let mut rows = 1;
    while step(grid, &falling) {
        rows += 1;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellColor, Origin};

    fn piece(grid: &mut Grid, x: i32, y: i32) -> CellId {
        grid.insert(x, y, CellColor::Palette(0), Origin::Piece)
            .unwrap()
    }

    fn mark(grid: &mut Grid, id: CellId) {
        grid.get_mut(id).unwrap().flying = true;
    }

    #[test]
    fn test_no_flying_cells_is_noop() {
        let mut grid = Grid::new();
        piece(&mut grid, 1, 4);
        assert!(plan(&mut grid).is_empty());
        assert_eq!(settle(&mut grid), 0);
        assert!(grid.is_occupied(1, 4));
    }

    #[test]
    fn test_single_cell_falls_to_floor_row() {
        let mut grid = Grid::new();
        let id = piece(&mut grid, 2, 5);
        mark(&mut grid, id);

        let falling = plan(&mut grid);
        assert_eq!(falling, vec![id]);
        assert_eq!(grid.get(id).unwrap().target_y, 1);
        assert!(!grid.get(id).unwrap().flying);

        // 5 -> 4 -> 3 -> 2 -> 1
        assert!(step(&mut grid, &falling));
        assert!(step(&mut grid, &falling));
        assert!(step(&mut grid, &falling));
        assert!(!step(&mut grid, &falling));
        assert_eq!(grid.get(id).unwrap().y, 1);
    }

    #[test]
    fn test_stack_settles_contiguously() {
        let mut grid = Grid::new();
        piece(&mut grid, 3, 1);
        let a = piece(&mut grid, 3, 4);
        let b = piece(&mut grid, 3, 5);
        let c = piece(&mut grid, 3, 7);
        for id in [c, a, b] {
            mark(&mut grid, id);
        }

        settle(&mut grid);
        assert_eq!(grid.get(a).unwrap().y, 2);
        assert_eq!(grid.get(b).unwrap().y, 3);
        assert_eq!(grid.get(c).unwrap().y, 4);
        assert!(grid.is_consistent());
    }

    #[test]
    fn test_supported_cell_does_not_move() {
        let mut grid = Grid::new();
        piece(&mut grid, 1, 2);
        let id = piece(&mut grid, 1, 3);
        mark(&mut grid, id);

        assert!(plan(&mut grid).is_empty());
        assert_eq!(grid.get(id).unwrap().y, 3);
        assert!(!grid.get(id).unwrap().flying);
    }

    #[test]
    fn test_columns_fall_independently() {
        let mut grid = Grid::new();
        let left = piece(&mut grid, 1, 3);
        let right = piece(&mut grid, 2, 6);
        piece(&mut grid, 2, 2);
        mark(&mut grid, left);
        mark(&mut grid, right);

        let rows = settle(&mut grid);
        assert_eq!(grid.get(left).unwrap().y, 1);
        assert_eq!(grid.get(right).unwrap().y, 3);
        assert_eq!(rows, 3);
    }
}
