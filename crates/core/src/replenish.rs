//! Column replenishment
//!
//! After a turn resolves, both boundary columns are refilled to the column
//! height one round at a time. A round inserts one cell on top of every
//! column that is still short, so both columns may grow in the same round.

use arrayvec::ArrayVec;

use crate::config::BoardConfig;
use crate::grid::{CellId, Grid};
use crate::rng::ColorSource;
use crate::types::{CellColor, Side};

/// Cells inserted by one refill round
pub type RefillRound = ArrayVec<CellId, 2>;

fn column_x(config: &BoardConfig, side: Side) -> i32 {
    match side {
        Side::Left => config.left_column_x,
        Side::Right => config.right_column_x,
    }
}

/// Whether either column is below the configured height
pub fn needs_refill(grid: &Grid, config: &BoardConfig) -> bool {
    let height = config.column_height.max(0) as usize;
    Side::BOTH
        .iter()
        .any(|side| grid.column_height(*side) < height)
}

/// Insert one cell into every short column
///
/// New cells go on the next stacked position (height + 1) with a fresh color.
/// Returns the inserted ids; an empty round means both columns are full.
pub fn refill_round<C: ColorSource + ?Sized>(
    grid: &mut Grid,
    config: &BoardConfig,
    colors: &mut C,
) -> RefillRound {
    let height = config.column_height.max(0) as usize;
    let palette = config.palette();
    let mut inserted = RefillRound::new();

    for side in Side::BOTH {
        let current = grid.column_height(side);
        if current >= height {
            continue;
        }

        let x = column_x(config, side);
        let y = current as i32 + 1;
        let color = CellColor::clamped(colors.next_color(palette), palette);
        match grid.insert(x, y, color, side.origin()) {
            Ok(id) => inserted.push(id),
            Err(err) => {
                tracing::warn!(%err, ?side, "column refill slot is taken, skipping");
            }
        }
    }

    if !inserted.is_empty() {
        tracing::debug!(
            left = grid.column_height(Side::Left),
            right = grid.column_height(Side::Right),
            "refilled columns"
        );
    }
    inserted
}

/// Refill both columns completely, returning the number of inserting rounds
pub fn refill_all<C: ColorSource + ?Sized>(
    grid: &mut Grid,
    config: &BoardConfig,
    colors: &mut C,
) -> usize {
    let mut rounds = 0;
    while !refill_round(grid, config, colors).is_empty() {
        rounds += 1;
    }
    rounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedColors;
    use crate::types::Origin;

    fn small_config() -> BoardConfig {
        BoardConfig {
            column_height: 4,
            ..BoardConfig::default()
        }
    }

    #[test]
    fn test_fills_empty_columns_in_height_rounds() {
        let config = small_config();
        let mut grid = Grid::new();
        let mut colors = ScriptedColors::new([0, 1, 2, 3]);

        let rounds = refill_all(&mut grid, &config, &mut colors);
        assert_eq!(rounds, 4);
        assert_eq!(grid.column_height(Side::Left), 4);
        assert_eq!(grid.column_height(Side::Right), 4);

        // Cells stack from y = 1 at the column x
        for y in 1..=4 {
            assert_eq!(
                grid.cell_at(0, y).map(|c| c.origin),
                Some(Origin::LeftColumn)
            );
            assert_eq!(
                grid.cell_at(6, y).map(|c| c.origin),
                Some(Origin::RightColumn)
            );
        }
    }

    #[test]
    fn test_uneven_columns_catch_up_independently() {
        let config = small_config();
        let mut grid = Grid::new();
        let mut colors = ScriptedColors::constant(1);
        for y in 1..=3 {
            grid.insert(0, y, CellColor::Palette(0), Origin::LeftColumn)
                .unwrap();
        }

        let first = refill_round(&mut grid, &config, &mut colors);
        assert_eq!(first.len(), 2);

        let rounds = refill_all(&mut grid, &config, &mut colors);
        assert_eq!(rounds, 3);
        assert!(!needs_refill(&grid, &config));
    }

    #[test]
    fn test_full_columns_are_noop() {
        let config = small_config();
        let mut grid = Grid::new();
        let mut colors = ScriptedColors::constant(0);
        refill_all(&mut grid, &config, &mut colors);
        let drawn = colors.drawn();

        assert!(refill_round(&mut grid, &config, &mut colors).is_empty());
        assert_eq!(colors.drawn(), drawn);
    }

    #[test]
    fn test_out_of_palette_colors_are_clamped() {
        let config = small_config();
        let mut grid = Grid::new();
        let mut colors = ScriptedColors::constant(42);
        refill_round(&mut grid, &config, &mut colors);

        assert_eq!(
            grid.cell_at(0, 1).map(|c| c.color),
            Some(CellColor::Palette(3))
        );
    }
}
