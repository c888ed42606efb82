//! Line clears - removing regions that span the whole board
//!
//! A region clears iff it holds at least one left-column cell and at least
//! one right-column cell; connectivity already proves a path between them.
//! All clearing regions of a pass are destroyed before any flying cell is
//! marked, so overlapping column effects from separate clears compose.

use crate::grid::{Cell, CellId, Grid};
use crate::region::{find_regions, Region};
use crate::types::{Origin, RESTING_FLOOR_Y};

/// Outcome of one clear pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClearReport {
    /// Number of regions that cleared
    pub regions: usize,
    /// Every destroyed cell, as it was just before removal
    pub destroyed: Vec<Cell>,
    /// Cells marked as flying, in id order
    pub flying: Vec<CellId>,
}

impl ClearReport {
    pub fn is_empty(&self) -> bool {
        self.destroyed.is_empty()
    }
}

/// Whether a region touches both boundary columns
pub fn region_clears(grid: &Grid, region: &Region) -> bool {
    region.touches(grid, Origin::LeftColumn) && region.touches(grid, Origin::RightColumn)
}

/// Run one full clear pass over the board
///
/// Transient annotations are reset first, so `flying` afterwards reflects only
/// this pass.
pub fn resolve_clears(grid: &mut Grid) -> ClearReport {
    grid.reset_annotations();

    let clearing: Vec<Region> = find_regions(grid)
        .into_iter()
        .filter(|region| region_clears(grid, region))
        .collect();

    let mut report = ClearReport {
        regions: clearing.len(),
        ..ClearReport::default()
    };

    for region in &clearing {
        for id in &region.cells {
            if let Some(cell) = grid.remove(*id) {
                report.destroyed.push(cell);
            }
        }
    }

    for cell in &report.destroyed {
        mark_flying_above(grid, cell.x, cell.y);
    }

    report.flying = grid
        .playfield()
        .filter(|cell| cell.flying)
        .map(|cell| cell.id)
        .collect();

    if !report.is_empty() {
        tracing::debug!(
            regions = report.regions,
            destroyed = report.destroyed.len(),
            flying = report.flying.len(),
            "cleared spanning regions"
        );
    }

    report
}

/// Mark the stack above a destroyed position as flying
///
/// Nothing is marked when the lowest surviving cell above already rests on the
/// floor row.
fn mark_flying_above(grid: &mut Grid, x: i32, y: i32) {
    let mut above: Vec<(i32, CellId)> = grid
        .playfield()
        .filter(|cell| cell.x == x && cell.y > y)
        .map(|cell| (cell.y, cell.id))
        .collect();
    above.sort_unstable();

    let Some(&(lowest_y, _)) = above.first() else {
        return;
    };
    if lowest_y <= RESTING_FLOOR_Y {
        return;
    }

    for (_, id) in above {
        if let Some(cell) = grid.get_mut(id) {
            cell.flying = true;
        }
    }
}
