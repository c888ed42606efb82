//! Region grouping - maximal same-color 4-connected components
//!
//! A region is recomputed from scratch on every resolution pass and never
//! persisted. Grouping is a breadth-first flood fill over one color class;
//! the resulting partition does not depend on the order cells are visited,
//! and the output is canonicalized (cells by id, regions by their smallest
//! id) so callers can compare partitions directly.

use std::collections::{HashMap, HashSet, VecDeque};

use arrayvec::ArrayVec;

use crate::grid::{CellId, Grid};
use crate::types::{Direction, Origin};

/// A maximal set of same-colored, orthogonally connected live cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub color: u8,
    /// Members, sorted by id
    pub cells: Vec<CellId>,
}

impl Region {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether any member carries the given origin tag
    pub fn touches(&self, grid: &Grid, origin: Origin) -> bool {
        self.cells
            .iter()
            .filter_map(|id| grid.get(*id))
            .any(|cell| cell.origin == origin)
    }
}

/// Orthogonal neighbors of a position
pub fn neighbors(x: i32, y: i32) -> ArrayVec<(i32, i32), 4> {
    Direction::ALL
        .iter()
        .map(|dir| {
            let (dx, dy) = dir.offset();
            (x + dx, y + dy)
        })
        .collect()
}

/// Partition one color class into its connected components
///
/// `cells` is every live cell of a single color as `(id, (x, y))`, in any
/// order. Every input cell appears in exactly one output group.
pub fn group_cells<I>(cells: I) -> Vec<Vec<CellId>>
where
    I: IntoIterator<Item = (CellId, (i32, i32))>,
{
    let by_position: HashMap<(i32, i32), CellId> =
        cells.into_iter().map(|(id, pos)| (pos, id)).collect();

    // Seed order only affects traversal, never the partition.
    let mut seeds: Vec<((i32, i32), CellId)> =
        by_position.iter().map(|(pos, id)| (*pos, *id)).collect();
    seeds.sort_by_key(|(_, id)| *id);

    let mut visited: HashSet<CellId> = HashSet::with_capacity(seeds.len());
    let mut groups = Vec::new();
    let mut queue = VecDeque::new();

    for (start, start_id) in seeds {
        if !visited.insert(start_id) {
            continue;
        }
        queue.push_back(start);

        let mut group = vec![start_id];
        while let Some((x, y)) = queue.pop_front() {
            for next in neighbors(x, y) {
                let Some(&id) = by_position.get(&next) else {
                    continue;
                };
                if !visited.insert(id) {
                    continue;
                }
                group.push(id);
                queue.push_back(next);
            }
        }

        group.sort();
        groups.push(group);
    }

    groups.sort_by_key(|group| group[0]);
    groups
}

/// Group every playable color on the board into regions
///
/// Floor and ceiling cells never take part; colors are processed
/// independently since regions of different colors never interact.
pub fn find_regions(grid: &Grid) -> Vec<Region> {
    let mut classes: HashMap<u8, Vec<(CellId, (i32, i32))>> = HashMap::new();
    for cell in grid.playfield() {
        if let Some(color) = cell.playable_color() {
            classes
                .entry(color)
                .or_default()
                .push((cell.id, cell.position()));
        }
    }

    let mut colors: Vec<u8> = classes.keys().copied().collect();
    colors.sort_unstable();

    let mut regions = Vec::new();
    for color in colors {
        let members = classes.remove(&color).unwrap_or_default();
        regions.extend(
            group_cells(members)
                .into_iter()
                .map(|cells| Region { color, cells }),
        );
    }

    tracing::debug!(regions = regions.len(), "grouped board into regions");
    regions
}
