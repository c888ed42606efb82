//! Grid module - the set of live cells
//!
//! The grid owns every live cell (position, color, origin tag) plus the
//! bookkeeping of the two boundary columns. Cells are addressed by a
//! monotonically increasing [`CellId`]; a destroyed id is never handed out
//! again.
//!
//! Coordinates: (x, y) with y growing upwards. The floor row is y = 0 and
//! column cells stack from y = 1.
//!
//! Lookups go through a position index so neighbor queries stay O(1); the
//! cell table itself is ordered by id, which keeps every iteration
//! deterministic.

use std::collections::{BTreeMap, HashMap};

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::types::{CellColor, Origin, Side};

/// Identity of a live cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellId(pub u32);

/// A cell on the board
///
/// `flying` and `target_y` are transient: they are only meaningful between a
/// clear and the end of the gravity pass that follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub id: CellId,
    pub x: i32,
    pub y: i32,
    pub color: CellColor,
    pub origin: Origin,
    pub flying: bool,
    pub target_y: i32,
}

impl Cell {
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Palette color, if this cell can join a region
    pub fn playable_color(&self) -> Option<u8> {
        if self.origin.is_playfield() {
            self.color.palette_index()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GridError {
    #[display("position ({x}, {y}) is already occupied")]
    Occupied { x: i32, y: i32 },
    #[display("no live cell with id {}", id.0)]
    UnknownCell { id: CellId },
}

/// The live cell set and column bookkeeping
#[derive(Debug, Clone, Default)]
pub struct Grid {
    cells: BTreeMap<CellId, Cell>,
    by_position: HashMap<(i32, i32), CellId>,
    /// Column stacks, bottom first
    left: Vec<CellId>,
    right: Vec<CellId>,
    next_id: u32,
}

impl Grid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new cell, rejecting occupied positions
    ///
    /// Column-origin cells are appended to their column stack.
    pub fn insert(
        &mut self,
        x: i32,
        y: i32,
        color: CellColor,
        origin: Origin,
    ) -> Result<CellId, GridError> {
        if self.by_position.contains_key(&(x, y)) {
            return Err(GridError::Occupied { x, y });
        }

        let id = CellId(self.next_id);
        self.next_id += 1;

        self.cells.insert(
            id,
            Cell {
                id,
                x,
                y,
                color,
                origin,
                flying: false,
                target_y: y,
            },
        );
        self.by_position.insert((x, y), id);

        if let Some(side) = origin.side() {
            self.column_mut(side).push(id);
        }

        Ok(id)
    }

    /// Destroy a cell, detaching it from its column if it has one
    pub fn remove(&mut self, id: CellId) -> Option<Cell> {
        let cell = self.cells.remove(&id)?;
        if self.by_position.get(&cell.position()) == Some(&id) {
            self.by_position.remove(&cell.position());
        }
        if let Some(side) = cell.origin.side() {
            self.column_mut(side).retain(|member| *member != id);
        }
        Some(cell)
    }

    /// Move a cell vertically, keeping the position index consistent
    pub fn move_to(&mut self, id: CellId, y: i32) -> Result<(), GridError> {
        let cell = self.cells.get(&id).ok_or(GridError::UnknownCell { id })?;
        let (x, old_y) = cell.position();
        if old_y == y {
            return Ok(());
        }
        if self.by_position.contains_key(&(x, y)) {
            return Err(GridError::Occupied { x, y });
        }

        self.by_position.remove(&(x, old_y));
        self.by_position.insert((x, y), id);
        if let Some(cell) = self.cells.get_mut(&id) {
            cell.y = y;
        }
        Ok(())
    }

    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(&id)
    }

    pub fn get_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(&id)
    }

    /// Cell at position (x, y), if any
    pub fn cell_at(&self, x: i32, y: i32) -> Option<&Cell> {
        self.by_position.get(&(x, y)).and_then(|id| self.cells.get(id))
    }

    /// Check if position is occupied
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.by_position.contains_key(&(x, y))
    }

    /// All live cells in id order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.values_mut()
    }

    /// Cells that take part in grouping, clearing and gravity
    pub fn playfield(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values().filter(|c| c.origin.is_playfield())
    }

    pub fn cells_by_origin(&self, origin: Origin) -> impl Iterator<Item = &Cell> {
        self.cells.values().filter(move |c| c.origin == origin)
    }

    pub fn cells_by_color(&self, color: CellColor) -> impl Iterator<Item = &Cell> {
        self.cells.values().filter(move |c| c.color == color)
    }

    /// Ids of the cells stacked in a column, bottom first
    pub fn column(&self, side: Side) -> &[CellId] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Occupied height of a column (number of live cells it holds)
    pub fn column_height(&self, side: Side) -> usize {
        self.column(side).len()
    }

    fn column_mut(&mut self, side: Side) -> &mut Vec<CellId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Number of live cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Highest y among live piece-origin cells
    pub fn highest_piece_y(&self) -> Option<i32> {
        self.cells_by_origin(Origin::Piece).map(|c| c.y).max()
    }

    /// Clear every transient gravity annotation
    pub fn reset_annotations(&mut self) {
        for cell in self.cells.values_mut() {
            cell.flying = false;
            cell.target_y = cell.y;
        }
    }

    /// Check the internal bookkeeping: the position index mirrors the cell
    /// table and every column member is a live cell of that column.
    pub fn is_consistent(&self) -> bool {
        if self.by_position.len() != self.cells.len() {
            return false;
        }
        let indexed = self.cells.values().all(|cell| {
            self.by_position.get(&cell.position()) == Some(&cell.id)
        });
        let columns = Side::BOTH.iter().all(|side| {
            self.column(*side).iter().all(|id| {
                self.cells
                    .get(id)
                    .is_some_and(|cell| cell.origin == side.origin())
            })
        });
        indexed && columns
    }
}
